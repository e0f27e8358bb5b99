//! # Engine Module
//!
//! The algorithmic core of memgrain: everything that decides which domain or
//! protein goes where on a leaflet.
//!
//! ## Architecture
//!
//! - **Spatial Index** ([`spatial`]) - periodic cell-list neighbor search over
//!   a leaflet's coordinates
//! - **Geodesic Graph** ([`geodesic`]) - short-edge proximity graph with
//!   bounded shortest-path queries that follow the surface instead of cutting
//!   through folds
//! - **Sampling** ([`sampling`]) - numerically stable categorical draws from
//!   unnormalized log-weights
//! - **Domain Assignment** ([`domains`]) - curvature-weighted quota mixing and
//!   radius/geodesic stamping
//! - **Inclusion Placement** ([`inclusions`]) - exclusion-aware iterative
//!   protein placement
//! - **Configuration** ([`config`]) - builder-validated policy parameters
//! - **Reports** ([`report`]) - structured diagnostics returned to the caller
//! - **Error Handling** ([`error`]) - engine-level error types
//!
//! Engine execution is single-threaded by contract: each categorical draw
//! changes the state the next draw depends on, so draws form one ordered
//! stream per invocation.

pub mod config;
pub mod domains;
pub mod error;
pub mod geodesic;
pub mod inclusions;
pub mod report;
pub mod sampling;
pub mod spatial;
