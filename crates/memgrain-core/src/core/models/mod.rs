//! # Core Models Module
//!
//! Data structures describing a coarse-grained membrane blueprint.
//!
//! ## Key Components
//!
//! - [`leaflet`] - Per-point leaflet arrays, the `Membrane` container, and
//!   leaflet selection/gating
//! - [`lipid`] - Lipid type specifications and the lipid spec file parser
//! - [`inclusion`] - Point-anchored protein inclusion records
//! - [`exclusion`] - Lipid-free pore records
//!
//! Point data is index-aligned throughout: every per-point array of a leaflet
//! has the same length, and engine code addresses points by their index.

pub mod exclusion;
pub mod inclusion;
pub mod leaflet;
pub mod lipid;
