//! # Memgrain Core Library
//!
//! A library for post-processing triangulated membrane surface meshes into
//! coarse-grained molecular blueprints: it decides which lipid domain and which
//! protein inclusion goes where on an already-triangulated surface.
//!
//! ## Architectural Philosophy
//!
//! The library is organized in three layers with a strict separation of concerns:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Membrane`, `Leaflet`,
//!   `LipidSpec`, inclusion and exclusion records) and the point-folder I/O layer
//!   that reads and writes the fixed-column membrane files.
//!
//! - **[`engine`]: The Logic Core.** The algorithmic layer: a periodic spatial
//!   index, a surface-following geodesic graph, numerically stable categorical
//!   sampling, and the domain-assignment and inclusion-placement policies that
//!   mutate leaflet state.
//!
//! - **[`workflows`]: The Public API.** One entry point per policy. Each takes a
//!   membrane plus a validated configuration, performs all fatal checks before
//!   mutating anything, and returns a structured report of what it did.

pub mod core;
pub mod engine;
pub mod workflows;
