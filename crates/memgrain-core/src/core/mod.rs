//! # Core Module
//!
//! Fundamental building blocks for coarse-grained membrane modeling: the data
//! structures describing a membrane (leaflets, lipid specifications, inclusions,
//! exclusions) and the I/O layer for the on-disk point-folder representation.
//!
//! ## Key Components
//!
//! - **Membrane Representation** ([`models`]) - Leaflet point arrays, lipid
//!   specifications, and protein inclusion / pore exclusion records
//! - **File I/O** ([`io`]) - Reading and writing the fixed-column point-folder
//!   files and membrane-builder input sections

pub mod io;
pub mod models;
