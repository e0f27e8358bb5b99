//! # File I/O Module
//!
//! Reading and writing the on-disk representation of a membrane blueprint.
//!
//! - [`point_dir`] - The point folder: `OuterBM.dat` / `InnerBM.dat` leaflet
//!   files (fixed-column, whitespace-delimited, one leaflet per file) plus the
//!   `IncData.dat` / `ExcData.dat` modification files, with incremental backup
//!   support for in-place edits.
//! - [`input_str`] - The `[Lipids List]` section of a membrane-builder
//!   `input.str` file, written fresh or spliced into an existing file.

pub mod input_str;
pub mod point_dir;
