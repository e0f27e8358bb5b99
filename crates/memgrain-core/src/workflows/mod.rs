//! # Workflows Module
//!
//! The public, user-facing entry points of memgrain. Each workflow takes a
//! membrane plus a validated configuration, performs every fatal check before
//! touching leaflet state, resolves the leaflet selection against the
//! monolayer flag (outer before inner), runs the engine, and returns a
//! structured report. Workflows never do file I/O; loading and persisting the
//! point folder is the caller's responsibility.
//!
//! - [`mix`] - curvature-weighted global lipid domain assignment
//! - [`stamp`] - radius/geodesic domain stamping around named centers
//! - [`place`] - exclusion-aware protein inclusion placement

pub mod mix;
pub mod place;
pub mod stamp;

use crate::core::models::leaflet::Membrane;
use crate::engine::error::EngineError;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// One seeded generator per invocation; all randomness of a run flows from
/// this single ordered stream.
pub(crate) fn invocation_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub(crate) fn validate_box(membrane: &Membrane) -> Result<(), EngineError> {
    let b = membrane.box_size;
    if b.iter().all(|&l| l > 0.0) {
        Ok(())
    } else {
        Err(EngineError::InvalidBox {
            x: b.x,
            y: b.y,
            z: b.z,
        })
    }
}
