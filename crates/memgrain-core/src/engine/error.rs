use super::config::ConfigError;
use super::sampling::SamplingError;
use crate::core::models::lipid::LipidSpecError;
use thiserror::Error;

/// Errors surfaced by policy invocations.
///
/// Every variant except `Sampling` is a configuration problem detected before
/// any leaflet mutation; misconfigured runs never leave partially-applied
/// state behind.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lipids(#[from] LipidSpecError),

    #[error("No domain centers resolved (protein type {protein_type:?}, {manual} manual points)")]
    NoCentersResolved {
        protein_type: Option<i32>,
        manual: usize,
    },

    #[error("Box extents must be positive in every axis, got [{x}, {y}, {z}]")]
    InvalidBox { x: f64, y: f64, z: f64 },

    #[error(transparent)]
    Sampling(#[from] SamplingError),
}
