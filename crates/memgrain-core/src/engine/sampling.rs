use rand::distributions::WeightedIndex;
use rand::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SamplingError {
    #[error("Candidate list is empty, cannot draw")]
    EmptyCandidates,
}

/// Draws one index from a categorical distribution given unnormalized
/// log-weights, using the log-sum-exp trick: the maximum log-weight is
/// subtracted before exponentiating so that strongly negative values cannot
/// underflow the whole distribution to zero.
///
/// If the weights are degenerate anyway (all `-inf`, or NaN from an
/// overflowing penalty), the draw falls back to a uniform choice over the
/// candidates rather than failing. The fallback still consumes exactly one
/// value from `rng`, keeping seeded runs reproducible.
pub fn draw_from_log_weights(
    log_weights: &[f64],
    rng: &mut impl Rng,
) -> Result<usize, SamplingError> {
    if log_weights.is_empty() {
        return Err(SamplingError::EmptyCandidates);
    }
    if log_weights.len() == 1 {
        return Ok(0);
    }

    let max = log_weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        tracing::warn!(
            candidates = log_weights.len(),
            "Degenerate categorical weights, falling back to a uniform draw"
        );
        return Ok(rng.gen_range(0..log_weights.len()));
    }

    let weights: Vec<f64> = log_weights.iter().map(|&lw| (lw - max).exp()).collect();
    match WeightedIndex::new(&weights) {
        Ok(dist) => Ok(dist.sample(rng)),
        Err(_) => {
            tracing::warn!(
                candidates = log_weights.len(),
                "Weighted distribution construction failed, falling back to a uniform draw"
            );
            Ok(rng.gen_range(0..log_weights.len()))
        }
    }
}

/// Boltzmann log-weight for a squared-deviation penalty:
/// `-k * (value - preferred)^2 * area`.
#[inline]
pub fn curvature_log_weight(value: f64, preferred: f64, k_factor: f64, area: f64) -> f64 {
    let delta = value - preferred;
    -k_factor * delta * delta * area
}
