use super::config::DistanceMode;
use super::geodesic::SurfaceGraph;
use super::report::{LeafletMixReport, LeafletStampReport, LipidCount};
use super::sampling::{self, SamplingError};
use super::spatial::PeriodicIndex;
use crate::core::models::leaflet::{Leaflet, LeafletKind};
use crate::core::models::lipid::LipidSpec;
use nalgebra::Vector3;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

/// Integer quota per lipid type: `floor(fraction * n)` each, with the
/// rounding remainder folded entirely into the last type so the quotas sum to
/// exactly `n`. The remainder is signed: fraction sums slightly above 1.0
/// (admitted by the validation tolerance) floor to more than `n`, and the
/// last type absorbs the deficit, clamped at zero.
fn quotas(lipids: &[LipidSpec], n: usize) -> Vec<usize> {
    let mut quotas: Vec<i64> = lipids
        .iter()
        .map(|l| (l.fraction * n as f64).floor() as i64)
        .collect();
    let assigned: i64 = quotas.iter().sum();
    if let Some(last) = quotas.last_mut() {
        *last += n as i64 - assigned;
    }
    quotas.into_iter().map(|q| q.max(0) as usize).collect()
}

/// Curvature-weighted global quota assignment for one leaflet.
///
/// Points are visited in a uniformly random permutation; each draws a lipid
/// type from a Boltzmann distribution over the curvature mismatch, restricted
/// to types with remaining quota. Quota exhaustion removes a type from
/// candidacy exactly at zero, so the final per-type counts equal the integer
/// quotas regardless of the random draws.
///
/// For the inner leaflet the curvature sign is inverted: the two leaflets
/// look at the same surface from opposite sides.
pub fn assign_mix_on_leaflet(
    leaflet: &mut Leaflet,
    kind: LeafletKind,
    lipids: &[LipidSpec],
    k_factor: f64,
    area_weighted: bool,
    rng: &mut impl Rng,
) -> Result<LeafletMixReport, SamplingError> {
    let n = leaflet.len();
    let curvature_sign = match kind {
        LeafletKind::Outer => 1.0,
        LeafletKind::Inner => -1.0,
    };

    let mut remaining = quotas(lipids, n);
    let mut active: Vec<usize> = (0..lipids.len()).filter(|&i| remaining[i] > 0).collect();
    let mut assigned = vec![0usize; lipids.len()];
    let mut fallback_draws = 0usize;

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let full_list: Vec<usize> = (0..lipids.len()).collect();
    for point in order {
        let candidates: &[usize] = if active.is_empty() {
            // Guarded defensively; quotas summing to n should make this
            // unreachable while points remain.
            warn!(point, "No lipid types with remaining quota, using full list");
            fallback_draws += 1;
            &full_list
        } else {
            &active
        };

        let local = 2.0 * curvature_sign * leaflet.mean_curvature(point);
        let area = if area_weighted {
            leaflet.areas[point]
        } else {
            1.0
        };
        let log_weights: Vec<f64> = candidates
            .iter()
            .map(|&li| sampling::curvature_log_weight(local, lipids[li].curvature, k_factor, area))
            .collect();

        let chosen = candidates[sampling::draw_from_log_weights(&log_weights, rng)?];
        leaflet.domain_ids[point] = lipids[chosen].domain_id;
        assigned[chosen] += 1;

        if remaining[chosen] > 0 {
            remaining[chosen] -= 1;
            if remaining[chosen] == 0 {
                active.retain(|&li| li != chosen);
            }
        }
    }

    let targets = quotas(lipids, n);
    let counts: Vec<LipidCount> = lipids
        .iter()
        .enumerate()
        .map(|(i, l)| {
            info!(
                "{}: {:.1}% of {} points (target {:.1}%)",
                l.name,
                100.0 * assigned[i] as f64 / n.max(1) as f64,
                n,
                100.0 * l.fraction
            );
            LipidCount {
                domain_id: l.domain_id,
                name: l.name.clone(),
                target: targets[i],
                assigned: assigned[i],
            }
        })
        .collect();

    Ok(LeafletMixReport {
        leaflet: kind,
        points: n,
        lipids: counts,
        fallback_draws,
    })
}

/// Local stamping for one leaflet: every point within `radius` of a center
/// (under the chosen distance mode) receives `domain_id`.
///
/// Centers are processed in input order and overlaps resolve last-writer-wins;
/// altering that order changes scientific output, so it is part of the
/// contract. Out-of-range centers are skipped with a warning.
pub fn stamp_on_leaflet(
    leaflet: &mut Leaflet,
    kind: LeafletKind,
    box_size: Vector3<f64>,
    radius: f64,
    centers: &[u32],
    domain_id: i32,
    mode: DistanceMode,
) -> LeafletStampReport {
    let cell_hint = match mode {
        DistanceMode::Euclidean => radius,
        DistanceMode::Geodesic { edge_cutoff } => edge_cutoff,
    };
    let index = PeriodicIndex::new(&leaflet.coordinates, box_size, cell_hint);
    let graph = match mode {
        DistanceMode::Geodesic { edge_cutoff } => Some(SurfaceGraph::build(&index, edge_cutoff)),
        DistanceMode::Euclidean => None,
    };

    let mut stamped = vec![false; leaflet.len()];
    let mut skipped_centers = Vec::new();

    for &center in centers {
        let center_index = center as usize;
        if center_index >= leaflet.len() {
            warn!(center, leaflet = %kind, "Domain center does not exist in leaflet, skipping");
            skipped_centers.push(center);
            continue;
        }

        let matched: Vec<usize> = match &graph {
            Some(graph) => graph
                .reachable_within(center_index, radius)
                .into_iter()
                .map(|(node, _)| node)
                .collect(),
            None => index.neighbors_within(center_index, radius),
        };

        debug!(center, matched = matched.len(), "Stamping domain around center");
        for point in matched {
            leaflet.domain_ids[point] = domain_id;
            stamped[point] = true;
        }
    }

    LeafletStampReport {
        leaflet: kind,
        stamped_points: stamped.iter().filter(|&&s| s).count(),
        skipped_centers,
    }
}
