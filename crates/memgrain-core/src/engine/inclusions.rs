use super::report::PlacementReport;
use super::sampling;
use super::spatial::PeriodicIndex;
use crate::core::models::leaflet::Membrane;
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Iterative protein placement on the outer leaflet.
///
/// The excluded-point set is seeded with the radius-`r` neighborhoods of all
/// pre-existing inclusions, then grows with every placement: each draw
/// constrains the next, so no two inclusions (new-new or new-existing) end up
/// closer than `radius` under periodic distance. Candidates running out is a
/// reported shortfall, not an error.
pub fn place_proteins(
    membrane: &mut Membrane,
    protein_type: i32,
    radius: f64,
    count: usize,
    preferred_curvature: Option<f64>,
    k_factor: f64,
    rng: &mut impl Rng,
) -> PlacementReport {
    let outer = &membrane.outer;
    let n = outer.len();
    let index = PeriodicIndex::new(&outer.coordinates, membrane.box_size, radius);

    let mut excluded: HashSet<usize> = HashSet::new();
    let mut skipped_anchors = Vec::new();
    for inclusion in membrane.inclusions.iter() {
        let anchor = inclusion.point_id as usize;
        if anchor >= n {
            warn!(
                point_id = inclusion.point_id,
                "Existing inclusion anchors a point outside the outer leaflet, ignoring"
            );
            skipped_anchors.push(inclusion.point_id);
            continue;
        }
        excluded.extend(index.neighbors_within(anchor, radius));
    }

    info!(
        count,
        protein_type, radius, "Placing proteins on the outer leaflet"
    );

    let mut point_ids = Vec::new();
    while point_ids.len() < count {
        let candidates: Vec<usize> = (0..n).filter(|i| !excluded.contains(i)).collect();
        if candidates.is_empty() {
            warn!(
                placed = point_ids.len(),
                requested = count,
                "No valid placement points remain, stopping early"
            );
            break;
        }

        let chosen = match preferred_curvature {
            None => candidates[rng.gen_range(0..candidates.len())],
            Some(target) => {
                let log_weights: Vec<f64> = candidates
                    .iter()
                    .map(|&i| {
                        sampling::curvature_log_weight(
                            membrane.outer.mean_curvature(i),
                            target,
                            k_factor,
                            1.0,
                        )
                    })
                    .collect();
                // candidates is non-empty, so the draw cannot fail.
                let pick = sampling::draw_from_log_weights(&log_weights, rng)
                    .expect("non-empty candidate list");
                candidates[pick]
            }
        };

        membrane.inclusions.add(protein_type, chosen as u32, None);
        excluded.extend(index.neighbors_within(chosen, radius));
        point_ids.push(chosen as u32);
        debug!(point = chosen, placed = point_ids.len(), "Placed protein");
    }

    info!(placed = point_ids.len(), requested = count, "Placement finished");
    PlacementReport {
        requested: count,
        placed: point_ids.len(),
        point_ids,
        skipped_anchors,
    }
}
