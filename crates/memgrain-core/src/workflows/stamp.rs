use super::validate_box;
use crate::core::models::leaflet::Membrane;
use crate::engine::config::StampConfig;
use crate::engine::domains;
use crate::engine::error::EngineError;
use crate::engine::report::StampReport;
use std::collections::HashSet;
use tracing::{info, instrument};

/// Resolves the center list: anchor points of inclusions of the configured
/// protein type first, then manual points, de-duplicated preserving first
/// occurrence. Resolution happens before any mutation; an empty result is a
/// fatal configuration error.
fn resolve_centers(membrane: &Membrane, config: &StampConfig) -> Result<Vec<u32>, EngineError> {
    let mut centers = Vec::new();

    if let Some(type_id) = config.protein_type {
        let from_proteins: Vec<u32> = membrane
            .inclusions
            .of_type(type_id)
            .map(|inc| inc.point_id)
            .collect();
        info!(
            type_id,
            centers = from_proteins.len(),
            "Collected domain centers from protein inclusions"
        );
        centers.extend(from_proteins);
    }
    centers.extend(&config.manual_points);

    let mut seen = HashSet::new();
    centers.retain(|&c| seen.insert(c));

    if centers.is_empty() {
        return Err(EngineError::NoCentersResolved {
            protein_type: config.protein_type,
            manual: config.manual_points.len(),
        });
    }
    info!(total = centers.len(), "Resolved domain centers");
    Ok(centers)
}

/// Stamps the configured domain id around every resolved center on the
/// selected leaflets.
#[instrument(skip_all, name = "stamp_workflow")]
pub fn run(membrane: &mut Membrane, config: &StampConfig) -> Result<StampReport, EngineError> {
    validate_box(membrane)?;
    let centers = resolve_centers(membrane, config)?;

    let box_size = membrane.box_size;
    let mut report = StampReport::default();

    for kind in membrane.resolve_selection(config.selection) {
        let Some(leaflet) = membrane.leaflet_mut(kind) else {
            continue;
        };
        info!(leaflet = %kind, radius = config.radius, "Stamping domains");
        let leaflet_report = domains::stamp_on_leaflet(
            leaflet,
            kind,
            box_size,
            config.radius,
            &centers,
            config.domain_id,
            config.mode,
        );
        report.leaflets.push(leaflet_report);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::leaflet::{Leaflet, LeafletSelection};
    use crate::engine::config::StampConfigBuilder;
    use nalgebra::{Point3, Vector3};

    fn monolayer(n: usize) -> Membrane {
        Membrane::new(
            Vector3::new(1000.0, 1000.0, 1000.0),
            Leaflet::from_coordinates((0..n).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect()),
        )
    }

    #[test]
    fn manual_centers_stamp_the_outer_leaflet() {
        let mut membrane = monolayer(20);
        let config = StampConfigBuilder::new()
            .radius(1.5)
            .domain_id(3)
            .manual_points(vec![5, 15])
            .build()
            .unwrap();

        let report = run(&mut membrane, &config).unwrap();

        assert_eq!(report.leaflets.len(), 1);
        assert_eq!(report.leaflets[0].stamped_points, 6);
        for i in [4, 5, 6, 14, 15, 16] {
            assert_eq!(membrane.outer.domain_ids[i], 3);
        }
        assert_eq!(membrane.outer.domain_ids[10], 0);
    }

    #[test]
    fn protein_type_centers_are_used_before_manual_ones() {
        let mut membrane = monolayer(20);
        membrane.inclusions.add(7, 2, None);
        membrane.inclusions.add(8, 18, None); // different type, ignored
        let config = StampConfigBuilder::new()
            .radius(0.5)
            .domain_id(4)
            .protein_type(Some(7))
            .manual_points(vec![10])
            .build()
            .unwrap();

        run(&mut membrane, &config).unwrap();

        assert_eq!(membrane.outer.domain_ids[2], 4);
        assert_eq!(membrane.outer.domain_ids[10], 4);
        assert_eq!(membrane.outer.domain_ids[18], 0);
    }

    #[test]
    fn type_without_inclusions_and_no_manual_points_is_fatal() {
        let mut membrane = monolayer(10);
        let before = membrane.outer.domain_ids.clone();
        let config = StampConfigBuilder::new()
            .radius(2.0)
            .domain_id(1)
            .protein_type(Some(42))
            .build()
            .unwrap();

        let err = run(&mut membrane, &config).unwrap_err();

        assert!(matches!(err, EngineError::NoCentersResolved { .. }));
        assert_eq!(membrane.outer.domain_ids, before);
    }

    #[test]
    fn duplicate_centers_collapse_keeping_first_occurrence() {
        let mut membrane = monolayer(10);
        membrane.inclusions.add(7, 4, None);
        let config = StampConfigBuilder::new()
            .radius(0.5)
            .domain_id(2)
            .protein_type(Some(7))
            .manual_points(vec![4, 4, 6])
            .build()
            .unwrap();

        let centers = resolve_centers(&membrane, &config).unwrap();
        assert_eq!(centers, vec![4, 6]);
    }

    #[test]
    fn monolayer_ignores_inner_selection() {
        let mut membrane = monolayer(10);
        let config = StampConfigBuilder::new()
            .radius(1.0)
            .domain_id(6)
            .manual_points(vec![3])
            .selection(LeafletSelection::Both)
            .build()
            .unwrap();

        let report = run(&mut membrane, &config).unwrap();
        assert_eq!(report.leaflets.len(), 1);
    }

    #[test]
    fn out_of_range_manual_center_is_reported_not_fatal() {
        let mut membrane = monolayer(10);
        let config = StampConfigBuilder::new()
            .radius(1.0)
            .domain_id(6)
            .manual_points(vec![500, 3])
            .build()
            .unwrap();

        let report = run(&mut membrane, &config).unwrap();
        assert_eq!(report.leaflets[0].skipped_centers, vec![500]);
        assert_eq!(membrane.outer.domain_ids[3], 6);
    }
}
