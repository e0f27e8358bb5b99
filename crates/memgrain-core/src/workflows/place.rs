use super::{invocation_rng, validate_box};
use crate::core::models::leaflet::Membrane;
use crate::engine::config::InclusionConfig;
use crate::engine::error::EngineError;
use crate::engine::inclusions;
use crate::engine::report::PlacementReport;
use tracing::instrument;

/// Places protein inclusions on the outer leaflet.
///
/// A shortfall (fewer placeable points than requested) is returned in the
/// report, not raised as an error.
#[instrument(skip_all, name = "place_workflow")]
pub fn run(
    membrane: &mut Membrane,
    config: &InclusionConfig,
) -> Result<PlacementReport, EngineError> {
    validate_box(membrane)?;
    let mut rng = invocation_rng(config.seed);
    Ok(inclusions::place_proteins(
        membrane,
        config.protein_type,
        config.radius,
        config.count,
        config.preferred_curvature,
        config.k_factor,
        &mut rng,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::leaflet::Leaflet;
    use crate::engine::config::InclusionConfigBuilder;
    use nalgebra::{Point3, Vector3};

    fn membrane(n: usize) -> Membrane {
        Membrane::new(
            Vector3::new(1000.0, 1000.0, 1000.0),
            Leaflet::from_coordinates((0..n).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect()),
        )
    }

    #[test]
    fn workflow_places_and_reports() {
        let mut m = membrane(50);
        let config = InclusionConfigBuilder::new()
            .protein_type(3)
            .radius(2.0)
            .count(5)
            .seed(Some(6))
            .build()
            .unwrap();

        let report = run(&mut m, &config).unwrap();

        assert_eq!(report.placed, 5);
        assert_eq!(m.inclusions.len(), 5);
        assert!(m.inclusions.iter().all(|i| i.type_id == 3));
    }

    #[test]
    fn non_positive_box_is_fatal_before_mutation() {
        let mut m = membrane(10);
        m.box_size = Vector3::new(10.0, 0.0, 10.0);
        let config = InclusionConfigBuilder::new()
            .protein_type(1)
            .radius(1.0)
            .count(1)
            .build()
            .unwrap();

        let err = run(&mut m, &config).unwrap_err();
        assert!(matches!(err, EngineError::InvalidBox { .. }));
        assert!(m.inclusions.is_empty());
    }
}
