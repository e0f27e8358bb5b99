use crate::cli::PlaceArgs;
use crate::error::Result;
use memgrain::core::io::point_dir;
use memgrain::engine::config::InclusionConfigBuilder;
use memgrain::workflows;
use std::path::Path;
use tracing::info;

pub fn run(args: PlaceArgs, report_json: Option<&Path>) -> Result<()> {
    info!("Loading point folder from {:?}", &args.folder.input);
    let mut membrane = point_dir::load_membrane(&args.folder.input)?;

    let config = InclusionConfigBuilder::new()
        .protein_type(args.protein_type)
        .radius(args.radius)
        .count(args.count)
        .preferred_curvature(args.preferred_curvature)
        .k_factor(args.k_factor)
        .seed(args.seed)
        .build()
        .map_err(memgrain::engine::error::EngineError::from)?;

    println!(
        "Placing {} inclusion(s) of type {} (separation {})...",
        args.count, args.protein_type, args.radius
    );
    let report = workflows::place::run(&mut membrane, &config)?;

    if report.is_complete() {
        println!("✓ Placed all {} inclusion(s).", report.placed);
    } else {
        println!(
            "Placed {} of {} inclusion(s); {} could not be placed without violating the separation.",
            report.placed,
            report.requested,
            report.shortfall()
        );
    }
    if !report.skipped_anchors.is_empty() {
        println!(
            "  warning: {} pre-existing inclusion(s) anchor points outside the leaflet: {:?}",
            report.skipped_anchors.len(),
            report.skipped_anchors
        );
    }

    super::persist(&membrane, &args.folder)?;
    if let Some(path) = report_json {
        super::write_report(&report, path)?;
    }
    Ok(())
}
