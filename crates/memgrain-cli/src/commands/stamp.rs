use crate::cli::StampArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use memgrain::core::io::point_dir;
use memgrain::engine::config::{DistanceMode, StampConfigBuilder};
use memgrain::engine::geodesic::DEFAULT_EDGE_CUTOFF;
use memgrain::workflows;
use std::path::Path;
use tracing::info;

pub fn run(args: StampArgs, report_json: Option<&Path>) -> Result<()> {
    let manual_points = match &args.points {
        Some(list) => {
            parser::parse_point_list(list).map_err(|e| CliError::Argument(e.to_string()))?
        }
        None => Vec::new(),
    };

    info!("Loading point folder from {:?}", &args.folder.input);
    let mut membrane = point_dir::load_membrane(&args.folder.input)?;

    let mode = if args.geodesic {
        DistanceMode::Geodesic {
            edge_cutoff: args.edge_cutoff.unwrap_or(DEFAULT_EDGE_CUTOFF),
        }
    } else {
        DistanceMode::Euclidean
    };

    let config = StampConfigBuilder::new()
        .radius(args.radius)
        .domain_id(args.domain_id)
        .protein_type(args.protein_type)
        .manual_points(manual_points)
        .selection(args.leaflet.into())
        .mode(mode)
        .build()
        .map_err(memgrain::engine::error::EngineError::from)?;

    println!("Stamping domain {} (radius {})...", args.domain_id, args.radius);
    let report = workflows::stamp::run(&mut membrane, &config)?;

    for leaflet in &report.leaflets {
        println!(
            "  {} leaflet: {} points stamped",
            leaflet.leaflet, leaflet.stamped_points
        );
        if !leaflet.skipped_centers.is_empty() {
            println!(
                "    warning: {} center(s) out of range: {:?}",
                leaflet.skipped_centers.len(),
                leaflet.skipped_centers
            );
        }
    }

    super::persist(&membrane, &args.folder)?;
    if let Some(path) = report_json {
        super::write_report(&report, path)?;
    }
    Ok(())
}
