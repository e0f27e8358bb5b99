use crate::cli::MixArgs;
use crate::error::Result;
use memgrain::core::io::{input_str, point_dir};
use memgrain::core::models::lipid;
use memgrain::engine::config::DomainMixConfigBuilder;
use memgrain::workflows;
use std::path::Path;
use tracing::info;

pub fn run(args: MixArgs, report_json: Option<&Path>) -> Result<()> {
    info!("Loading lipid specifications from {:?}", &args.lipids);
    let lipids = lipid::load_lipid_specs(&args.lipids)?;

    info!("Loading point folder from {:?}", &args.folder.input);
    let mut membrane = point_dir::load_membrane(&args.folder.input)?;

    let config = DomainMixConfigBuilder::new()
        .lipids(lipids.clone())
        .selection(args.leaflet.into())
        .k_factor(args.k_factor)
        .area_weighted(args.area_weighted)
        .seed(args.seed)
        .build()
        .map_err(memgrain::engine::error::EngineError::from)?;

    println!("Assigning lipid domains...");
    let report = workflows::mix::run(&mut membrane, &config)?;

    for leaflet in &report.leaflets {
        println!("  {} leaflet ({} points):", leaflet.leaflet, leaflet.points);
        for count in &leaflet.lipids {
            println!(
                "    domain {:>3} {:<12} {:>6} assigned (target {})",
                count.domain_id, count.name, count.assigned, count.target
            );
        }
    }

    if let Some(str_output) = &args.str_output {
        input_str::write_lipid_section(&lipids, str_output, args.str_input.as_deref())?;
        println!("✓ Lipid section written to: {}", str_output.display());
    }

    super::persist(&membrane, &args.folder)?;
    if let Some(path) = report_json {
        super::write_report(&report, path)?;
    }
    Ok(())
}
