pub mod mix;
pub mod place;
pub mod stamp;

use crate::cli::FolderArgs;
use crate::error::Result;
use memgrain::core::io::point_dir;
use memgrain::core::models::leaflet::Membrane;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Writes the membrane to the resolved output folder, backing up a
/// pre-existing folder first unless the user opted out.
fn persist(membrane: &Membrane, folder: &FolderArgs) -> Result<()> {
    let output = folder.output.as_deref().unwrap_or(&folder.input);

    if output.is_dir() && !folder.no_backup {
        let backup = point_dir::create_backup(output)?;
        info!("Backed up existing folder to {:?}", backup);
        println!("Existing folder backed up to: {}", backup.display());
    }

    point_dir::save_membrane(membrane, output)?;
    info!("Membrane written to {:?}", output);
    println!("✓ Updated point folder written to: {}", output.display());
    Ok(())
}

/// Serializes a run report to pretty-printed JSON.
fn write_report<T: Serialize>(report: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(anyhow::Error::from)?;
    std::fs::write(path, json)?;
    info!("Run report written to {:?}", path);
    Ok(())
}
