use crate::core::models::lipid::LipidSpec;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Renders the `[Lipids List]` section for a membrane-builder `input.str`.
fn render_lipid_section(lipids: &[LipidSpec]) -> String {
    let mut section = String::from("[Lipids List]\n");
    for lipid in lipids {
        section.push_str(&format!("Domain {}\n", lipid.domain_id));
        section.push_str(&format!("{} 1 1 {}\n", lipid.name, lipid.density));
        section.push_str("End\n");
    }
    section
}

/// Writes an `input.str` file whose `[Lipids List]` section reflects `lipids`.
///
/// When `old_input` points to an existing file, every other section of that
/// file is preserved as-is and only the lipids section is replaced (or
/// appended when absent). Without an old file, just the lipids section is
/// written.
pub fn write_lipid_section(
    lipids: &[LipidSpec],
    output: &Path,
    old_input: Option<&Path>,
) -> Result<(), std::io::Error> {
    let old_content = match old_input {
        Some(path) if path.is_file() => Some(fs::read_to_string(path)?),
        _ => None,
    };

    let Some(content) = old_content else {
        let mut file = fs::File::create(output)?;
        file.write_all(render_lipid_section(lipids).as_bytes())?;
        return Ok(());
    };

    let mut sections: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_lipids = false;
    let mut replaced = false;

    for line in content.lines() {
        if line.trim_start().starts_with('[') {
            if !current.is_empty() {
                sections.push(std::mem::take(&mut current));
            }
            if line.contains("[Lipids List]") {
                in_lipids = true;
                replaced = true;
                sections.push(render_lipid_section(lipids));
            } else {
                in_lipids = false;
                current.push_str(line);
                current.push('\n');
            }
        } else if !in_lipids {
            current.push_str(line);
            current.push('\n');
        }
    }
    if !current.is_empty() {
        sections.push(current);
    }
    if !replaced {
        sections.push(render_lipid_section(lipids));
    }

    fs::write(output, sections.concat())?;
    Ok(())
}
