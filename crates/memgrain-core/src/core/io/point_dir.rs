use crate::core::models::exclusion::{Exclusion, ExclusionSet};
use crate::core::models::inclusion::{Inclusion, InclusionSet};
use crate::core::models::leaflet::{Leaflet, LeafletError, LeafletKind, Membrane};
use nalgebra::{Point3, Vector3};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const OUTER_FILE: &str = "OuterBM.dat";
const INNER_FILE: &str = "InnerBM.dat";
const INCLUSION_FILE: &str = "IncData.dat";
const EXCLUSION_FILE: &str = "ExcData.dat";

const MEMBRANE_COLUMNS: usize = 18;
const INCLUSION_COLUMNS: usize = 6;
const EXCLUSION_COLUMNS: usize = 3;

#[derive(Debug, Error)]
pub enum PointDirError {
    #[error("Point folder not found: {0}")]
    FolderNotFound(PathBuf),

    #[error("Required file {OUTER_FILE} not found in {0}")]
    MissingOuter(PathBuf),

    #[error("Malformed {file} at line {line}: {message}")]
    Malformed {
        file: &'static str,
        line: usize,
        message: String,
    },

    #[error("Inconsistent leaflet data in {file}: {source}")]
    Leaflet {
        file: &'static str,
        source: LeafletError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads a membrane from a point folder.
///
/// `OuterBM.dat` is required and carries the box extents in its header;
/// `InnerBM.dat` is optional and its absence marks a monolayer. Missing
/// inclusion/exclusion files yield empty sets.
pub fn load_membrane<P: AsRef<Path>>(dir: P) -> Result<Membrane, PointDirError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(PointDirError::FolderNotFound(dir.to_path_buf()));
    }

    let outer_path = dir.join(OUTER_FILE);
    if !outer_path.is_file() {
        return Err(PointDirError::MissingOuter(dir.to_path_buf()));
    }
    let (outer, box_size) = read_leaflet_file(&outer_path, OUTER_FILE, true)?;
    let box_size = box_size.ok_or(PointDirError::Malformed {
        file: OUTER_FILE,
        line: 1,
        message: "missing 'Box Lx Ly Lz' header".to_string(),
    })?;

    let inner_path = dir.join(INNER_FILE);
    let inner = if inner_path.is_file() {
        Some(read_leaflet_file(&inner_path, INNER_FILE, false)?.0)
    } else {
        debug!("{} not found, treating membrane as a monolayer", INNER_FILE);
        None
    };

    let inclusions = read_inclusion_file(&dir.join(INCLUSION_FILE))?;
    let exclusions = read_exclusion_file(&dir.join(EXCLUSION_FILE))?;

    info!(
        points = outer.len(),
        monolayer = inner.is_none(),
        inclusions = inclusions.len(),
        exclusions = exclusions.len(),
        "Loaded membrane from {}",
        dir.display()
    );

    Ok(Membrane {
        box_size,
        outer,
        inner,
        inclusions,
        exclusions,
    })
}

/// Saves a membrane into a point folder, creating the folder if needed.
/// Inclusion/exclusion files are only written when non-empty.
pub fn save_membrane<P: AsRef<Path>>(membrane: &Membrane, dir: P) -> Result<(), PointDirError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    write_leaflet_file(
        &dir.join(OUTER_FILE),
        &membrane.outer,
        LeafletKind::Outer,
        Some(membrane.box_size),
    )?;
    if let Some(inner) = &membrane.inner {
        write_leaflet_file(&dir.join(INNER_FILE), inner, LeafletKind::Inner, None)?;
    }

    if !membrane.inclusions.is_empty() {
        write_inclusion_file(&dir.join(INCLUSION_FILE), &membrane.inclusions)?;
    }
    if !membrane.exclusions.is_empty() {
        write_exclusion_file(&dir.join(EXCLUSION_FILE), &membrane.exclusions)?;
    }

    info!("Saved point data to {}", dir.display());
    Ok(())
}

/// Creates an incremental backup copy of a point folder next to it:
/// `#folder#`, then `##folder##`, and so on until a free name is found.
pub fn create_backup<P: AsRef<Path>>(dir: P) -> Result<PathBuf, PointDirError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(PointDirError::FolderNotFound(dir.to_path_buf()));
    }
    let parent = dir.parent().unwrap_or_else(|| Path::new("."));
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "point".to_string());

    let mut hashes = 1;
    let backup = loop {
        let wrapped = format!("{0}{name}{0}", "#".repeat(hashes));
        let candidate = parent.join(wrapped);
        if !candidate.exists() {
            break candidate;
        }
        hashes += 1;
    };

    copy_dir(dir, &backup)?;
    info!("Created backup at {}", backup.display());
    Ok(backup)
}

fn copy_dir(src: &Path, dst: &Path) -> Result<(), std::io::Error> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Re-tokenizes a data line, splitting columns that the upstream mesh tool
/// occasionally glues together with a sign (e.g. `1.234-5.678`). A `-` opens a
/// new column only when it directly follows a digit or a dot, so exponent
/// notation survives.
fn split_columns(line: &str) -> impl Iterator<Item = &str> {
    line.split_whitespace().flat_map(|token| {
        let mut pieces = Vec::new();
        let mut start = 0;
        let bytes = token.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            if b == b'-' && i > 0 && (bytes[i - 1].is_ascii_digit() || bytes[i - 1] == b'.') {
                pieces.push(&token[start..i]);
                start = i;
            }
        }
        pieces.push(&token[start..]);
        pieces
    })
}

fn parse_columns(
    line: &str,
    expected: usize,
    file: &'static str,
    number: usize,
) -> Result<Vec<f64>, PointDirError> {
    let mut values = Vec::with_capacity(expected);
    for column in split_columns(line) {
        let value = column
            .parse::<f64>()
            .map_err(|_| PointDirError::Malformed {
                file,
                line: number,
                message: format!("invalid number '{column}'"),
            })?;
        values.push(value);
    }
    if values.len() != expected {
        return Err(PointDirError::Malformed {
            file,
            line: number,
            message: format!("expected {expected} columns, found {}", values.len()),
        });
    }
    Ok(values)
}

/// Narrows an id-like column to `u32`, rejecting negative, fractional, or
/// non-finite values instead of silently truncating them.
fn column_u32(
    value: f64,
    file: &'static str,
    line: usize,
    what: &str,
) -> Result<u32, PointDirError> {
    if value.is_finite() && value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value) {
        Ok(value as u32)
    } else {
        Err(PointDirError::Malformed {
            file,
            line,
            message: format!("invalid {what} '{value}'"),
        })
    }
}

fn column_i32(
    value: f64,
    file: &'static str,
    line: usize,
    what: &str,
) -> Result<i32, PointDirError> {
    if value.is_finite()
        && value.fract() == 0.0
        && (i32::MIN as f64..=i32::MAX as f64).contains(&value)
    {
        Ok(value as i32)
    } else {
        Err(PointDirError::Malformed {
            file,
            line,
            message: format!("invalid {what} '{value}'"),
        })
    }
}

fn read_leaflet_file(
    path: &Path,
    file: &'static str,
    with_box: bool,
) -> Result<(Leaflet, Option<Vector3<f64>>), PointDirError> {
    let reader = BufReader::new(File::open(path)?);
    let header_lines = if with_box { 4 } else { 3 };

    let mut box_size = None;
    let mut leaflet = Leaflet {
        ids: Vec::new(),
        domain_ids: Vec::new(),
        areas: Vec::new(),
        coordinates: Vec::new(),
        normals: Vec::new(),
        principal_dir_1: Vec::new(),
        principal_dir_2: Vec::new(),
        curvature_1: Vec::new(),
        curvature_2: Vec::new(),
        edge_flags: Vec::new(),
    };

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;

        if index < header_lines {
            if with_box && index == 0 {
                box_size = Some(parse_box_line(&line, file)?);
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let v = parse_columns(&line, MEMBRANE_COLUMNS, file, number)?;
        leaflet.ids.push(column_u32(v[0], file, number, "point id")?);
        leaflet
            .domain_ids
            .push(column_i32(v[1], file, number, "domain id")?);
        leaflet.areas.push(v[2]);
        leaflet.coordinates.push(Point3::new(v[3], v[4], v[5]));
        leaflet.normals.push(Vector3::new(v[6], v[7], v[8]));
        leaflet.principal_dir_1.push(Vector3::new(v[9], v[10], v[11]));
        leaflet
            .principal_dir_2
            .push(Vector3::new(v[12], v[13], v[14]));
        leaflet.curvature_1.push(v[15]);
        leaflet.curvature_2.push(v[16]);
        leaflet.edge_flags.push(v[17] != 0.0);
    }

    leaflet
        .validate()
        .map_err(|source| PointDirError::Leaflet { file, source })?;
    Ok((leaflet, box_size))
}

fn parse_box_line(line: &str, file: &'static str) -> Result<Vector3<f64>, PointDirError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 || fields[0] != "Box" {
        return Err(PointDirError::Malformed {
            file,
            line: 1,
            message: format!("expected 'Box Lx Ly Lz' header, found '{}'", line.trim()),
        });
    }
    let mut extents = [0.0; 3];
    for (i, field) in fields[1..4].iter().enumerate() {
        extents[i] = field.parse::<f64>().map_err(|_| PointDirError::Malformed {
            file,
            line: 1,
            message: format!("invalid box extent '{field}'"),
        })?;
    }
    Ok(Vector3::new(extents[0], extents[1], extents[2]))
}

fn read_inclusion_file(path: &Path) -> Result<InclusionSet, PointDirError> {
    if !path.is_file() {
        return Ok(InclusionSet::new());
    }
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if index < 2 || line.trim().is_empty() {
            continue;
        }
        let number = index + 1;
        let v = parse_columns(&line, INCLUSION_COLUMNS, INCLUSION_FILE, number)?;
        records.push(Inclusion {
            id: column_u32(v[0], INCLUSION_FILE, number, "inclusion id")?,
            type_id: column_i32(v[1], INCLUSION_FILE, number, "type id")?,
            point_id: column_u32(v[2], INCLUSION_FILE, number, "point id")?,
            orientation: Vector3::new(v[3], v[4], v[5]),
        });
    }
    Ok(InclusionSet::from_records(records))
}

fn read_exclusion_file(path: &Path) -> Result<ExclusionSet, PointDirError> {
    if !path.is_file() {
        return Ok(ExclusionSet::new());
    }
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if index < 2 || line.trim().is_empty() {
            continue;
        }
        let number = index + 1;
        let v = parse_columns(&line, EXCLUSION_COLUMNS, EXCLUSION_FILE, number)?;
        records.push(Exclusion {
            id: column_u32(v[0], EXCLUSION_FILE, number, "exclusion id")?,
            point_id: column_u32(v[1], EXCLUSION_FILE, number, "point id")?,
            radius: v[2],
        });
    }
    Ok(ExclusionSet::from_records(records))
}

fn write_leaflet_file(
    path: &Path,
    leaflet: &Leaflet,
    kind: LeafletKind,
    box_size: Option<Vector3<f64>>,
) -> Result<(), PointDirError> {
    let mut w = BufWriter::new(File::create(path)?);

    if let Some(b) = box_size {
        writeln!(w, "Box     {:.3}     {:.3}     {:.3}", b.x, b.y, b.z)?;
    }
    writeln!(w, "< Point NoPoints     {}>", leaflet.len())?;
    writeln!(
        w,
        "< id domain_id area X Y Z Nx Ny Nz P1x P1y P1z P2x P2y P2z C1 C2 vtype >"
    )?;
    writeln!(
        w,
        "< {} >",
        match kind {
            LeafletKind::Outer => "Outer",
            LeafletKind::Inner => "Inner",
        }
    )?;

    for i in 0..leaflet.len() {
        let p = leaflet.coordinates[i];
        let n = leaflet.normals[i];
        let d1 = leaflet.principal_dir_1[i];
        let d2 = leaflet.principal_dir_2[i];
        writeln!(
            w,
            "{:>10} {:>4} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>9}",
            leaflet.ids[i],
            leaflet.domain_ids[i],
            leaflet.areas[i],
            p.x,
            p.y,
            p.z,
            n.x,
            n.y,
            n.z,
            d1.x,
            d1.y,
            d1.z,
            d2.x,
            d2.y,
            d2.z,
            leaflet.curvature_1[i],
            leaflet.curvature_2[i],
            leaflet.edge_flags[i] as i32,
        )?;
    }

    w.flush()?;
    debug!(
        "Wrote {} points to {}",
        leaflet.len(),
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    Ok(())
}

fn write_inclusion_file(path: &Path, inclusions: &InclusionSet) -> Result<(), PointDirError> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "< Inclusion NoInc {} >", inclusions.len())?;
    writeln!(w, "< id typeid pointid lx ly lz >")?;
    for inc in inclusions.iter() {
        let o = inc.orientation;
        writeln!(
            w,
            "{:>12} {:>12} {:>12} {:>8.3} {:>8.3} {:>8.3}",
            inc.id, inc.type_id, inc.point_id, o.x, o.y, o.z
        )?;
    }
    w.flush()?;
    Ok(())
}

fn write_exclusion_file(path: &Path, exclusions: &ExclusionSet) -> Result<(), PointDirError> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "< Exclusion NoExc {} >", exclusions.len())?;
    writeln!(w, "< id typeid radius >")?;
    for exc in exclusions.iter() {
        writeln!(
            w,
            "{:>12} {:>12} {:>12.3}",
            exc.id, exc.point_id, exc.radius
        )?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_membrane(n: usize, bilayer: bool) -> Membrane {
        let coords: Vec<Point3<f64>> = (0..n)
            .map(|i| Point3::new(i as f64 * 1.5, -2.0 + i as f64, 0.25))
            .collect();
        let mut outer = Leaflet::from_coordinates(coords.clone());
        outer.curvature_1 = (0..n).map(|i| -0.1 * i as f64).collect();
        outer.curvature_2 = (0..n).map(|i| 0.05 * i as f64).collect();
        outer.domain_ids = (0..n as i32).collect();

        let mut membrane = Membrane::new(Vector3::new(50.0, 50.0, 30.0), outer);
        if bilayer {
            membrane.inner = Some(Leaflet::from_coordinates(coords));
        }
        membrane
    }

    #[test]
    fn save_and_load_round_trips_a_bilayer() {
        let dir = tempdir().unwrap();
        let mut membrane = sample_membrane(5, true);
        membrane.inclusions.add(3, 2, None);
        membrane.exclusions.add_pore(4, 2.5);

        save_membrane(&membrane, dir.path()).unwrap();
        let loaded = load_membrane(dir.path()).unwrap();

        assert!(!loaded.is_monolayer());
        assert_eq!(loaded.outer.len(), 5);
        assert_eq!(loaded.outer.domain_ids, membrane.outer.domain_ids);
        assert_eq!(loaded.inclusions.len(), 1);
        assert_eq!(loaded.inclusions.iter().next().unwrap().point_id, 2);
        assert_eq!(loaded.exclusions.len(), 1);
        assert!((loaded.box_size.x - 50.0).abs() < 1e-9);
        for i in 0..5 {
            assert!((loaded.outer.coordinates[i] - membrane.outer.coordinates[i]).norm() < 1e-3);
            assert!((loaded.outer.mean_curvature(i) - membrane.outer.mean_curvature(i)).abs() < 1e-3);
        }
    }

    #[test]
    fn missing_inner_file_marks_monolayer() {
        let dir = tempdir().unwrap();
        save_membrane(&sample_membrane(3, false), dir.path()).unwrap();
        let loaded = load_membrane(dir.path()).unwrap();
        assert!(loaded.is_monolayer());
        assert!(loaded.inclusions.is_empty());
    }

    #[test]
    fn missing_outer_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = load_membrane(dir.path()).unwrap_err();
        assert!(matches!(err, PointDirError::MissingOuter(_)));
    }

    #[test]
    fn glued_negative_columns_are_split() {
        let cols: Vec<f64> = split_columns("1.250-3.500 7.0e-2-1.0")
            .map(|c| c.parse().unwrap())
            .collect();
        assert_eq!(cols, vec![1.25, -3.5, 0.07, -1.0]);
    }

    #[test]
    fn negative_ids_are_rejected_not_truncated() {
        let dir = tempdir().unwrap();
        let content = "\
Box     10.000     10.000     10.000
< Point NoPoints     1>
< id domain_id area X Y Z Nx Ny Nz P1x P1y P1z P2x P2y P2z C1 C2 vtype >
< Outer >
-1 0 1.0 0.0 0.0 0.0 0.0 0.0 1.0 1.0 0.0 0.0 0.0 1.0 0.0 0.0 0.0 0
";
        fs::write(dir.path().join(OUTER_FILE), content).unwrap();

        match load_membrane(dir.path()).unwrap_err() {
            PointDirError::Malformed {
                file,
                line,
                message,
            } => {
                assert_eq!(file, OUTER_FILE);
                assert_eq!(line, 5);
                assert!(message.contains("point id"), "{message}");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn fractional_inclusion_point_ids_are_rejected() {
        let dir = tempdir().unwrap();
        save_membrane(&sample_membrane(3, false), dir.path()).unwrap();
        fs::write(
            dir.path().join(INCLUSION_FILE),
            "< Inclusion NoInc 1 >\n< id typeid pointid lx ly lz >\n0 1 2.5 1.0 0.0 0.0\n",
        )
        .unwrap();

        let err = load_membrane(dir.path()).unwrap_err();
        assert!(matches!(err, PointDirError::Malformed { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn backups_get_incrementally_hashed_names() {
        let dir = tempdir().unwrap();
        let point = dir.path().join("point");
        save_membrane(&sample_membrane(2, false), &point).unwrap();

        let first = create_backup(&point).unwrap();
        let second = create_backup(&point).unwrap();

        assert_eq!(first.file_name().unwrap(), "#point#");
        assert_eq!(second.file_name().unwrap(), "##point##");
        assert!(first.join(OUTER_FILE).is_file());
    }
}
