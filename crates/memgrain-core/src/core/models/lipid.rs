use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Allowed deviation of the lipid fraction sum from 1.0.
pub const FRACTION_TOLERANCE: f64 = 0.01;

#[derive(Debug, Error)]
pub enum LipidSpecError {
    #[error("No lipid specifications were provided")]
    Empty,

    #[error("Lipid fractions must sum to 1.0 within ±{FRACTION_TOLERANCE} (got {total:.3})")]
    FractionSum { total: f64 },

    #[error("Lipid '{name}' has fraction {fraction}, expected a value in (0, 1]")]
    FractionRange { name: String, fraction: f64 },

    #[error("Malformed lipid spec at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Specification of one lipid type for the curvature-weighted mix policy.
#[derive(Debug, Clone, PartialEq)]
pub struct LipidSpec {
    pub domain_id: i32,
    pub name: String,
    /// Target fraction of points in (0, 1].
    pub fraction: f64,
    /// Preferred mean curvature of this lipid type.
    pub curvature: f64,
    /// Packing density, passed through to the membrane-builder input file.
    pub density: f64,
}

/// Checks that each fraction lies in `(0, 1]` and that the fractions of one
/// assignment sum to 1.0 within tolerance.
pub fn validate_fractions(lipids: &[LipidSpec]) -> Result<(), LipidSpecError> {
    if lipids.is_empty() {
        return Err(LipidSpecError::Empty);
    }
    for lipid in lipids {
        if !(lipid.fraction > 0.0 && lipid.fraction <= 1.0) {
            return Err(LipidSpecError::FractionRange {
                name: lipid.name.clone(),
                fraction: lipid.fraction,
            });
        }
    }
    let total: f64 = lipids.iter().map(|l| l.fraction).sum();
    if (total - 1.0).abs() > FRACTION_TOLERANCE {
        return Err(LipidSpecError::FractionSum { total });
    }
    Ok(())
}

/// Parses lipid specifications from the plain-text spec format: one lipid per
/// line as `domain_id name fraction curvature density`, with blank lines and
/// `;` comments ignored. Validates the fraction sum before returning.
pub fn parse_lipid_specs(reader: impl BufRead) -> Result<Vec<LipidSpec>, LipidSpecError> {
    let mut lipids = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(LipidSpecError::Parse {
                line: number + 1,
                message: format!("expected 5 fields, found {}", fields.len()),
            });
        }

        let parse_num = |field: &str, what: &str| -> Result<f64, LipidSpecError> {
            field.parse::<f64>().map_err(|_| LipidSpecError::Parse {
                line: number + 1,
                message: format!("invalid {what}: '{field}'"),
            })
        };

        lipids.push(LipidSpec {
            domain_id: parse_num(fields[0], "domain id")? as i32,
            name: fields[1].to_string(),
            fraction: parse_num(fields[2], "fraction")?,
            curvature: parse_num(fields[3], "curvature")?,
            density: parse_num(fields[4], "density")?,
        });
    }

    validate_fractions(&lipids)?;
    Ok(lipids)
}

pub fn load_lipid_specs<P: AsRef<Path>>(path: P) -> Result<Vec<LipidSpec>, LipidSpecError> {
    let file = File::open(path)?;
    parse_lipid_specs(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_spec_lines_and_skips_comments() {
        let input = "\
; domain_id name fraction curvature density
1 POPC 0.6 0.2 1.0

2 DOPE 0.4 -0.3 0.95
";
        let lipids = parse_lipid_specs(Cursor::new(input)).unwrap();
        assert_eq!(lipids.len(), 2);
        assert_eq!(lipids[0].domain_id, 1);
        assert_eq!(lipids[0].name, "POPC");
        assert!((lipids[1].curvature + 0.3).abs() < 1e-12);
    }

    #[test]
    fn rejects_fractions_not_summing_to_one() {
        let input = "1 POPC 0.5 0.0 1.0\n2 DOPE 0.4 0.0 1.0\n";
        let err = parse_lipid_specs(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, LipidSpecError::FractionSum { total } if (total - 0.9).abs() < 1e-12));
    }

    #[test]
    fn accepts_fraction_sum_within_tolerance() {
        let input = "1 POPC 0.503 0.0 1.0\n2 DOPE 0.5 0.0 1.0\n";
        assert!(parse_lipid_specs(Cursor::new(input)).is_ok());
    }

    #[test]
    fn rejects_fractions_outside_unit_interval() {
        // Compensating pairs must not slip past the sum check.
        let input = "1 POPC -0.5 0.0 1.0\n2 DOPE 1.5 0.0 1.0\n";
        let err = parse_lipid_specs(Cursor::new(input)).unwrap_err();
        assert!(
            matches!(err, LipidSpecError::FractionRange { ref name, .. } if name == "POPC"),
            "{err}"
        );

        let zero = "1 POPC 0.0 0.0 1.0\n2 DOPE 1.0 0.0 1.0\n";
        assert!(matches!(
            parse_lipid_specs(Cursor::new(zero)).unwrap_err(),
            LipidSpecError::FractionRange { .. }
        ));
    }

    #[test]
    fn rejects_malformed_lines() {
        let input = "1 POPC 0.6 0.2\n";
        let err = parse_lipid_specs(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, LipidSpecError::Parse { line: 1, .. }));
    }

    #[test]
    fn rejects_empty_spec() {
        let err = parse_lipid_specs(Cursor::new("; nothing here\n")).unwrap_err();
        assert!(matches!(err, LipidSpecError::Empty));
    }
}
