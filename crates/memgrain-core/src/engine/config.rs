use crate::core::models::leaflet::LeafletSelection;
use crate::core::models::lipid::{self, LipidSpec, LipidSpecError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("No lipid specifications were provided")]
    NoLipids,

    #[error("Lipid fractions must sum to 1.0 (got {total:.3})")]
    InvalidFractions { total: f64 },

    #[error("Lipid '{name}' has fraction {fraction}, expected a value in (0, 1]")]
    FractionOutOfRange { name: String, fraction: f64 },

    #[error("A stamp needs at least one center source: a protein type or manual point ids")]
    NoCenterSource,

    #[error("Radius must be positive, got {0}")]
    NonPositiveRadius(f64),
}

/// How "within radius of a center" is measured when stamping domains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceMode {
    /// Straight-line periodic distance.
    Euclidean,
    /// Shortest-path distance over the short-edge proximity graph.
    Geodesic { edge_cutoff: f64 },
}

/// Parameters of the curvature-weighted global mix policy.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainMixConfig {
    pub lipids: Vec<LipidSpec>,
    pub selection: LeafletSelection,
    pub k_factor: f64,
    pub area_weighted: bool,
    pub seed: Option<u64>,
}

#[derive(Default)]
pub struct DomainMixConfigBuilder {
    lipids: Option<Vec<LipidSpec>>,
    selection: Option<LeafletSelection>,
    k_factor: Option<f64>,
    area_weighted: bool,
    seed: Option<u64>,
}

impl DomainMixConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lipids(mut self, lipids: Vec<LipidSpec>) -> Self {
        self.lipids = Some(lipids);
        self
    }
    pub fn selection(mut self, selection: LeafletSelection) -> Self {
        self.selection = Some(selection);
        self
    }
    pub fn k_factor(mut self, k: f64) -> Self {
        self.k_factor = Some(k);
        self
    }
    pub fn area_weighted(mut self, on: bool) -> Self {
        self.area_weighted = on;
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<DomainMixConfig, ConfigError> {
        let lipids = self.lipids.ok_or(ConfigError::MissingParameter("lipids"))?;
        match lipid::validate_fractions(&lipids) {
            Ok(()) => {}
            Err(LipidSpecError::Empty) => return Err(ConfigError::NoLipids),
            Err(LipidSpecError::FractionSum { total }) => {
                return Err(ConfigError::InvalidFractions { total });
            }
            Err(LipidSpecError::FractionRange { name, fraction }) => {
                return Err(ConfigError::FractionOutOfRange { name, fraction });
            }
            // validate_fractions only produces the variants above.
            Err(_) => unreachable!(),
        }
        Ok(DomainMixConfig {
            lipids,
            selection: self.selection.unwrap_or(LeafletSelection::Both),
            k_factor: self.k_factor.unwrap_or(1.0),
            area_weighted: self.area_weighted,
            seed: self.seed,
        })
    }
}

/// Parameters of the local radius/geodesic stamping policy.
#[derive(Debug, Clone, PartialEq)]
pub struct StampConfig {
    pub radius: f64,
    pub domain_id: i32,
    /// Inclusions of this type contribute their anchor points as centers.
    pub protein_type: Option<i32>,
    /// Explicit center point ids, appended after type-derived centers.
    pub manual_points: Vec<u32>,
    pub selection: LeafletSelection,
    pub mode: DistanceMode,
}

#[derive(Default)]
pub struct StampConfigBuilder {
    radius: Option<f64>,
    domain_id: Option<i32>,
    protein_type: Option<i32>,
    manual_points: Vec<u32>,
    selection: Option<LeafletSelection>,
    mode: Option<DistanceMode>,
}

impl StampConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }
    pub fn domain_id(mut self, id: i32) -> Self {
        self.domain_id = Some(id);
        self
    }
    pub fn protein_type(mut self, type_id: Option<i32>) -> Self {
        self.protein_type = type_id;
        self
    }
    pub fn manual_points(mut self, points: Vec<u32>) -> Self {
        self.manual_points = points;
        self
    }
    pub fn selection(mut self, selection: LeafletSelection) -> Self {
        self.selection = Some(selection);
        self
    }
    pub fn mode(mut self, mode: DistanceMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn build(self) -> Result<StampConfig, ConfigError> {
        let radius = self.radius.ok_or(ConfigError::MissingParameter("radius"))?;
        if radius <= 0.0 {
            return Err(ConfigError::NonPositiveRadius(radius));
        }
        if self.protein_type.is_none() && self.manual_points.is_empty() {
            return Err(ConfigError::NoCenterSource);
        }
        Ok(StampConfig {
            radius,
            domain_id: self
                .domain_id
                .ok_or(ConfigError::MissingParameter("domain_id"))?,
            protein_type: self.protein_type,
            manual_points: self.manual_points,
            selection: self.selection.unwrap_or(LeafletSelection::Both),
            mode: self.mode.unwrap_or(DistanceMode::Euclidean),
        })
    }
}

/// Parameters of the protein inclusion placement policy.
#[derive(Debug, Clone, PartialEq)]
pub struct InclusionConfig {
    pub protein_type: i32,
    /// Minimum allowed separation between inclusions.
    pub radius: f64,
    pub count: usize,
    pub preferred_curvature: Option<f64>,
    pub k_factor: f64,
    pub seed: Option<u64>,
}

#[derive(Default)]
pub struct InclusionConfigBuilder {
    protein_type: Option<i32>,
    radius: Option<f64>,
    count: Option<usize>,
    preferred_curvature: Option<f64>,
    k_factor: Option<f64>,
    seed: Option<u64>,
}

impl InclusionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn protein_type(mut self, type_id: i32) -> Self {
        self.protein_type = Some(type_id);
        self
    }
    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }
    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
    pub fn preferred_curvature(mut self, curvature: Option<f64>) -> Self {
        self.preferred_curvature = curvature;
        self
    }
    pub fn k_factor(mut self, k: f64) -> Self {
        self.k_factor = Some(k);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<InclusionConfig, ConfigError> {
        let radius = self.radius.ok_or(ConfigError::MissingParameter("radius"))?;
        if radius <= 0.0 {
            return Err(ConfigError::NonPositiveRadius(radius));
        }
        Ok(InclusionConfig {
            protein_type: self
                .protein_type
                .ok_or(ConfigError::MissingParameter("protein_type"))?,
            radius,
            count: self.count.ok_or(ConfigError::MissingParameter("count"))?,
            preferred_curvature: self.preferred_curvature,
            k_factor: self.k_factor.unwrap_or(1.0),
            seed: self.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lipid(domain_id: i32, fraction: f64) -> LipidSpec {
        LipidSpec {
            domain_id,
            name: format!("L{domain_id}"),
            fraction,
            curvature: 0.0,
            density: 1.0,
        }
    }

    #[test]
    fn mix_builder_applies_defaults() {
        let config = DomainMixConfigBuilder::new()
            .lipids(vec![lipid(0, 0.5), lipid(1, 0.5)])
            .build()
            .unwrap();
        assert_eq!(config.selection, LeafletSelection::Both);
        assert_eq!(config.k_factor, 1.0);
        assert!(!config.area_weighted);
        assert!(config.seed.is_none());
    }

    #[test]
    fn mix_builder_rejects_bad_fractions() {
        let err = DomainMixConfigBuilder::new()
            .lipids(vec![lipid(0, 0.5), lipid(1, 0.3)])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFractions { .. }));
    }

    #[test]
    fn mix_builder_rejects_out_of_range_fractions() {
        let err = DomainMixConfigBuilder::new()
            .lipids(vec![lipid(0, -0.5), lipid(1, 1.5)])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FractionOutOfRange { .. }));
    }

    #[test]
    fn mix_builder_requires_lipids() {
        assert_eq!(
            DomainMixConfigBuilder::new().build().unwrap_err(),
            ConfigError::MissingParameter("lipids")
        );
    }

    #[test]
    fn stamp_builder_requires_a_center_source() {
        let err = StampConfigBuilder::new()
            .radius(5.0)
            .domain_id(2)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::NoCenterSource);

        let ok = StampConfigBuilder::new()
            .radius(5.0)
            .domain_id(2)
            .manual_points(vec![3, 7, 22])
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn stamp_builder_rejects_non_positive_radius() {
        let err = StampConfigBuilder::new()
            .radius(0.0)
            .domain_id(2)
            .manual_points(vec![1])
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveRadius(0.0));
    }

    #[test]
    fn inclusion_builder_round_trip() {
        let config = InclusionConfigBuilder::new()
            .protein_type(4)
            .radius(8.0)
            .count(12)
            .preferred_curvature(Some(0.1))
            .seed(Some(99))
            .build()
            .unwrap();
        assert_eq!(config.protein_type, 4);
        assert_eq!(config.count, 12);
        assert_eq!(config.k_factor, 1.0);
    }
}
