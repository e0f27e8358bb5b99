use crate::core::models::leaflet::LeafletKind;
use serde::Serialize;

/// Target and achieved point counts for one lipid type on one leaflet.
///
/// `assigned` always equals `target` when the run completes: quota
/// bookkeeping is exact, the field exists so callers can verify it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LipidCount {
    pub domain_id: i32,
    pub name: String,
    pub target: usize,
    pub assigned: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafletMixReport {
    pub leaflet: LeafletKind,
    pub points: usize,
    pub lipids: Vec<LipidCount>,
    /// Draws where the candidate set was unexpectedly empty and the full
    /// lipid list was used instead. Should stay zero; a non-zero value means
    /// quotas and point count disagreed.
    pub fallback_draws: usize,
}

/// Outcome of one curvature-weighted mix invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MixReport {
    pub leaflets: Vec<LeafletMixReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafletStampReport {
    pub leaflet: LeafletKind,
    /// Distinct points that received the target domain id.
    pub stamped_points: usize,
    /// Center point ids outside this leaflet's range, skipped with a warning.
    pub skipped_centers: Vec<u32>,
}

/// Outcome of one local stamping invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StampReport {
    pub leaflets: Vec<LeafletStampReport>,
}

/// Outcome of one inclusion placement invocation.
///
/// A shortfall (`placed < requested`) is reported here, not raised as an
/// error: running out of placeable points is an expected end state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlacementReport {
    pub requested: usize,
    pub placed: usize,
    /// Anchor point of each new inclusion, in placement order.
    pub point_ids: Vec<u32>,
    /// Pre-existing inclusions whose anchor id was out of range and was
    /// ignored when seeding the excluded set.
    pub skipped_anchors: Vec<u32>,
}

impl PlacementReport {
    pub fn shortfall(&self) -> usize {
        self.requested - self.placed
    }

    pub fn is_complete(&self) -> bool {
        self.placed == self.requested
    }
}
