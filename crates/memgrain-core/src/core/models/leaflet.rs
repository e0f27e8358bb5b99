use super::exclusion::ExclusionSet;
use super::inclusion::InclusionSet;
use nalgebra::{Point3, Vector3};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeafletError {
    #[error("Leaflet array '{field}' has length {got}, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        got: usize,
        expected: usize,
    },
}

/// Which monolayer sheet of the membrane a piece of data belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafletKind {
    Outer,
    Inner,
}

impl std::fmt::Display for LeafletKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeafletKind::Outer => write!(f, "outer"),
            LeafletKind::Inner => write!(f, "inner"),
        }
    }
}

/// Which leaflet(s) a policy invocation should touch.
///
/// The selection is a request, not a guarantee: it is resolved against the
/// membrane's monolayer flag by [`Membrane::resolve_selection`], and a
/// monolayer only ever exposes its outer leaflet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafletSelection {
    Outer,
    Inner,
    Both,
}

/// One monolayer sheet of a membrane mesh.
///
/// All per-point arrays are index-aligned: `domain_ids[i]`, `areas[i]`,
/// `coordinates[i]` and so on all describe the point with id `ids[i]`.
/// `domain_ids` is the only field the engine mutates.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaflet {
    pub ids: Vec<u32>,
    pub domain_ids: Vec<i32>,
    pub areas: Vec<f64>,
    pub coordinates: Vec<Point3<f64>>,
    pub normals: Vec<Vector3<f64>>,
    pub principal_dir_1: Vec<Vector3<f64>>,
    pub principal_dir_2: Vec<Vector3<f64>>,
    pub curvature_1: Vec<f64>,
    pub curvature_2: Vec<f64>,
    pub edge_flags: Vec<bool>,
}

impl Leaflet {
    /// Builds a leaflet from bare coordinates with neutral defaults for every
    /// other property: sequential ids, domain 0, unit area, +z normals, flat
    /// curvature, no edge points.
    pub fn from_coordinates(coordinates: Vec<Point3<f64>>) -> Self {
        let n = coordinates.len();
        Self {
            ids: (0..n as u32).collect(),
            domain_ids: vec![0; n],
            areas: vec![1.0; n],
            coordinates,
            normals: vec![Vector3::z(); n],
            principal_dir_1: vec![Vector3::x(); n],
            principal_dir_2: vec![Vector3::y(); n],
            curvature_1: vec![0.0; n],
            curvature_2: vec![0.0; n],
            edge_flags: vec![false; n],
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Mean curvature of one point, `(c1 + c2) / 2`.
    #[inline]
    pub fn mean_curvature(&self, index: usize) -> f64 {
        (self.curvature_1[index] + self.curvature_2[index]) / 2.0
    }

    pub fn mean_curvatures(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.mean_curvature(i)).collect()
    }

    /// Checks that all per-point arrays are index-aligned.
    pub fn validate(&self) -> Result<(), LeafletError> {
        let expected = self.ids.len();
        let check = |field: &'static str, got: usize| {
            if got == expected {
                Ok(())
            } else {
                Err(LeafletError::LengthMismatch {
                    field,
                    got,
                    expected,
                })
            }
        };
        check("domain_ids", self.domain_ids.len())?;
        check("areas", self.areas.len())?;
        check("coordinates", self.coordinates.len())?;
        check("normals", self.normals.len())?;
        check("principal_dir_1", self.principal_dir_1.len())?;
        check("principal_dir_2", self.principal_dir_2.len())?;
        check("curvature_1", self.curvature_1.len())?;
        check("curvature_2", self.curvature_2.len())?;
        check("edge_flags", self.edge_flags.len())?;
        Ok(())
    }
}

/// A whole membrane: the periodic box, one or two leaflets, and the inclusion
/// and exclusion records that ride along with it.
///
/// `inner == None` marks a monolayer. Leaflet state is loaded once, mutated in
/// place by exactly one policy invocation, then handed back for persistence.
#[derive(Debug, Clone)]
pub struct Membrane {
    pub box_size: Vector3<f64>,
    pub outer: Leaflet,
    pub inner: Option<Leaflet>,
    pub inclusions: InclusionSet,
    pub exclusions: ExclusionSet,
}

impl Membrane {
    /// Creates a monolayer membrane with empty inclusion/exclusion sets.
    pub fn new(box_size: Vector3<f64>, outer: Leaflet) -> Self {
        Self {
            box_size,
            outer,
            inner: None,
            inclusions: InclusionSet::new(),
            exclusions: ExclusionSet::new(),
        }
    }

    pub fn is_monolayer(&self) -> bool {
        self.inner.is_none()
    }

    /// Resolves a requested selection into the concrete leaflets to process,
    /// outer before inner. A monolayer yields only the outer leaflet no matter
    /// what was requested.
    pub fn resolve_selection(&self, selection: LeafletSelection) -> Vec<LeafletKind> {
        if self.is_monolayer() {
            return vec![LeafletKind::Outer];
        }
        match selection {
            LeafletSelection::Outer => vec![LeafletKind::Outer],
            LeafletSelection::Inner => vec![LeafletKind::Inner],
            LeafletSelection::Both => vec![LeafletKind::Outer, LeafletKind::Inner],
        }
    }

    pub fn leaflet(&self, kind: LeafletKind) -> Option<&Leaflet> {
        match kind {
            LeafletKind::Outer => Some(&self.outer),
            LeafletKind::Inner => self.inner.as_ref(),
        }
    }

    pub fn leaflet_mut(&mut self, kind: LeafletKind) -> Option<&mut Leaflet> {
        match kind {
            LeafletKind::Outer => Some(&mut self.outer),
            LeafletKind::Inner => self.inner.as_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_leaflet(n: usize) -> Leaflet {
        let coords = (0..n).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect();
        Leaflet::from_coordinates(coords)
    }

    #[test]
    fn from_coordinates_builds_aligned_arrays() {
        let leaflet = flat_leaflet(7);
        assert_eq!(leaflet.len(), 7);
        assert!(leaflet.validate().is_ok());
        assert_eq!(leaflet.ids, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn validate_catches_misaligned_arrays() {
        let mut leaflet = flat_leaflet(4);
        leaflet.domain_ids.pop();
        assert_eq!(
            leaflet.validate(),
            Err(LeafletError::LengthMismatch {
                field: "domain_ids",
                got: 3,
                expected: 4,
            })
        );
    }

    #[test]
    fn mean_curvature_averages_principal_curvatures() {
        let mut leaflet = flat_leaflet(2);
        leaflet.curvature_1 = vec![0.2, -0.4];
        leaflet.curvature_2 = vec![0.4, 0.0];
        assert!((leaflet.mean_curvature(0) - 0.3).abs() < 1e-12);
        assert!((leaflet.mean_curvature(1) + 0.2).abs() < 1e-12);
    }

    #[test]
    fn monolayer_resolves_every_selection_to_outer() {
        let membrane = Membrane::new(Vector3::new(10.0, 10.0, 10.0), flat_leaflet(3));
        assert!(membrane.is_monolayer());
        for selection in [
            LeafletSelection::Outer,
            LeafletSelection::Inner,
            LeafletSelection::Both,
        ] {
            assert_eq!(
                membrane.resolve_selection(selection),
                vec![LeafletKind::Outer]
            );
        }
    }

    #[test]
    fn bilayer_resolves_both_outer_first() {
        let mut membrane = Membrane::new(Vector3::new(10.0, 10.0, 10.0), flat_leaflet(3));
        membrane.inner = Some(flat_leaflet(3));
        assert_eq!(
            membrane.resolve_selection(LeafletSelection::Both),
            vec![LeafletKind::Outer, LeafletKind::Inner]
        );
        assert_eq!(
            membrane.resolve_selection(LeafletSelection::Inner),
            vec![LeafletKind::Inner]
        );
    }
}
