use nalgebra::Vector3;

/// A point-anchored protein placed on the outer leaflet.
///
/// Ids are sequential within one membrane; the orientation vector is
/// normalized at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Inclusion {
    pub id: u32,
    pub type_id: i32,
    pub point_id: u32,
    pub orientation: Vector3<f64>,
}

/// The append-only collection of protein inclusions carried by a membrane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InclusionSet {
    records: Vec<Inclusion>,
}

impl InclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps records loaded from disk, keeping their file order.
    pub fn from_records(records: Vec<Inclusion>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Inclusion> {
        self.records.iter()
    }

    /// All inclusions of one protein type, in insertion order.
    pub fn of_type(&self, type_id: i32) -> impl Iterator<Item = &Inclusion> {
        self.records.iter().filter(move |i| i.type_id == type_id)
    }

    /// Anchoring point ids of every inclusion, in insertion order.
    pub fn point_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.records.iter().map(|i| i.point_id)
    }

    /// Appends a protein inclusion with the next sequential id.
    ///
    /// The orientation defaults to +x and is normalized; a zero-length vector
    /// falls back to the default rather than producing NaNs.
    pub fn add(
        &mut self,
        type_id: i32,
        point_id: u32,
        orientation: Option<Vector3<f64>>,
    ) -> &Inclusion {
        let raw = orientation.unwrap_or_else(Vector3::x);
        let orientation = if raw.norm() > f64::EPSILON {
            raw.normalize()
        } else {
            Vector3::x()
        };
        self.records.push(Inclusion {
            id: self.records.len() as u32,
            type_id,
            point_id,
            orientation,
        });
        self.records.last().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_assigns_sequential_ids_and_default_orientation() {
        let mut set = InclusionSet::new();
        set.add(2, 10, None);
        set.add(2, 11, None);
        set.add(5, 12, None);

        let ids: Vec<u32> = set.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(set.iter().next().unwrap().orientation, Vector3::x());
    }

    #[test]
    fn add_normalizes_orientation() {
        let mut set = InclusionSet::new();
        let inc = set.add(1, 0, Some(Vector3::new(0.0, 3.0, 4.0)));
        assert!((inc.orientation.norm() - 1.0).abs() < 1e-12);
        assert!((inc.orientation.y - 0.6).abs() < 1e-12);
        assert!((inc.orientation.z - 0.8).abs() < 1e-12);
    }

    #[test]
    fn zero_orientation_falls_back_to_default() {
        let mut set = InclusionSet::new();
        let inc = set.add(1, 0, Some(Vector3::zeros()));
        assert_eq!(inc.orientation, Vector3::x());
    }

    #[test]
    fn of_type_filters_in_insertion_order() {
        let mut set = InclusionSet::new();
        set.add(7, 3, None);
        set.add(9, 4, None);
        set.add(7, 5, None);

        let points: Vec<u32> = set.of_type(7).map(|i| i.point_id).collect();
        assert_eq!(points, vec![3, 5]);
        assert_eq!(set.of_type(42).count(), 0);
    }
}
