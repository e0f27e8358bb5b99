/// A lipid-free pore anchored at a mesh point.
///
/// Exclusions are not consulted by the placement engine; they are carried
/// through load/save so that editing domains or inclusions never drops pore
/// definitions from a point folder.
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    pub id: u32,
    pub point_id: u32,
    pub radius: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExclusionSet {
    records: Vec<Exclusion>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Exclusion>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exclusion> {
        self.records.iter()
    }

    /// Adds a pore with the next sequential id.
    pub fn add_pore(&mut self, point_id: u32, radius: f64) -> &Exclusion {
        self.records.push(Exclusion {
            id: self.records.len() as u32,
            point_id,
            radius,
        });
        self.records.last().unwrap()
    }
}
