use nalgebra::{Point3, Vector3};

/// Periodic nearest-neighbor index over a leaflet's point coordinates.
///
/// A cell list over the simulation box, periodic in every axis. Coordinates
/// are wrapped into the canonical `[0, box)` window at construction (shifted
/// by half a box first, matching the on-disk convention of centered
/// coordinates); queries return only point indices, so the wrap offset is
/// invisible to callers.
///
/// The index is read-only. It must be rebuilt if the underlying coordinates
/// change, which never happens within a single engine invocation.
#[derive(Debug)]
pub struct PeriodicIndex {
    wrapped: Vec<Point3<f64>>,
    box_size: Vector3<f64>,
    dims: [usize; 3],
    cell_len: [f64; 3],
    cells: Vec<Vec<u32>>,
}

impl PeriodicIndex {
    /// Builds the index. `cell_size` is a performance hint, typically the
    /// radius of the queries that will follow; queries with any radius remain
    /// correct.
    pub fn new(coordinates: &[Point3<f64>], box_size: Vector3<f64>, cell_size: f64) -> Self {
        debug_assert!(box_size.iter().all(|&l| l > 0.0));
        let cell_size = cell_size.max(f64::EPSILON);

        // Cap the grid resolution by the point count: a tiny query radius in
        // a large box must not allocate an enormous, mostly-empty grid. Query
        // correctness is independent of the resolution.
        let axis_cap = ((coordinates.len().max(1) as f64).cbrt().ceil() as usize).max(1);

        let mut dims = [1usize; 3];
        let mut cell_len = [0.0f64; 3];
        for axis in 0..3 {
            dims[axis] = ((box_size[axis] / cell_size).floor() as usize).clamp(1, axis_cap);
            cell_len[axis] = box_size[axis] / dims[axis] as f64;
        }

        let wrapped: Vec<Point3<f64>> = coordinates
            .iter()
            .map(|p| {
                Point3::new(
                    wrap(p.x + box_size.x / 2.0, box_size.x),
                    wrap(p.y + box_size.y / 2.0, box_size.y),
                    wrap(p.z + box_size.z / 2.0, box_size.z),
                )
            })
            .collect();

        let mut cells = vec![Vec::new(); dims[0] * dims[1] * dims[2]];
        for (i, p) in wrapped.iter().enumerate() {
            let cell = cell_of(p, &dims, &cell_len);
            cells[flat_index(cell, &dims)].push(i as u32);
        }

        Self {
            wrapped,
            box_size,
            dims,
            cell_len,
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.wrapped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrapped.is_empty()
    }

    /// Minimum-image periodic distance between two indexed points.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        min_image_distance(&self.wrapped[a], &self.wrapped[b], &self.box_size)
    }

    /// All point indices within periodic Euclidean distance `radius` of the
    /// point at `center` (the center itself included), sorted ascending.
    pub fn neighbors_within(&self, center: usize, radius: f64) -> Vec<usize> {
        let origin = self.wrapped[center];
        let mut found: Vec<usize> = self
            .scan_cells(origin, radius)
            .into_iter()
            .filter(|&(_, d)| d <= radius)
            .map(|(i, _)| i)
            .collect();
        found.sort_unstable();
        found
    }

    /// Sparse all-pairs distances: every pair `(i, j)` with `i < j` whose
    /// periodic distance is within `cutoff`, with the distance.
    pub fn pairs_within(&self, cutoff: f64) -> Vec<(usize, usize, f64)> {
        let mut pairs = Vec::new();
        for i in 0..self.wrapped.len() {
            let origin = self.wrapped[i];
            for (j, d) in self.scan_cells(origin, cutoff) {
                if j > i && d <= cutoff {
                    pairs.push((i, j, d));
                }
            }
        }
        pairs
    }

    /// Visits every point in cells that can contain a match for `radius`
    /// around `origin`, returning `(index, periodic distance)` candidates.
    fn scan_cells(&self, origin: Point3<f64>, radius: f64) -> Vec<(usize, f64)> {
        let home = cell_of(&origin, &self.dims, &self.cell_len);

        let mut offsets: [Vec<usize>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for axis in 0..3 {
            let reach = (radius / self.cell_len[axis]).ceil() as usize + 1;
            if 2 * reach + 1 >= self.dims[axis] {
                // Every cell along this axis is in range; enumerate each once.
                offsets[axis] = (0..self.dims[axis]).collect();
            } else {
                let dim = self.dims[axis] as isize;
                offsets[axis] = (-(reach as isize)..=reach as isize)
                    .map(|o| (home[axis] as isize + o).rem_euclid(dim) as usize)
                    .collect();
            }
        }

        let mut candidates = Vec::new();
        for &cx in &offsets[0] {
            for &cy in &offsets[1] {
                for &cz in &offsets[2] {
                    for &i in &self.cells[flat_index([cx, cy, cz], &self.dims)] {
                        let i = i as usize;
                        let d = min_image_distance(&origin, &self.wrapped[i], &self.box_size);
                        candidates.push((i, d));
                    }
                }
            }
        }
        candidates
    }
}

#[inline]
fn wrap(value: f64, length: f64) -> f64 {
    let wrapped = value.rem_euclid(length);
    // rem_euclid can return exactly `length` for tiny negative inputs.
    if wrapped >= length { 0.0 } else { wrapped }
}

#[inline]
fn cell_of(p: &Point3<f64>, dims: &[usize; 3], cell_len: &[f64; 3]) -> [usize; 3] {
    let mut cell = [0usize; 3];
    for axis in 0..3 {
        cell[axis] = ((p[axis] / cell_len[axis]).floor() as usize).min(dims[axis] - 1);
    }
    cell
}

#[inline]
fn flat_index(cell: [usize; 3], dims: &[usize; 3]) -> usize {
    (cell[0] * dims[1] + cell[1]) * dims[2] + cell[2]
}

/// Minimum-image distance between two points wrapped into the same box.
#[inline]
fn min_image_distance(a: &Point3<f64>, b: &Point3<f64>, box_size: &Vector3<f64>) -> f64 {
    let mut sq = 0.0;
    for axis in 0..3 {
        let mut d = a[axis] - b[axis];
        let l = box_size[axis];
        d -= l * (d / l).round();
        sq += d * d;
    }
    sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_line(n: usize, spacing: f64) -> Vec<Point3<f64>> {
        (0..n)
            .map(|i| Point3::new(i as f64 * spacing, 0.0, 0.0))
            .collect()
    }

    #[test]
    fn range_query_finds_plain_neighbors() {
        let coords = grid_line(10, 1.0);
        let index = PeriodicIndex::new(&coords, Vector3::new(100.0, 100.0, 100.0), 2.5);

        assert_eq!(index.neighbors_within(5, 2.5), vec![3, 4, 5, 6, 7]);
        assert_eq!(index.neighbors_within(5, 0.5), vec![5]);
    }

    #[test]
    fn range_query_wraps_around_the_box() {
        // Points at x = 0..9 in a box of length 10: x=0 and x=9 are distance 1
        // apart through the boundary.
        let coords = grid_line(10, 1.0);
        let index = PeriodicIndex::new(&coords, Vector3::new(10.0, 10.0, 10.0), 1.5);

        let neighbors = index.neighbors_within(0, 1.5);
        assert!(neighbors.contains(&9), "wrap-around neighbor missed");
        assert!(neighbors.contains(&1));
        assert!(!neighbors.contains(&2));
    }

    #[test]
    fn distance_uses_minimum_image() {
        let coords = vec![Point3::new(-4.5, 0.0, 0.0), Point3::new(4.5, 0.0, 0.0)];
        let index = PeriodicIndex::new(&coords, Vector3::new(10.0, 10.0, 10.0), 2.0);
        assert!((index.distance(0, 1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn pairs_within_lists_each_pair_once() {
        let coords = grid_line(4, 1.0);
        let index = PeriodicIndex::new(&coords, Vector3::new(50.0, 50.0, 50.0), 1.2);

        let mut pairs = index.pairs_within(1.2);
        pairs.sort_by_key(|&(i, j, _)| (i, j));
        let bare: Vec<(usize, usize)> = pairs.iter().map(|&(i, j, _)| (i, j)).collect();
        assert_eq!(bare, vec![(0, 1), (1, 2), (2, 3)]);
        assert!(pairs.iter().all(|&(_, _, d)| (d - 1.0).abs() < 1e-9));
    }

    #[test]
    fn small_boxes_do_not_double_count_cells() {
        // Radius larger than the whole box: every point matches exactly once.
        let coords = grid_line(5, 1.0);
        let index = PeriodicIndex::new(&coords, Vector3::new(5.0, 5.0, 5.0), 1.0);

        let neighbors = index.neighbors_within(2, 10.0);
        assert_eq!(neighbors, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn query_radius_larger_than_cell_hint_is_still_correct() {
        let coords = grid_line(20, 1.0);
        let index = PeriodicIndex::new(&coords, Vector3::new(100.0, 100.0, 100.0), 1.0);
        assert_eq!(index.neighbors_within(10, 4.0).len(), 9);
    }
}
