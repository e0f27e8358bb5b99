use super::spatial::PeriodicIndex;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Default maximum edge length when building the proximity graph, in the
/// leaflet's length units.
pub const DEFAULT_EDGE_CUTOFF: f64 = 5.0;

/// Undirected proximity graph over leaflet points, edges limited to pairs
/// within a short cutoff distance and weighted by periodic Euclidean distance.
///
/// A plain Euclidean radius query over-includes points sitting on a nearby
/// fold of a curved membrane that are far apart along the surface. Bounding
/// the edge length forces shortest paths to hug the surface, so a bounded
/// shortest-path query behaves like a surface-following radius.
#[derive(Debug)]
pub struct SurfaceGraph {
    adjacency: Vec<Vec<(u32, f64)>>,
}

impl SurfaceGraph {
    /// Builds the graph from the sparse pair distances of a periodic index.
    pub fn build(index: &PeriodicIndex, edge_cutoff: f64) -> Self {
        let mut adjacency = vec![Vec::new(); index.len()];
        for (i, j, d) in index.pairs_within(edge_cutoff) {
            adjacency[i].push((j as u32, d));
            adjacency[j].push((i as u32, d));
        }
        Self { adjacency }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Bounded single-source shortest paths: every node whose path distance
    /// from `source` is within `radius`, as `(node, distance)` sorted by node
    /// index. Dijkstra with early termination at the radius bound.
    ///
    /// Nodes in other connected components are simply absent from the result;
    /// a fragmented graph is normal, not an error.
    pub fn reachable_within(&self, source: usize, radius: f64) -> Vec<(usize, f64)> {
        let n = self.adjacency.len();
        let mut dist = vec![f64::INFINITY; n];
        let mut reached = Vec::new();
        let mut heap = BinaryHeap::new();

        dist[source] = 0.0;
        heap.push(Visit {
            distance: 0.0,
            node: source as u32,
        });

        while let Some(Visit { distance, node }) = heap.pop() {
            // The heap yields ascending distances; past the bound nothing
            // closer can follow.
            if distance > radius {
                break;
            }
            let node = node as usize;
            if distance > dist[node] {
                continue;
            }
            reached.push((node, distance));

            for &(next, weight) in &self.adjacency[node] {
                let next = next as usize;
                let candidate = distance + weight;
                if candidate < dist[next] {
                    dist[next] = candidate;
                    heap.push(Visit {
                        distance: candidate,
                        node: next as u32,
                    });
                }
            }
        }

        reached.sort_unstable_by_key(|&(node, _)| node);
        reached
    }
}

/// Heap entry ordered as a min-heap on distance (ties broken by node index so
/// ordering is total and deterministic).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Visit {
    distance: f64,
    node: u32,
}

impl Eq for Visit {}

impl Ord for Visit {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Visit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
