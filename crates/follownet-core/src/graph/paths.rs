//! Breadth-first distances and sampled average path length
//!
//! All traversals follow directed edges. Distances are hop counts; nodes that
//! cannot be reached are simply absent from the results.

use super::store::{GraphStore, NodeId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info, warn};

const UNREACHED: u32 = u32::MAX;

/// Average shortest-path length together with how it was obtained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathLengthEstimate {
    /// Mean hop count over every reachable ordered pair from the sources
    pub average: f64,
    /// Number of BFS sources actually used
    pub sources: usize,
    /// Number of (source, target) pairs with a finite distance, self excluded
    pub reachable_pairs: u64,
    /// Whether the sources were a random sample rather than every node
    pub sampled: bool,
}

impl PathLengthEstimate {
    fn empty() -> Self {
        Self {
            average: 0.0,
            sources: 0,
            reachable_pairs: 0,
            sampled: false,
        }
    }
}

/// BFS-based distance computations over a [`GraphStore`]
#[derive(Debug, Clone, Copy)]
pub struct PathSampler<'a> {
    store: &'a GraphStore,
    exact_limit: Option<usize>,
}

impl<'a> PathSampler<'a> {
    /// Create a sampler with no cap on exhaustive runs
    pub fn new(store: &'a GraphStore) -> Self {
        Self {
            store,
            exact_limit: None,
        }
    }

    /// Cap the number of sources used when no sample size is requested
    ///
    /// Graphs larger than `limit` nodes are then sampled with `limit`
    /// sources instead of running a BFS from every node.
    pub fn with_exact_limit(mut self, limit: usize) -> Self {
        self.exact_limit = Some(limit);
        self
    }

    /// Hop distance from `source` to every reachable node, `source` included at 0
    ///
    /// Returns an empty map for ids outside `[1, N]`.
    pub fn bfs(&self, source: NodeId) -> HashMap<NodeId, usize> {
        let mut distances = HashMap::new();
        if !self.contains(source) {
            return distances;
        }

        let mut queue = VecDeque::new();
        distances.insert(source, 0);
        queue.push_back(source);

        while let Some(current) = queue.pop_front() {
            let current_distance = distances[&current];
            for &neighbor in self.store.neighbors(current) {
                if let std::collections::hash_map::Entry::Vacant(e) = distances.entry(neighbor) {
                    e.insert(current_distance + 1);
                    queue.push_back(neighbor);
                }
            }
        }

        distances
    }

    /// One shortest directed path from `source` to `target`
    ///
    /// The search stops expanding past `max_depth` hops when a bound is
    /// given. Returns `None` when `target` is unreachable within the bound.
    pub fn shortest_path(
        &self,
        source: NodeId,
        target: NodeId,
        max_depth: Option<usize>,
    ) -> Option<Vec<NodeId>> {
        if !self.contains(source) || !self.contains(target) {
            return None;
        }
        if source == target {
            return Some(vec![source]);
        }

        let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
        let mut queue = VecDeque::new();
        parents.insert(source, source);
        queue.push_back((source, 0usize));

        while let Some((current, depth)) = queue.pop_front() {
            if max_depth.is_some_and(|limit| depth >= limit) {
                continue;
            }
            for &neighbor in self.store.neighbors(current) {
                if parents.contains_key(&neighbor) {
                    continue;
                }
                parents.insert(neighbor, current);
                if neighbor == target {
                    let mut path = vec![target];
                    let mut node = target;
                    while node != source {
                        node = parents[&node];
                        path.push(node);
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back((neighbor, depth + 1));
            }
        }

        None
    }

    /// Mean shortest-path length from a set of BFS sources
    ///
    /// `None` or a size at least `N` uses every node as a source (subject to
    /// the exact limit); otherwise that many distinct sources are drawn
    /// uniformly from `rng`. Returns an average of 0.0 when the graph has no
    /// nodes or no reachable pairs.
    pub fn average_shortest_path_length<R: Rng + ?Sized>(
        &self,
        sample_size: Option<usize>,
        rng: &mut R,
    ) -> PathLengthEstimate {
        let node_count = self.store.node_count();
        if node_count == 0 {
            return PathLengthEstimate::empty();
        }

        let mut requested = sample_size.filter(|&size| size < node_count);
        if requested.is_none() {
            if let Some(limit) = self.exact_limit.filter(|&limit| limit < node_count) {
                warn!(
                    nodes = node_count,
                    limit, "Graph exceeds exact path limit, sampling sources instead"
                );
                requested = Some(limit);
            }
        }

        let sources: Vec<NodeId> = match requested {
            Some(0) => return PathLengthEstimate::empty(),
            Some(size) => rand::seq::index::sample(rng, node_count, size)
                .into_iter()
                .map(|slot| slot as NodeId + 1)
                .collect(),
            None => self.store.nodes().collect(),
        };

        let mut distances = vec![UNREACHED; node_count];
        let mut queue = VecDeque::new();
        let mut total: u64 = 0;
        let mut pairs: u64 = 0;

        for (done, &source) in sources.iter().enumerate() {
            let (sum, reached) = self.bfs_sum(source, &mut distances, &mut queue);
            total += sum;
            pairs += reached;
            if (done + 1) % 10_000 == 0 {
                debug!(done = done + 1, of = sources.len(), "BFS sources processed");
            }
        }

        let average = if pairs > 0 {
            total as f64 / pairs as f64
        } else {
            0.0
        };
        info!(
            sources = sources.len(),
            pairs,
            average,
            sampled = requested.is_some(),
            "Average shortest path computed"
        );

        PathLengthEstimate {
            average,
            sources: sources.len(),
            reachable_pairs: pairs,
            sampled: requested.is_some(),
        }
    }

    /// BFS over reusable buffers; returns (distance sum, reached nodes) with
    /// the source itself excluded
    fn bfs_sum(
        &self,
        source: NodeId,
        distances: &mut [u32],
        queue: &mut VecDeque<NodeId>,
    ) -> (u64, u64) {
        let mut visited = Vec::new();
        let mut sum = 0u64;

        distances[source as usize - 1] = 0;
        visited.push(source);
        queue.push_back(source);

        while let Some(current) = queue.pop_front() {
            let next = distances[current as usize - 1] + 1;
            for &neighbor in self.store.neighbors(current) {
                let slot = neighbor as usize - 1;
                if distances[slot] == UNREACHED {
                    distances[slot] = next;
                    sum += next as u64;
                    visited.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }

        for &node in &visited {
            distances[node as usize - 1] = UNREACHED;
        }
        (sum, visited.len() as u64 - 1)
    }

    fn contains(&self, id: NodeId) -> bool {
        id >= 1 && (id as usize) <= self.store.node_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn chain() -> GraphStore {
        // 1 -> 2 -> 4, 1 -> 3
        GraphStore::from_edges(4, vec![(1, 2), (1, 3), (2, 4)])
    }

    #[test]
    fn test_bfs() {
        let store = chain();
        let sampler = PathSampler::new(&store);
        let result = sampler.bfs(1);
        assert_eq!(result[&1], 0);
        assert_eq!(result[&2], 1);
        assert_eq!(result[&3], 1);
        assert_eq!(result[&4], 2);

        let from_leaf = sampler.bfs(4);
        assert_eq!(from_leaf.len(), 1);
        assert!(sampler.bfs(0).is_empty());
        assert!(sampler.bfs(5).is_empty());
    }

    #[test]
    fn test_average_all_sources() {
        let store = chain();
        let mut rng = StdRng::seed_from_u64(7);
        let estimate = PathSampler::new(&store).average_shortest_path_length(None, &mut rng);
        // from 1: 1 + 1 + 2, from 2: 1
        assert_eq!(estimate.reachable_pairs, 4);
        assert_eq!(estimate.sources, 4);
        assert!(!estimate.sampled);
        assert_relative_eq!(estimate.average, 5.0 / 4.0);
    }

    #[test]
    fn test_average_sampled_uses_distinct_sources() {
        let store = chain();
        let mut rng = StdRng::seed_from_u64(7);
        let estimate = PathSampler::new(&store).average_shortest_path_length(Some(2), &mut rng);
        assert_eq!(estimate.sources, 2);
        assert!(estimate.sampled);

        let full = PathSampler::new(&store).average_shortest_path_length(Some(10), &mut rng);
        assert!(!full.sampled);
        assert_eq!(full.sources, 4);
    }

    #[test]
    fn test_exact_limit_forces_sampling() {
        let store = chain();
        let mut rng = StdRng::seed_from_u64(1);
        let estimate = PathSampler::new(&store)
            .with_exact_limit(3)
            .average_shortest_path_length(None, &mut rng);
        assert!(estimate.sampled);
        assert_eq!(estimate.sources, 3);
    }

    #[test]
    fn test_average_no_pairs() {
        let store = GraphStore::from_edges(3, Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        let estimate = PathSampler::new(&store).average_shortest_path_length(None, &mut rng);
        assert_eq!(estimate.average, 0.0);
        assert_eq!(estimate.reachable_pairs, 0);

        let zero = PathSampler::new(&store).average_shortest_path_length(Some(0), &mut rng);
        assert_eq!(zero.sources, 0);
    }

    #[test]
    fn test_shortest_path() {
        let store = chain();
        let sampler = PathSampler::new(&store);
        assert_eq!(sampler.shortest_path(1, 4, None), Some(vec![1, 2, 4]));
        assert_eq!(sampler.shortest_path(1, 4, Some(1)), None);
        assert_eq!(sampler.shortest_path(1, 4, Some(2)), Some(vec![1, 2, 4]));
        assert_eq!(sampler.shortest_path(4, 1, None), None);
        assert_eq!(sampler.shortest_path(3, 3, None), Some(vec![3]));
        assert_eq!(sampler.shortest_path(1, 9, None), None);
    }
}
