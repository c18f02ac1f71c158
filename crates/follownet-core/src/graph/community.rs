//! Greedy modularity optimisation (Louvain phase one)
//!
//! Every node starts in its own community. Each pass visits the nodes in a
//! shuffled order and moves a node into the neighbouring community with the
//! largest strictly positive gain
//!
//! ```text
//! gain(c) = k_i_in[c] - sigma_tot[c] * k_i / 2m
//! ```
//!
//! where `k_i_in[c]` counts the node's edges into `c`, `sigma_tot[c]` is the
//! degree sum of `c` with the node itself removed and `2m` is the total
//! undirected degree. A pass without moves ends the run. There is no
//! aggregation phase: communities are only locally optimal with respect to
//! single-node moves.

use super::projection::UndirectedGraph;
use super::store::NodeId;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Community label; initially equal to the id of the community's only member
pub type CommunityId = NodeId;

/// Outcome of a community detection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityResult {
    /// Community of every node
    pub membership: HashMap<NodeId, CommunityId>,
    /// Number of distinct communities
    pub community_count: usize,
    /// Passes executed, including the final one without moves
    pub passes: usize,
    /// Nodes moved during each pass
    pub moves_per_pass: Vec<usize>,
    /// Modularity of the singleton partition followed by the value after each pass
    pub modularity_by_pass: Vec<f64>,
}

impl CommunityResult {
    /// Members grouped by community, each list sorted by node id
    pub fn communities(&self) -> BTreeMap<CommunityId, Vec<NodeId>> {
        let mut groups: BTreeMap<CommunityId, Vec<NodeId>> = BTreeMap::new();
        for (&node, &community) in &self.membership {
            groups.entry(community).or_default().push(node);
        }
        for members in groups.values_mut() {
            members.sort_unstable();
        }
        groups
    }

    /// Modularity of the final partition
    pub fn modularity(&self) -> f64 {
        self.modularity_by_pass.last().copied().unwrap_or(0.0)
    }
}

/// Single-level greedy modularity optimiser
#[derive(Debug, Clone, Copy)]
pub struct CommunityDetector {
    max_passes: usize,
}

impl Default for CommunityDetector {
    fn default() -> Self {
        Self { max_passes: 5 }
    }
}

impl CommunityDetector {
    /// Create a detector running at most `max_passes` passes
    pub fn new(max_passes: usize) -> Self {
        Self { max_passes }
    }

    /// Detect communities, shuffling the visit order of each pass with `rng`
    pub fn run<R: Rng + ?Sized>(&self, graph: &UndirectedGraph, rng: &mut R) -> CommunityResult {
        self.run_observed(graph, rng, |_| {})
    }

    /// Same as [`CommunityDetector::run`], calling `on_move` with the
    /// partition after every accepted move
    fn run_observed<R, F>(
        &self,
        graph: &UndirectedGraph,
        rng: &mut R,
        mut on_move: F,
    ) -> CommunityResult
    where
        R: Rng + ?Sized,
        F: FnMut(&[CommunityId]),
    {
        let node_count = graph.node_count();
        let mut community: Vec<CommunityId> = graph.nodes().collect();
        let twice_m = graph.total_degree();

        let singleton_modularity = modularity(graph, &community);
        if twice_m == 0 {
            debug!(nodes = node_count, "No edges, returning singleton communities");
            return finish(community, 0, Vec::new(), vec![singleton_modularity]);
        }

        // Slot `c - 1` holds the degree sum of community `c`
        let mut sigma_tot: Vec<usize> = graph.nodes().map(|n| graph.degree(n)).collect();
        let twice_m = twice_m as f64;

        let mut order: Vec<NodeId> = graph.nodes().collect();
        let mut links: HashMap<CommunityId, usize> = HashMap::new();
        let mut candidates: Vec<CommunityId> = Vec::new();
        let mut moves_per_pass = Vec::new();
        let mut modularity_by_pass = vec![singleton_modularity];

        for pass in 0..self.max_passes {
            order.shuffle(rng);
            let mut moves = 0;

            for &node in &order {
                let slot = node as usize - 1;
                let k_i = graph.degree(node);
                if k_i == 0 {
                    continue;
                }
                let original = community[slot];

                links.clear();
                candidates.clear();
                for &neighbor in graph.neighbors(node) {
                    let c = community[neighbor as usize - 1];
                    let count = links.entry(c).or_insert(0);
                    if *count == 0 {
                        candidates.push(c);
                    }
                    *count += 1;
                }
                if !links.contains_key(&original) {
                    candidates.push(original);
                }

                sigma_tot[original as usize - 1] -= k_i;

                let mut best = original;
                let mut best_gain = 0.0;
                for &c in &candidates {
                    let k_i_in = links.get(&c).copied().unwrap_or(0) as f64;
                    let gain = k_i_in - sigma_tot[c as usize - 1] as f64 * k_i as f64 / twice_m;
                    if gain > best_gain {
                        best_gain = gain;
                        best = c;
                    }
                }

                sigma_tot[best as usize - 1] += k_i;
                if best != original {
                    community[slot] = best;
                    moves += 1;
                    on_move(&community);
                }
            }

            moves_per_pass.push(moves);
            modularity_by_pass.push(modularity(graph, &community));
            debug!(
                pass = pass + 1,
                moves,
                modularity = modularity_by_pass[modularity_by_pass.len() - 1],
                "Louvain pass finished"
            );
            if moves == 0 {
                break;
            }
        }

        let passes = moves_per_pass.len();
        let result = finish(community, passes, moves_per_pass, modularity_by_pass);
        info!(
            communities = result.community_count,
            passes,
            modularity = result.modularity(),
            "Community detection finished"
        );
        result
    }
}

/// Newman modularity of a partition; `community[i]` labels node `i + 1`
///
/// Returns 0.0 for graphs without edges.
pub fn modularity(graph: &UndirectedGraph, community: &[CommunityId]) -> f64 {
    let twice_m = graph.total_degree() as f64;
    if twice_m == 0.0 {
        return 0.0;
    }

    let mut internal: HashMap<CommunityId, usize> = HashMap::new();
    let mut degree_sum: HashMap<CommunityId, usize> = HashMap::new();
    for node in graph.nodes() {
        let c = community[node as usize - 1];
        *degree_sum.entry(c).or_insert(0) += graph.degree(node);
        // Each internal edge is seen from both endpoints
        let inside = graph
            .neighbors(node)
            .iter()
            .filter(|&&v| community[v as usize - 1] == c)
            .count();
        *internal.entry(c).or_insert(0) += inside;
    }

    degree_sum
        .iter()
        .map(|(c, &d)| {
            let l_c = internal.get(c).copied().unwrap_or(0) as f64;
            l_c / twice_m - (d as f64 / twice_m).powi(2)
        })
        .sum()
}

fn finish(
    community: Vec<CommunityId>,
    passes: usize,
    moves_per_pass: Vec<usize>,
    modularity_by_pass: Vec<f64>,
) -> CommunityResult {
    let membership: HashMap<NodeId, CommunityId> = community
        .iter()
        .enumerate()
        .map(|(slot, &c)| (slot as NodeId + 1, c))
        .collect();
    let mut labels = community;
    labels.sort_unstable();
    labels.dedup();

    CommunityResult {
        membership,
        community_count: labels.len(),
        passes,
        moves_per_pass,
        modularity_by_pass,
    }
}
