//! Undirected projection of the follows graph
//!
//! Community detection and spanning-tree construction work on undirected
//! structure. The projection symmetrises every directed edge, collapses
//! multi-edges and reciprocal pairs into a single undirected edge, and keeps
//! each neighbour set sorted so iteration order is deterministic.

use super::store::{GraphStore, NodeId};

/// Symmetric, deduplicated, self-loop-free adjacency view
#[derive(Debug, Clone, Default)]
pub struct UndirectedGraph {
    /// Sorted neighbour set per node; slot `i` holds node `i + 1`
    adjacency: Vec<Vec<NodeId>>,
    /// Number of distinct undirected edges
    edge_count: usize,
}

impl UndirectedGraph {
    /// Derive the projection from a loaded store
    pub fn from_store(store: &GraphStore) -> Self {
        let mut adjacency: Vec<Vec<NodeId>> = vec![Vec::new(); store.node_count()];
        for (source, target) in store.edges() {
            adjacency[source as usize - 1].push(target);
            adjacency[target as usize - 1].push(source);
        }

        let mut degree_sum = 0;
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
            neighbors.dedup();
            degree_sum += neighbors.len();
        }

        Self {
            adjacency,
            edge_count: degree_sum / 2,
        }
    }

    /// Number of nodes, including isolated ones
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// All node ids in ascending order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        1..=self.adjacency.len() as NodeId
    }

    /// Sorted undirected neighbours of a node; empty for unknown ids
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        (id as usize)
            .checked_sub(1)
            .and_then(|slot| self.adjacency.get(slot))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Undirected degree of a node
    pub fn degree(&self, id: NodeId) -> usize {
        self.neighbors(id).len()
    }

    /// Whether `u` and `v` are joined by an undirected edge
    pub fn contains_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.neighbors(u).binary_search(&v).is_ok()
    }

    /// Number of distinct undirected edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Sum of all undirected degrees (`2m`)
    pub fn total_degree(&self) -> usize {
        self.edge_count * 2
    }
}
