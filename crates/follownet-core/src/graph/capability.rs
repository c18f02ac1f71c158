//! Pluggable structural metrics
//!
//! Metrics that an external graph library could compute faster are behind
//! [`StructuralMetrics`]. [`NativeMetrics`] answers them from the store's
//! own adjacency lists and BFS, so the core works without any backend.

use super::projection::UndirectedGraph;
use super::store::{GraphStore, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Connected-component label of every node in an undirected graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMembership {
    /// Component index per node; slot `i` holds node `i + 1`
    pub component_of: Vec<usize>,
    /// Size of each component, indexed by component
    pub sizes: Vec<usize>,
}

impl ComponentMembership {
    /// Number of components, isolated nodes included
    pub fn component_count(&self) -> usize {
        self.sizes.len()
    }

    /// Component of a node, `None` for unknown ids
    pub fn component(&self, id: NodeId) -> Option<usize> {
        (id as usize)
            .checked_sub(1)
            .and_then(|slot| self.component_of.get(slot))
            .copied()
    }

    /// Whether two nodes lie in the same component
    pub fn connected(&self, u: NodeId, v: NodeId) -> bool {
        matches!((self.component(u), self.component(v)), (Some(a), Some(b)) if a == b)
    }

    /// Size of the largest component, 0 for an empty graph
    pub fn largest(&self) -> usize {
        self.sizes.iter().copied().max().unwrap_or(0)
    }
}

/// Capability interface for metrics an external library may provide
pub trait StructuralMetrics {
    /// Backend name used in logs and reports
    fn name(&self) -> &str;

    /// In-degree of every node; slot `i` holds node `i + 1`
    fn in_degrees(&self, store: &GraphStore) -> Vec<usize>;

    /// Reachable-component membership over the undirected projection
    fn component_membership(&self, graph: &UndirectedGraph) -> ComponentMembership;
}

/// Metrics computed from the core primitives
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeMetrics;

impl StructuralMetrics for NativeMetrics {
    fn name(&self) -> &str {
        "native"
    }

    fn in_degrees(&self, store: &GraphStore) -> Vec<usize> {
        store.precompute_in_degrees().to_vec()
    }

    fn component_membership(&self, graph: &UndirectedGraph) -> ComponentMembership {
        const UNLABELLED: usize = usize::MAX;
        let mut component_of = vec![UNLABELLED; graph.node_count()];
        let mut sizes = Vec::new();
        let mut queue = VecDeque::new();

        for start in graph.nodes() {
            if component_of[start as usize - 1] != UNLABELLED {
                continue;
            }
            let label = sizes.len();
            let mut size = 0;
            component_of[start as usize - 1] = label;
            queue.push_back(start);

            while let Some(current) = queue.pop_front() {
                size += 1;
                for &neighbor in graph.neighbors(current) {
                    let slot = neighbor as usize - 1;
                    if component_of[slot] == UNLABELLED {
                        component_of[slot] = label;
                        queue.push_back(neighbor);
                    }
                }
            }
            sizes.push(size);
        }

        ComponentMembership {
            component_of,
            sizes,
        }
    }
}
