//! Prim's minimum spanning tree over the undirected projection
//!
//! Every edge weighs 1, so any spanning tree is minimal; Prim's frontier is
//! still kept as a min-heap so the growth order matches the weighted form.
//! Only the component containing the start node is spanned.

use super::projection::UndirectedGraph;
use super::store::NodeId;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::info;

const UNIT_WEIGHT: u32 = 1;

/// Spanning tree of the start node's component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanningTree {
    /// Node the tree was grown from; `None` for an empty graph
    pub root: Option<NodeId>,
    /// Canonical `(min, max)` edges in the order they joined the tree
    pub edges: Vec<(NodeId, NodeId)>,
    /// Nodes reached, root included
    pub visited: usize,
}

impl SpanningTree {
    /// Total edge weight
    pub fn total_weight(&self) -> u64 {
        self.edges.len() as u64 * UNIT_WEIGHT as u64
    }
}

/// Prim-style spanning tree construction
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanningTreeBuilder;

impl SpanningTreeBuilder {
    /// Create a builder
    pub fn new() -> Self {
        Self
    }

    /// Grow a spanning tree from the lowest id that has a neighbour
    ///
    /// Falls back to node 1 when no node has neighbours.
    pub fn run(&self, graph: &UndirectedGraph) -> SpanningTree {
        let root = graph
            .nodes()
            .find(|&n| graph.degree(n) > 0)
            .or_else(|| graph.nodes().next());
        match root {
            Some(root) => self.run_from(graph, root),
            None => SpanningTree::default(),
        }
    }

    /// Grow a spanning tree from a given root
    ///
    /// Returns an empty tree when `root` is not a node of the graph.
    pub fn run_from(&self, graph: &UndirectedGraph, root: NodeId) -> SpanningTree {
        let node_count = graph.node_count();
        if root == 0 || root as usize > node_count {
            return SpanningTree::default();
        }

        let mut in_tree = vec![false; node_count];
        let mut frontier = BinaryHeap::new();
        let mut edges = Vec::new();
        let mut visited = 1;

        in_tree[root as usize - 1] = true;
        for &neighbor in graph.neighbors(root) {
            frontier.push(Reverse((UNIT_WEIGHT, root, neighbor)));
        }

        while visited < node_count {
            let Some(Reverse((_, from, to))) = frontier.pop() else {
                break;
            };
            if in_tree[to as usize - 1] {
                continue;
            }
            in_tree[to as usize - 1] = true;
            visited += 1;
            edges.push((from.min(to), from.max(to)));

            for &next in graph.neighbors(to) {
                if !in_tree[next as usize - 1] {
                    frontier.push(Reverse((UNIT_WEIGHT, to, next)));
                }
            }
        }

        info!(root, edges = edges.len(), visited, "Spanning tree built");
        SpanningTree {
            root: Some(root),
            edges,
            visited,
        }
    }
}
