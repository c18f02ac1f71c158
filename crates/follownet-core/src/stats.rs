//! Graph summary and degree statistics

use crate::graph::{GraphStore, NodeId};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Headline counts for a loaded graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    /// Number of nodes `N`
    pub node_count: usize,
    /// Number of directed edges
    pub edge_count: usize,
    /// Nodes with a known location
    pub located_nodes: usize,
    /// Edges per node; equal for in- and out-degree
    pub average_degree: f64,
    /// `E / (N * (N - 1))`, 0.0 below two nodes
    pub density: f64,
}

impl GraphSummary {
    /// Summarise a store
    pub fn of(store: &GraphStore) -> Self {
        let node_count = store.node_count();
        let average_degree = if node_count == 0 {
            0.0
        } else {
            store.edge_count() as f64 / node_count as f64
        };
        Self {
            node_count,
            edge_count: store.edge_count(),
            located_nodes: store.located_count(),
            average_degree,
            density: density(node_count, store.edge_count()),
        }
    }
}

/// Directed density without self-loops
pub fn density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0;
    }
    let n = node_count as f64;
    edge_count as f64 / (n * (n - 1.0))
}

/// Which end of the edges a degree counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Followers
    In,
    /// Followed
    Out,
}

/// Min, max and mean of a degree sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeStats {
    /// Degree direction
    pub direction: Direction,
    /// Smallest degree
    pub min: usize,
    /// Largest degree
    pub max: usize,
    /// Mean degree
    pub mean: f64,
    /// Lowest id holding the largest degree; `None` for an empty graph
    pub argmax: Option<NodeId>,
}

/// Histogram from degree to the number of nodes with that degree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeDistribution {
    /// Degree direction
    pub direction: Direction,
    /// Node count per degree, ascending by degree
    pub counts: BTreeMap<usize, usize>,
}

/// Degrees outside the Tukey fences `Q1 - 1.5 IQR` and `Q3 + 1.5 IQR`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeOutliers {
    /// Degree direction
    pub direction: Direction,
    /// First quartile, linearly interpolated
    pub q1: f64,
    /// Third quartile, linearly interpolated
    pub q3: f64,
    /// Lower fence
    pub lower_bound: f64,
    /// Upper fence
    pub upper_bound: f64,
    /// Nodes whose degree falls outside the fences, ascending by id
    pub nodes: Vec<NodeId>,
}

/// Out- or in-degree of every node; slot `i` holds node `i + 1`
pub fn degree_sequence(store: &GraphStore, direction: Direction) -> Vec<usize> {
    match direction {
        Direction::Out => store.nodes().map(|n| store.out_degree(n)).collect(),
        Direction::In => store.precompute_in_degrees().to_vec(),
    }
}

/// The `n` highest `(id, degree)` pairs, by degree descending then id ascending
///
/// Slot `i` of `degrees` holds node `i + 1`.
pub fn top_n_by_degree(degrees: &[usize], n: usize) -> Vec<(NodeId, usize)> {
    if n == 0 {
        return Vec::new();
    }
    let mut ranked: Vec<(NodeId, usize)> = degrees
        .iter()
        .enumerate()
        .map(|(slot, &degree)| (slot as NodeId + 1, degree))
        .collect();

    let order =
        |a: &(NodeId, usize), b: &(NodeId, usize)| (Reverse(a.1), a.0).cmp(&(Reverse(b.1), b.0));
    if n < ranked.len() {
        ranked.select_nth_unstable_by(n - 1, order);
        ranked.truncate(n);
    }
    ranked.sort_unstable_by(order);
    ranked
}

impl DegreeStats {
    /// Compute statistics over every node in `[1, N]`
    pub fn compute(store: &GraphStore, direction: Direction) -> Self {
        Self::from_degrees(direction, &degree_sequence(store, direction))
    }

    /// Compute statistics from a degree table; slot `i` holds node `i + 1`
    pub fn from_degrees(direction: Direction, degrees: &[usize]) -> Self {
        let mut argmax = None;
        let mut max = 0;
        for (slot, &degree) in degrees.iter().enumerate() {
            if argmax.is_none() || degree > max {
                max = degree;
                argmax = Some(slot as NodeId + 1);
            }
        }
        let mean = if degrees.is_empty() {
            0.0
        } else {
            degrees.iter().sum::<usize>() as f64 / degrees.len() as f64
        };

        Self {
            direction,
            min: degrees.iter().copied().min().unwrap_or(0),
            max,
            mean,
            argmax,
        }
    }
}

impl DegreeDistribution {
    /// Count nodes per degree over every node in `[1, N]`
    pub fn compute(store: &GraphStore, direction: Direction) -> Self {
        Self::from_degrees(direction, &degree_sequence(store, direction))
    }

    /// Count nodes per degree in a degree table
    pub fn from_degrees(direction: Direction, degrees: &[usize]) -> Self {
        let mut counts = BTreeMap::new();
        for &degree in degrees {
            *counts.entry(degree).or_insert(0) += 1;
        }
        Self { direction, counts }
    }
}

impl DegreeOutliers {
    /// Flag outlying degrees in a table; slot `i` holds node `i + 1`
    ///
    /// Returns `None` for an empty table.
    pub fn from_degrees(direction: Direction, degrees: &[usize]) -> Option<Self> {
        if degrees.is_empty() {
            warn!(?direction, "No degrees to screen for outliers");
            return None;
        }

        let mut sorted = degrees.to_vec();
        sorted.sort_unstable();
        let q1 = percentile(&sorted, 0.25);
        let q3 = percentile(&sorted, 0.75);
        let iqr = q3 - q1;
        let lower_bound = q1 - 1.5 * iqr;
        let upper_bound = q3 + 1.5 * iqr;

        let nodes: Vec<NodeId> = degrees
            .iter()
            .enumerate()
            .filter(|&(_, &d)| (d as f64) < lower_bound || (d as f64) > upper_bound)
            .map(|(slot, _)| slot as NodeId + 1)
            .collect();

        info!(
            ?direction,
            outliers = nodes.len(),
            lower_bound,
            upper_bound,
            "Degree outliers detected"
        );
        Some(Self {
            direction,
            q1,
            q3,
            lower_bound,
            upper_bound,
            nodes,
        })
    }
}

/// Linear-interpolated percentile of a sorted, non-empty slice; `q` in `[0, 1]`
fn percentile(sorted: &[usize], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    let fraction = rank - low as f64;
    sorted[low] as f64 + (sorted[high] as f64 - sorted[low] as f64) * fraction
}

/// Pearson correlation between two degree tables of equal length
///
/// `None` with fewer than two nodes, mismatched lengths, or when either
/// sequence is constant.
pub fn degree_correlation(in_degrees: &[usize], out_degrees: &[usize]) -> Option<f64> {
    let n = in_degrees.len();
    if n < 2 || n != out_degrees.len() {
        warn!(nodes = n, "Not enough nodes to correlate degrees");
        return None;
    }

    let mean = |xs: &[usize]| xs.iter().map(|&x| x as f64).sum::<f64>() / n as f64;
    let (mean_in, mean_out) = (mean(in_degrees), mean(out_degrees));

    let mut covariance = 0.0;
    let mut var_in = 0.0;
    let mut var_out = 0.0;
    for (&a, &b) in in_degrees.iter().zip(out_degrees) {
        let da = a as f64 - mean_in;
        let db = b as f64 - mean_out;
        covariance += da * db;
        var_in += da * da;
        var_out += db * db;
    }

    if var_in == 0.0 || var_out == 0.0 {
        warn!("Constant degree sequence, correlation undefined");
        return None;
    }
    let r = covariance / (var_in.sqrt() * var_out.sqrt());
    info!(correlation = r, "In/out degree correlation computed");
    Some(r)
}
