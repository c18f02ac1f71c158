//! End-to-end analysis of a loaded follows graph
//!
//! Runs every structural metric once and gathers the outcome in a
//! serialisable [`AnalysisReport`] for the reporting layer.

use crate::config::AnalysisConfig;
use crate::graph::{
    CommunityDetector, GraphStore, NativeMetrics, NodeId, PathLengthEstimate, PathSampler,
    SpanningTreeBuilder, StructuralMetrics, UndirectedGraph,
};
use crate::stats::{
    DegreeOutliers, DegreeStats, Direction, GraphSummary, degree_correlation, degree_sequence,
    top_n_by_degree,
};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Condensed community outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunitySummary {
    /// Number of communities found
    pub count: usize,
    /// Size of the largest community
    pub largest: usize,
    /// Passes executed
    pub passes: usize,
    /// Modularity of the final partition
    pub modularity: f64,
}

/// Condensed spanning-tree outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanningSummary {
    /// Start node of the tree
    pub root: Option<NodeId>,
    /// Edges in the tree
    pub edges: usize,
    /// Nodes spanned, root included
    pub spanned: usize,
}

/// Everything one analysis run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
    /// Backend that supplied the structural metrics
    pub metrics_backend: String,
    /// Headline counts
    pub summary: GraphSummary,
    /// In-degree statistics
    pub in_degree: DegreeStats,
    /// Out-degree statistics
    pub out_degree: DegreeStats,
    /// In-degree outliers by the IQR rule; `None` for an empty graph
    pub in_degree_outliers: Option<DegreeOutliers>,
    /// Out-degree outliers by the IQR rule; `None` for an empty graph
    pub out_degree_outliers: Option<DegreeOutliers>,
    /// Pearson correlation of in- and out-degree; `None` when undefined
    pub degree_correlation: Option<f64>,
    /// Most followed nodes as `(id, in-degree)`
    pub top_followed: Vec<(NodeId, usize)>,
    /// Average shortest path estimate
    pub path_length: PathLengthEstimate,
    /// Number of connected components of the undirected projection
    pub components: usize,
    /// Size of the largest component
    pub largest_component: usize,
    /// Community detection outcome
    pub communities: CommunitySummary,
    /// Spanning tree outcome
    pub spanning_tree: SpanningSummary,
}

/// Load both input files into a fresh store using the configured batch sizes
pub fn load_store(
    locations: Option<&Path>,
    connections: &Path,
    config: &AnalysisConfig,
) -> Result<GraphStore> {
    config.validate()?;
    let mut store = GraphStore::new().with_node_ceiling(config.max_inferred_nodes);
    if let Some(path) = locations {
        store.load_locations(path, config.location_batch_size)?;
    }
    store.load_connections(connections, config.connection_batch_size)?;
    Ok(store)
}

/// Run the full analysis with the native metrics backend
pub fn analyze<R: Rng + ?Sized>(
    store: &GraphStore,
    config: &AnalysisConfig,
    rng: &mut R,
) -> Result<AnalysisReport> {
    analyze_with(store, config, &NativeMetrics, rng)
}

/// Run the full analysis with a caller-supplied metrics backend
pub fn analyze_with<R: Rng + ?Sized>(
    store: &GraphStore,
    config: &AnalysisConfig,
    metrics: &dyn StructuralMetrics,
    rng: &mut R,
) -> Result<AnalysisReport> {
    config.validate()?;
    let started_at = Utc::now();
    info!(
        nodes = store.node_count(),
        edges = store.edge_count(),
        backend = metrics.name(),
        "Analysis started"
    );

    let in_degrees = metrics.in_degrees(store);
    if in_degrees.len() != store.node_count() {
        return Err(Error::invalid_state(format!(
            "metrics backend '{}' returned {} in-degrees for {} nodes",
            metrics.name(),
            in_degrees.len(),
            store.node_count()
        )));
    }
    let out_degrees = degree_sequence(store, Direction::Out);
    let top_followed = top_n_by_degree(&in_degrees, config.top_n);

    let path_length = PathSampler::new(store)
        .with_exact_limit(config.exact_path_limit)
        .average_shortest_path_length(config.path_sample_size, rng);

    let graph = UndirectedGraph::from_store(store);
    let membership = metrics.component_membership(&graph);

    let communities = CommunityDetector::new(config.max_passes).run(&graph, rng);
    let largest_community = communities
        .communities()
        .values()
        .map(Vec::len)
        .max()
        .unwrap_or(0);

    let tree = SpanningTreeBuilder::new().run(&graph);

    let report = AnalysisReport {
        started_at,
        finished_at: Utc::now(),
        metrics_backend: metrics.name().to_string(),
        summary: GraphSummary::of(store),
        in_degree: DegreeStats::from_degrees(Direction::In, &in_degrees),
        out_degree: DegreeStats::from_degrees(Direction::Out, &out_degrees),
        in_degree_outliers: DegreeOutliers::from_degrees(Direction::In, &in_degrees),
        out_degree_outliers: DegreeOutliers::from_degrees(Direction::Out, &out_degrees),
        degree_correlation: degree_correlation(&in_degrees, &out_degrees),
        top_followed,
        path_length,
        components: membership.component_count(),
        largest_component: membership.largest(),
        communities: CommunitySummary {
            count: communities.community_count,
            largest: largest_community,
            passes: communities.passes,
            modularity: communities.modularity(),
        },
        spanning_tree: SpanningSummary {
            root: tree.root,
            edges: tree.edges.len(),
            spanned: tree.visited,
        },
    };

    let elapsed = report.finished_at - report.started_at;
    info!(elapsed_ms = elapsed.num_milliseconds(), "Analysis finished");
    Ok(report)
}
