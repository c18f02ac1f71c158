//! Follownet Graph - store, projection and structural algorithms
//!
//! This module provides:
//! - The directed follows graph and its streaming ingestion
//! - The undirected projection used by community and tree algorithms
//! - BFS distances and sampled average path length
//! - Louvain phase-one community detection
//! - Prim spanning trees
//! - Pluggable structural metrics

pub mod capability;
pub mod community;
pub mod paths;
pub mod projection;
pub mod spanning;
pub mod store;

pub use capability::{ComponentMembership, NativeMetrics, StructuralMetrics};
pub use community::{CommunityDetector, CommunityId, CommunityResult, modularity};
pub use paths::{PathLengthEstimate, PathSampler};
pub use projection::UndirectedGraph;
pub use spanning::{SpanningTree, SpanningTreeBuilder};
pub use store::{DEFAULT_NODE_CEILING, GraphStore, LoadReport, Location, NodeId};
