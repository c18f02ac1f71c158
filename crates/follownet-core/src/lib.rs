//! Follownet Core - follows-graph analysis engine
//!
//! This crate loads a large directed "follows" graph from two flat files and
//! computes structural metrics over it:
//! - Streaming, batched ingestion with lenient line handling
//! - In/out-degree queries and most-followed ranking
//! - BFS distances and sampled average shortest-path length
//! - Louvain phase-one community detection on the undirected projection
//! - Prim spanning tree of the start node's component
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            Analysis pipeline                │
//! │   (summary, degrees, paths, communities)    │
//! └──────┬──────────────────────┬───────────────┘
//!        │                      │
//! ┌──────┴───────┐   ┌──────────┴──────────────┐
//! │ PathSampler  │   │   UndirectedGraph       │
//! │ (BFS)        │   │ ┌────────┐ ┌──────────┐ │
//! │              │   │ │Louvain │ │  Prim    │ │
//! └──────┬───────┘   │ └────────┘ └──────────┘ │
//!        │           └──────────┬──────────────┘
//! ┌──────┴──────────────────────┴───────────────┐
//! │                GraphStore                   │
//! │   (adjacency, locations, in-degree cache)   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use follownet_core::graph::{GraphStore, PathSampler};
//! use rand::SeedableRng;
//!
//! let mut store = GraphStore::new();
//! store.load_locations("locations.txt", 100_000)?;
//! store.load_connections("connections.txt", 100_000)?;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let estimate = PathSampler::new(&store).average_shortest_path_length(Some(1_000), &mut rng);
//! println!("{:.2} over {} sources", estimate.average, estimate.sources);
//! # Ok::<(), follownet_core::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod generator;
pub mod graph;
pub mod stats;

pub use analysis::{AnalysisReport, analyze, analyze_with, load_store};
pub use config::AnalysisConfig;
pub use error::{Error, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<graph::GraphStore>();
        assert_send_sync::<graph::UndirectedGraph>();
    }

    #[test]
    fn test_error_types() {
        let err = Error::invalid_input("test error");
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
