//! Analysis configuration

use crate::graph::DEFAULT_NODE_CEILING;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tuning knobs for ingestion and the analysis pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Lines per batch while parsing the locations file
    pub location_batch_size: usize,
    /// Lines per batch while parsing the connections file
    pub connection_batch_size: usize,
    /// Largest node count that may be inferred from connection targets
    pub max_inferred_nodes: usize,
    /// BFS sources for the average path estimate; `None` uses every node
    pub path_sample_size: Option<usize>,
    /// Largest graph on which every node may be used as a BFS source
    pub exact_path_limit: usize,
    /// Upper bound on Louvain passes
    pub max_passes: usize,
    /// Length of the most-followed ranking
    pub top_n: usize,
    /// Seed for sampling and visit order; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            location_batch_size: 100_000,
            connection_batch_size: 100_000,
            max_inferred_nodes: DEFAULT_NODE_CEILING,
            path_sample_size: Some(1_000),
            exact_path_limit: 10_000,
            max_passes: 5,
            top_n: 10,
            seed: None,
        }
    }
}

impl AnalysisConfig {
    /// Reject settings no run could use
    pub fn validate(&self) -> Result<()> {
        if self.location_batch_size == 0 || self.connection_batch_size == 0 {
            return Err(Error::config("batch sizes must be at least 1"));
        }
        if self.max_inferred_nodes == 0 {
            return Err(Error::config("max_inferred_nodes must be at least 1"));
        }
        if self.exact_path_limit == 0 {
            return Err(Error::config("exact_path_limit must be at least 1"));
        }
        Ok(())
    }
}
