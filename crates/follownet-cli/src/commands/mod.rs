pub mod analyze;
pub mod generate;
pub mod path;
pub mod top;

use anyhow::{Context, Result};
use comfy_table::{Table, presets::UTF8_FULL};
use follownet_core::graph::GraphStore;
use follownet_core::{AnalysisConfig, load_store};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct OutputContext {
    pub json: bool,
    pub verbose: bool,
}

/// Seeded generator when a seed is given, entropy otherwise
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Load the graph; I/O failures name the file that could not be read
pub fn load_graph(
    locations: Option<&Path>,
    connections: &Path,
    config: &AnalysisConfig,
) -> Result<GraphStore> {
    load_store(locations, connections, config).context("failed to load graph")
}

impl OutputContext {
    pub fn print_table(&self, title: &str, columns: &[&str], rows: &[Vec<String>]) {
        use colored::Colorize;

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(columns.to_vec());
        for row in rows {
            table.add_row(row.clone());
        }

        println!("{}", title.bold());
        println!("{table}");
    }

    pub fn print_json<T: serde::Serialize>(&self, data: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(data)?);
        Ok(())
    }

    pub fn print_success(&self, message: &str) {
        use colored::Colorize;
        println!("{} {}", "✓".green(), message);
    }

    pub fn print_info(&self, message: &str) {
        use colored::Colorize;
        println!("{} {}", "ℹ".blue(), message);
    }
}
