use anyhow::Result;
use clap::Args;
use follownet_core::graph::{NodeId, PathSampler};
use follownet_core::AnalysisConfig;
use serde::Serialize;
use std::path::PathBuf;

use super::{OutputContext, load_graph};

#[derive(Args)]
pub struct PathArgs {
    /// Connections file
    #[arg(short, long, env = "FOLLOWNET_CONNECTIONS")]
    pub connections: PathBuf,
    /// Locations file; fixes the node count
    #[arg(short, long, env = "FOLLOWNET_LOCATIONS")]
    pub locations: Option<PathBuf>,
    /// Starting user
    #[arg(long)]
    pub from: NodeId,
    /// Target user
    #[arg(long)]
    pub to: NodeId,
    /// Give up beyond this many hops
    #[arg(long)]
    pub max_depth: Option<usize>,
}

#[derive(Serialize)]
struct PathOutput {
    from: NodeId,
    to: NodeId,
    hops: Option<usize>,
    path: Option<Vec<NodeId>>,
}

pub fn execute(args: PathArgs, config: AnalysisConfig, output: &OutputContext) -> Result<()> {
    let store = load_graph(args.locations.as_deref(), &args.connections, &config)?;

    let path = PathSampler::new(&store).shortest_path(args.from, args.to, args.max_depth);
    let result = PathOutput {
        from: args.from,
        to: args.to,
        hops: path.as_ref().map(|p| p.len() - 1),
        path,
    };

    if output.json {
        return output.print_json(&result);
    }

    match &result.path {
        Some(path) => {
            let chain: Vec<String> = path.iter().map(NodeId::to_string).collect();
            output.print_success(&format!(
                "{} hop(s): {}",
                path.len() - 1,
                chain.join(" -> ")
            ));
        }
        None => output.print_info(&format!(
            "No follow chain from {} to {}{}",
            args.from,
            args.to,
            args.max_depth
                .map(|d| format!(" within {d} hop(s)"))
                .unwrap_or_default()
        )),
    }
    Ok(())
}
