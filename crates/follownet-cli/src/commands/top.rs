use anyhow::Result;
use clap::Args;
use follownet_core::graph::NodeId;
use follownet_core::AnalysisConfig;
use serde::Serialize;
use std::path::PathBuf;

use super::{OutputContext, load_graph};

#[derive(Args)]
pub struct TopArgs {
    /// Connections file
    #[arg(short, long, env = "FOLLOWNET_CONNECTIONS")]
    pub connections: PathBuf,
    /// Locations file; fixes the node count
    #[arg(short, long, env = "FOLLOWNET_LOCATIONS")]
    pub locations: Option<PathBuf>,
    /// Number of users to list
    #[arg(short)]
    pub n: Option<usize>,
}

#[derive(Serialize)]
struct Ranked {
    rank: usize,
    id: NodeId,
    followers: usize,
    lat: Option<f32>,
    lon: Option<f32>,
}

pub fn execute(args: TopArgs, config: AnalysisConfig, output: &OutputContext) -> Result<()> {
    let store = load_graph(args.locations.as_deref(), &args.connections, &config)?;
    let n = args.n.unwrap_or(config.top_n);

    let ranked: Vec<Ranked> = store
        .top_n_by_in_degree(n)
        .into_iter()
        .enumerate()
        .map(|(idx, (id, followers))| {
            let location = store.location(id);
            Ranked {
                rank: idx + 1,
                id,
                followers,
                lat: location.map(|l| l.lat),
                lon: location.map(|l| l.lon),
            }
        })
        .collect();

    if output.json {
        return output.print_json(&ranked);
    }

    let rows: Vec<Vec<String>> = ranked
        .iter()
        .map(|r| {
            let location = match (r.lat, r.lon) {
                (Some(lat), Some(lon)) => format!("{lat:.4}, {lon:.4}"),
                _ => "-".to_string(),
            };
            vec![
                r.rank.to_string(),
                r.id.to_string(),
                r.followers.to_string(),
                location,
            ]
        })
        .collect();
    output.print_table(
        &format!("Top {} most followed", rows.len()),
        &["Rank", "User", "Followers", "Location"],
        &rows,
    );
    Ok(())
}
