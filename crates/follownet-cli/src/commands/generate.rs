use anyhow::{Context, Result, ensure};
use clap::Args;
use follownet_core::generator::{generate_connections, generate_locations};
use std::fs;
use std::path::PathBuf;

use super::{OutputContext, make_rng};

#[derive(Args)]
pub struct GenerateArgs {
    /// Number of users to generate
    #[arg(short, long)]
    pub users: usize,
    /// Directory receiving locations.txt and connections.txt
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,
    /// Most follows per user
    #[arg(short, long, default_value = "10")]
    pub max_connections: usize,
    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: GenerateArgs, output: &OutputContext) -> Result<()> {
    ensure!(args.users > 0, "--users must be at least 1");
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let locations = args.out_dir.join("locations.txt");
    let connections = args.out_dir.join("connections.txt");
    let mut rng = make_rng(args.seed);

    generate_locations(&locations, args.users, &mut rng)?;
    generate_connections(&connections, args.users, args.max_connections, &mut rng)?;

    if output.json {
        return output.print_json(&serde_json::json!({
            "users": args.users,
            "locations": locations,
            "connections": connections,
        }));
    }

    output.print_success(&format!(
        "Generated {} users into {} and {}",
        args.users,
        locations.display(),
        connections.display()
    ));
    Ok(())
}
