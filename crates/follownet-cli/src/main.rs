use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{analyze, generate, path, top};

/// Command-line interface for follows-graph analysis
#[derive(Parser)]
#[command(name = "follownet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, env = "FOLLOWNET_CONFIG")]
    pub config: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a graph and run every metric
    Analyze(analyze::AnalyzeArgs),
    /// Rank the most followed users
    Top(top::TopArgs),
    /// Find a shortest follow chain between two users
    Path(path::PathArgs),
    /// Write synthetic input files
    Generate(generate::GenerateArgs),
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "follownet=debug,follownet_core=debug"
    } else {
        "follownet=info,follownet_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into());

    // stdout is reserved for command output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = config::load(cli.config.as_deref())?;

    let output = commands::OutputContext {
        json: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Analyze(args) => analyze::execute(args, cfg, &output),
        Commands::Top(args) => top::execute(args, cfg, &output),
        Commands::Path(args) => path::execute(args, cfg, &output),
        Commands::Generate(args) => generate::execute(args, &output),
    }
}
