use anyhow::Result;
use clap::Args;
use follownet_core::stats::{DegreeDistribution, DegreeOutliers, Direction};
use follownet_core::{AnalysisConfig, AnalysisReport, analyze};
use serde::Serialize;
use std::path::PathBuf;

use super::{OutputContext, load_graph, make_rng};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Locations file; fixes the node count
    #[arg(short, long, env = "FOLLOWNET_LOCATIONS")]
    pub locations: Option<PathBuf>,
    /// Connections file
    #[arg(short, long, env = "FOLLOWNET_CONNECTIONS")]
    pub connections: PathBuf,
    /// Seed for sampling and community visit order
    #[arg(long)]
    pub seed: Option<u64>,
    /// BFS sources for the average path estimate
    #[arg(long, conflicts_with = "exact")]
    pub sample_size: Option<usize>,
    /// Use every node as a BFS source, up to the exact path limit
    #[arg(long)]
    pub exact: bool,
    /// Upper bound on community detection passes
    #[arg(long)]
    pub max_passes: Option<usize>,
    /// Length of the most-followed ranking
    #[arg(long)]
    pub top: Option<usize>,
    /// Include the in- and out-degree distributions
    #[arg(long)]
    pub distribution: bool,
}

impl AnalyzeArgs {
    fn apply(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.exact {
            config.path_sample_size = None;
        } else if self.sample_size.is_some() {
            config.path_sample_size = self.sample_size;
        }
        if let Some(passes) = self.max_passes {
            config.max_passes = passes;
        }
        if let Some(top) = self.top {
            config.top_n = top;
        }
        config
    }
}

#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    #[serde(flatten)]
    report: &'a AnalysisReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    in_degree_distribution: Option<DegreeDistribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    out_degree_distribution: Option<DegreeDistribution>,
}

pub fn execute(args: AnalyzeArgs, config: AnalysisConfig, output: &OutputContext) -> Result<()> {
    let config = args.apply(config);
    config.validate()?;

    let store = load_graph(args.locations.as_deref(), &args.connections, &config)?;
    let mut rng = make_rng(config.seed);
    let report = analyze(&store, &config, &mut rng)?;
    let (incoming, outgoing) = if args.distribution {
        (
            Some(DegreeDistribution::compute(&store, Direction::In)),
            Some(DegreeDistribution::compute(&store, Direction::Out)),
        )
    } else {
        (None, None)
    };

    if output.json {
        return output.print_json(&AnalyzeOutput {
            report: &report,
            in_degree_distribution: incoming,
            out_degree_distribution: outgoing,
        });
    }

    print_report(&report, output);
    for distribution in incoming.iter().chain(outgoing.iter()) {
        print_distribution(distribution, output);
    }
    Ok(())
}

fn print_distribution(distribution: &DegreeDistribution, output: &OutputContext) {
    let (title, column) = match distribution.direction {
        Direction::In => ("In-degree distribution", "In-degree"),
        Direction::Out => ("Out-degree distribution", "Out-degree"),
    };
    let rows: Vec<Vec<String>> = distribution
        .counts
        .iter()
        .map(|(degree, nodes)| vec![degree.to_string(), nodes.to_string()])
        .collect();
    output.print_table(title, &[column, "Nodes"], &rows);
}

fn describe_outliers(outliers: Option<&DegreeOutliers>) -> String {
    match outliers {
        Some(o) => format!(
            "{} outside [{:.2}, {:.2}]",
            o.nodes.len(),
            o.lower_bound,
            o.upper_bound
        ),
        None => "-".to_string(),
    }
}

fn print_report(report: &AnalysisReport, output: &OutputContext) {
    let summary = &report.summary;
    let rows = vec![
        vec!["Nodes".to_string(), summary.node_count.to_string()],
        vec!["Edges".to_string(), summary.edge_count.to_string()],
        vec!["Located nodes".to_string(), summary.located_nodes.to_string()],
        vec![
            "Average degree".to_string(),
            format!("{:.3}", summary.average_degree),
        ],
        vec!["Density".to_string(), format!("{:.8}", summary.density)],
        vec![
            "In-degree min/max/mean".to_string(),
            format!(
                "{} / {} / {:.3}",
                report.in_degree.min, report.in_degree.max, report.in_degree.mean
            ),
        ],
        vec![
            "Out-degree min/max/mean".to_string(),
            format!(
                "{} / {} / {:.3}",
                report.out_degree.min, report.out_degree.max, report.out_degree.mean
            ),
        ],
        vec![
            "In-degree outliers".to_string(),
            describe_outliers(report.in_degree_outliers.as_ref()),
        ],
        vec![
            "Out-degree outliers".to_string(),
            describe_outliers(report.out_degree_outliers.as_ref()),
        ],
        vec![
            "In/out degree correlation".to_string(),
            report
                .degree_correlation
                .map(|r| format!("{r:.4}"))
                .unwrap_or_else(|| "-".to_string()),
        ],
        vec![
            "Average shortest path".to_string(),
            format!(
                "{:.4} ({} sources{})",
                report.path_length.average,
                report.path_length.sources,
                if report.path_length.sampled { ", sampled" } else { "" }
            ),
        ],
        vec![
            "Components".to_string(),
            format!(
                "{} (largest {})",
                report.components, report.largest_component
            ),
        ],
        vec![
            "Communities".to_string(),
            format!(
                "{} (largest {}, modularity {:.4})",
                report.communities.count, report.communities.largest, report.communities.modularity
            ),
        ],
        vec![
            "Spanning tree edges".to_string(),
            format!(
                "{} from root {}",
                report.spanning_tree.edges,
                report
                    .spanning_tree
                    .root
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string())
            ),
        ],
    ];
    output.print_table("Graph analysis", &["Metric", "Value"], &rows);

    let top: Vec<Vec<String>> = report
        .top_followed
        .iter()
        .enumerate()
        .map(|(rank, (id, degree))| vec![(rank + 1).to_string(), id.to_string(), degree.to_string()])
        .collect();
    output.print_table("Most followed", &["Rank", "User", "Followers"], &top);

    if output.verbose {
        output.print_info(&format!(
            "Community detection ran {} pass(es); metrics from '{}' backend",
            report.communities.passes, report.metrics_backend
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> AnalyzeArgs {
        AnalyzeArgs {
            locations: None,
            connections: PathBuf::from("connections.txt"),
            seed: None,
            sample_size: None,
            exact: false,
            max_passes: None,
            top: None,
            distribution: false,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let config = AnalyzeArgs {
            seed: Some(7),
            sample_size: Some(50),
            top: Some(3),
            ..args()
        }
        .apply(AnalysisConfig::default());
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.path_sample_size, Some(50));
        assert_eq!(config.top_n, 3);
        assert_eq!(config.max_passes, 5);
    }

    #[test]
    fn test_exact_clears_sample_size() {
        let config = AnalyzeArgs {
            exact: true,
            ..args()
        }
        .apply(AnalysisConfig::default());
        assert_eq!(config.path_sample_size, None);
    }

    #[test]
    fn test_outlier_description() {
        assert_eq!(describe_outliers(None), "-");
        let outliers = DegreeOutliers::from_degrees(Direction::In, &[1, 2, 2, 3, 2, 1, 40]);
        assert_eq!(
            describe_outliers(outliers.as_ref()),
            "1 outside [0.00, 4.00]"
        );
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let base = AnalysisConfig {
            seed: Some(1),
            ..AnalysisConfig::default()
        };
        assert_eq!(args().apply(base.clone()), base);
    }
}
