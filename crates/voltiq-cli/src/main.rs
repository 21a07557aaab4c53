use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod report;

#[derive(Debug, Parser)]
#[command(name = "voltiq")]
#[command(about = "Service profitability analytics for electrical contracting")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Portfolio totals, margins and KPI benchmarks
    Summary,
    /// Revenue, cost and profit per service
    Services {
        /// Maximum number of services to show
        #[arg(long, default_value_t = voltiq_analytics::DEFAULT_CHART_LIMIT)]
        limit: usize,
    },
    /// Material cost Pareto with the top cost drivers marked
    Pareto {
        /// Maximum number of categories to show
        #[arg(long, default_value_t = voltiq_analytics::DEFAULT_CHART_LIMIT)]
        limit: usize,
    },
    /// K-means project clusters
    Clusters {
        /// Number of clusters (defaults to VOLTIQ_CLUSTER_COUNT)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8))]
        k: Option<u8>,
        /// Seed for reproducible centroid initialisation
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Export service profitability rows as CSV
    Export {
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Cost and timeline breakdown for a proposed project (offline)
    Forecast {
        /// Total project budget in pesos
        #[arg(long)]
        budget: f64,
        /// Planned duration in days
        #[arg(long)]
        timeline_days: f64,
    },
    /// Show the effective configuration
    Config,
}

fn init_tracing(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = voltiq_core::load_app_config()?;
    init_tracing(&config.log_level);

    match cli.command {
        Some(Commands::Summary) => commands::run_summary(&config).await,
        Some(Commands::Services { limit }) => commands::run_services(&config, limit).await,
        Some(Commands::Pareto { limit }) => commands::run_pareto(&config, limit).await,
        Some(Commands::Clusters { k, seed }) => {
            let k = k.map_or(config.cluster_count, usize::from);
            commands::run_clusters(&config, k, seed).await
        }
        Some(Commands::Export { output }) => commands::run_export(&config, output.as_deref()).await,
        Some(Commands::Forecast {
            budget,
            timeline_days,
        }) => commands::run_forecast(budget, timeline_days),
        Some(Commands::Config) => {
            commands::run_config(&config);
            Ok(())
        }
        None => {
            println!("voltiq: no command given; run `voltiq --help` for usage");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
