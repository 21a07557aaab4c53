//! Command handlers. Each fetches what it needs, runs the analytics, and
//! prints a report rendered by [`crate::report`].

use std::path::Path;

use anyhow::Context;
use voltiq_analytics::{perform_kmeans_clustering, simulate_project, SeededRandom, SystemRandom};
use voltiq_client::{AnalyticsClient, ServiceProfitability};
use voltiq_core::AppConfig;

use crate::report;

/// Build the client and fetch `/descriptive` once.
///
/// # Errors
///
/// Returns an error if the endpoint is not configured or the request fails.
async fn fetch(config: &AppConfig) -> anyhow::Result<ServiceProfitability> {
    let client = AnalyticsClient::from_config(config)?;
    let data = client.get_service_profitability().await?;
    tracing::info!(
        services = data.services.len(),
        materials = data.materials.len(),
        projects = data.projects.len(),
        "fetched descriptive analytics"
    );
    Ok(data)
}

pub(crate) async fn run_summary(config: &AppConfig) -> anyhow::Result<()> {
    let data = fetch(config).await?;
    println!("{}", report::render_summary(&data));
    Ok(())
}

pub(crate) async fn run_services(config: &AppConfig, limit: usize) -> anyhow::Result<()> {
    let data = fetch(config).await?;
    println!("{}", report::render_services(&data.services, limit));
    Ok(())
}

pub(crate) async fn run_pareto(config: &AppConfig, limit: usize) -> anyhow::Result<()> {
    let data = fetch(config).await?;
    println!("{}", report::render_pareto(&data, limit));
    Ok(())
}

/// Cluster the per-project rows. A `seed` makes centroid selection repeatable.
pub(crate) async fn run_clusters(
    config: &AppConfig,
    k: usize,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let data = fetch(config).await?;
    if data.projects.is_empty() {
        println!("no project clustering data available");
        return Ok(());
    }

    let result = match seed {
        Some(seed) => perform_kmeans_clustering(&data.projects, k, &mut SeededRandom::new(seed))?,
        None => perform_kmeans_clustering(&data.projects, k, &mut SystemRandom)?,
    };
    if !result.converged {
        tracing::warn!(
            iterations = result.iterations,
            "k-means hit the iteration cap before converging"
        );
    }
    println!("{}", report::render_clusters(&result));
    Ok(())
}

/// Write the service rows as CSV to `output`, or to stdout when `None`.
pub(crate) async fn run_export(config: &AppConfig, output: Option<&Path>) -> anyhow::Result<()> {
    let data = fetch(config).await?;
    let csv = voltiq_analytics::export_to_csv(&data.services)?;

    match output {
        Some(path) => {
            std::fs::write(path, &csv)
                .with_context(|| format!("failed to write CSV to {}", path.display()))?;
            println!(
                "wrote {} service rows to {}",
                data.services.len(),
                path.display()
            );
        }
        None => println!("{csv}"),
    }
    Ok(())
}

pub(crate) fn run_forecast(budget: f64, timeline_days: f64) -> anyhow::Result<()> {
    let forecast = simulate_project(budget, timeline_days)?;
    println!("{}", report::render_forecast(&forecast, budget, timeline_days));
    Ok(())
}

pub(crate) fn run_config(config: &AppConfig) {
    println!("{}", report::render_config(config));
}
