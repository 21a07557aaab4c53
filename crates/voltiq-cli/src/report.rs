//! Plain-text report rendering.
//!
//! Renderers are pure and return the full report so they can be asserted on
//! without capturing stdout.

use chrono::Utc;
use voltiq_analytics::{
    benchmark_against, calculate_client_type_profitability, calculate_total_metrics,
    cost_to_revenue_ratio, get_pareto_services, get_top_cost_drivers, material_pareto_chart_data,
    pareto_chart_data, prepare_chart_data, prepare_clustering_chart_data, profitability_extremes,
    ClusteringResult, KpiBaseline, ProjectForecast, PARETO_THRESHOLD_PCT,
};
use voltiq_client::ServiceProfitability;
use voltiq_core::{
    format_currency, format_number, format_percentage, AppConfig, ServiceProfitabilityRecord,
};

/// Cut `s` to at most `width` characters, marking truncation with `...`.
fn fit(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        format!("{}...", s.chars().take(width.saturating_sub(3)).collect::<String>())
    } else {
        s.to_string()
    }
}

pub(crate) fn render_summary(data: &ServiceProfitability) -> String {
    let mut lines = Vec::new();
    let now = Utc::now().format("%Y-%m-%d %H:%M UTC");
    lines.push("# Service Profitability Summary".to_string());
    lines.push(String::new());
    lines.push(format!("Generated:   {now}"));
    lines.push(format!(
        "Data as of:  {}",
        data.timestamp.as_deref().unwrap_or("\u{2014}")
    ));
    lines.push(format!("Records:     {}", data.record_count));

    if data.services.is_empty() {
        lines.push(String::new());
        lines.push("no service data returned by the analytics API".to_string());
        return lines.join("\n");
    }

    let totals = calculate_total_metrics(&data.services);
    lines.push(String::new());
    lines.push(format!("{:<20}{:>18}", "Projects", format_number(totals.total_projects, 0)));
    lines.push(format!("{:<20}{:>18}", "Revenue", format_currency(totals.total_revenue)));
    lines.push(format!("{:<20}{:>18}", "Cost", format_currency(totals.total_cost)));
    lines.push(format!("{:<20}{:>18}", "Profit", format_currency(totals.total_profit)));
    lines.push(format!(
        "{:<20}{:>18}",
        "Overall margin",
        format_percentage(totals.overall_margin, 2)
    ));
    lines.push(format!(
        "{:<20}{:>18}",
        "Cost-to-revenue",
        format_number(cost_to_revenue_ratio(&totals), 2)
    ));

    if let Some((best, worst)) = profitability_extremes(&data.services) {
        lines.push(String::new());
        lines.push(format!(
            "Most profitable:   {} ({})",
            best.name,
            format_percentage(best.margin, 2)
        ));
        lines.push(format!(
            "Least profitable:  {} ({})",
            worst.name,
            format_percentage(worst.margin, 2)
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "{:<16}{:>18}{:>18}{:>18}{:>10}",
        "CLIENT TYPE", "REVENUE", "COST", "PROFIT", "MARGIN"
    ));
    for group in calculate_client_type_profitability(&data.services) {
        lines.push(format!(
            "{:<16}{:>18}{:>18}{:>18}{:>10}",
            fit(&group.client_type, 15),
            format_currency(group.revenue),
            format_currency(group.cost),
            format_currency(group.profit),
            format_percentage(group.margin, 1)
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "{:<18}{:>10}{:>10}{:>10}  STATUS",
        "KPI", "ACTUAL", "BASELINE", "VARIANCE"
    ));
    for kpi in benchmark_against(&totals, &KpiBaseline::default()) {
        let actual = format!("{:.2}{}", kpi.project_value, kpi.unit);
        let baseline = format!("{:.2}{}", kpi.company_average, kpi.unit);
        lines.push(format!(
            "{:<18}{actual:>10}{baseline:>10}{:>+10.2}  {}",
            kpi.metric,
            kpi.variance(),
            kpi.status()
        ));
    }

    lines.join("\n")
}

pub(crate) fn render_services(records: &[ServiceProfitabilityRecord], limit: usize) -> String {
    let rows = prepare_chart_data(records, limit);
    if rows.is_empty() {
        return "no service data returned by the analytics API".to_string();
    }

    let mut lines = vec![format!(
        "{:<26}{:>9}{:>18}{:>18}{:>18}{:>9}{:>8}",
        "SERVICE", "PROJECTS", "REVENUE", "COST", "PROFIT", "MARGIN", "CUM %"
    )];
    for row in rows {
        lines.push(format!(
            "{:<26}{:>9}{:>18}{:>18}{:>18}{:>9}{:>8}",
            fit(&row.name, 25),
            format_number(row.projects, 0),
            format_currency(row.revenue),
            format_currency(row.cost),
            format_currency(row.profit),
            format_percentage(row.margin, 1),
            format_number(row.cumulative_percentage, 1)
        ));
    }
    lines.join("\n")
}

/// Material Pareto from the API, or the service-cost fallback when the API
/// sent none. Rows within the 80 % threshold are marked with `*`.
pub(crate) fn render_pareto(data: &ServiceProfitability, limit: usize) -> String {
    let (source, entries) = if data.materials.is_empty() {
        ("service cost", pareto_chart_data(&data.services, limit))
    } else {
        ("material cost", material_pareto_chart_data(&data.materials, limit))
    };
    if entries.is_empty() {
        return "no cost data available for a Pareto analysis".to_string();
    }

    let drivers = get_top_cost_drivers(&entries);
    let mut lines = vec![
        format!("# Pareto analysis ({source})"),
        String::new(),
        format!(
            "  {:<26}{:>18}{:>9}{:>9}",
            "CATEGORY", "COST", "SHARE", "CUM %"
        ),
    ];
    for entry in &entries {
        let marker = if entry.cumulative_percentage <= PARETO_THRESHOLD_PCT {
            '*'
        } else {
            ' '
        };
        lines.push(format!(
            "{marker} {:<26}{:>18}{:>9}{:>9}",
            fit(&entry.name, 25),
            format_currency(entry.cost),
            format_percentage(entry.percentage, 1),
            format_percentage(entry.cumulative_percentage, 1)
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "* {} top cost driver(s) account for the first {PARETO_THRESHOLD_PCT}% of cost",
        drivers.len()
    ));
    let vital = get_pareto_services(&data.services);
    if !vital.is_empty() {
        let names: Vec<&str> = vital.iter().map(|r| r.display_name()).collect();
        lines.push(format!("Vital few services: {}", names.join(", ")));
    }
    lines.join("\n")
}

pub(crate) fn render_clusters(result: &ClusteringResult) -> String {
    let mut lines = vec![
        format!(
            "# Project clusters (k={}, {} iteration(s){})",
            result.summaries.len(),
            result.iterations,
            if result.converged { "" } else { ", not converged" }
        ),
        String::new(),
        format!(
            "{:<4}{:<17}{:>9}{:>10}{:>10}{:>12}{:>18}",
            "ID", "LABEL", "PROJECTS", "MARGIN", "DAYS", "RECOVERY", "REVENUE"
        ),
    ];
    for s in &result.summaries {
        lines.push(format!(
            "{:<4}{:<17}{:>9}{:>10}{:>10}{:>12}{:>18}",
            s.id,
            s.label,
            s.count,
            format_percentage(s.avg_profit_margin, 1),
            format_number(s.avg_days_to_completion, 0),
            format_number(s.avg_payment_recovery, 0),
            format_currency(s.total_revenue)
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "{:<22}{:<22}{:>8}{:>10}{:>10}  CLUSTER",
        "PROJECT", "SERVICE", "DAYS", "MARGIN", "RECOVERY"
    ));
    for p in prepare_clustering_chart_data(result) {
        lines.push(format!(
            "{:<22}{:<22}{:>8}{:>10}{:>10}  {}",
            fit(&p.name, 21),
            fit(&p.service, 21),
            format_number(p.x, 0),
            format_percentage(p.y, 1),
            format_number(p.z, 0),
            p.label
        ));
    }
    lines.join("\n")
}

pub(crate) fn render_forecast(
    forecast: &ProjectForecast,
    budget: f64,
    timeline_days: f64,
) -> String {
    let cost = &forecast.cost;
    let timeline = &forecast.timeline;
    let labor = &forecast.labor;
    let payment = &forecast.payment;
    [
        "# Project forecast".to_string(),
        String::new(),
        format!("Budget:    {}", format_currency(budget)),
        format!("Timeline:  {} days", format_number(timeline_days, 0)),
        String::new(),
        format!("{:<14}{:>18}", "Materials", format_currency(cost.materials)),
        format!("{:<14}{:>18}", "Labor", format_currency(cost.labor)),
        format!("{:<14}{:>18}", "Overhead", format_currency(cost.overhead)),
        format!("{:<14}{:>18}", "Profit", format_currency(cost.profit)),
        String::new(),
        format!("{:<14}{:>10} days", "Planning", format_number(timeline.planning, 0)),
        format!("{:<14}{:>10} days", "Execution", format_number(timeline.execution, 0)),
        format!("{:<14}{:>10} days", "Completion", format_number(timeline.completion, 0)),
        String::new(),
        format!(
            "Crew: {} electricians, {} apprentices, {} project manager",
            labor.electricians, labor.apprentices, labor.project_manager
        ),
        format!(
            "Payment: {}% deposit, {}% milestone, {}% on completion",
            payment.deposit_pct, payment.milestone_pct, payment.completion_pct
        ),
    ]
    .join("\n")
}

pub(crate) fn render_config(config: &AppConfig) -> String {
    let unset = "(not set)";
    let mut lines = vec![
        format!("{:<28}{}", "VOLTIQ_API_ENDPOINT", config.api_endpoint.as_deref().unwrap_or(unset)),
        format!(
            "{:<28}{}",
            "VOLTIQ_BI_EMBED_URL",
            config.require_bi_embed_url().unwrap_or(unset)
        ),
        format!("{:<28}{}", "VOLTIQ_ENV", config.env),
        format!("{:<28}{}", "VOLTIQ_LOG_LEVEL", config.log_level),
        format!("{:<28}{}", "VOLTIQ_REQUEST_TIMEOUT_SECS", config.request_timeout_secs),
        format!("{:<28}{}", "VOLTIQ_USER_AGENT", config.user_agent),
        format!("{:<28}{}", "VOLTIQ_MAX_RETRIES", config.max_retries),
        format!("{:<28}{}", "VOLTIQ_RETRY_BACKOFF_BASE_MS", config.retry_backoff_base_ms),
        format!("{:<28}{}", "VOLTIQ_CLUSTER_COUNT", config.cluster_count),
    ];

    let missing = config.missing_vars();
    if !missing.is_empty() {
        lines.push(String::new());
        for var in missing {
            lines.push(format!("warning: {var} is not set"));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
