//! Pure transformations from analytics API records to chart-ready shapes.

pub mod aggregate;
pub mod charts;
pub mod error;
pub mod export;
pub mod forecast;
pub mod kmeans;
pub mod kpi;
pub mod pareto;

pub use aggregate::{
    calculate_client_type_profitability, calculate_total_metrics, cost_to_revenue_ratio,
    get_material_cost_pareto, service_cost_ratios, ClientTypeProfitability, ParetoEntry,
    ServiceCostRatio, TotalMetrics,
};
pub use charts::{
    get_top_services, prepare_chart_data, profitability_extremes, service_type_distribution,
    top_by_revenue, top_by_volume, top_margin_services, MarginHighlight, NameValue,
    ServiceChartRow, DEFAULT_CHART_LIMIT, DEFAULT_TOP_SERVICES,
};
pub use error::{ClusterError, ExportError, ForecastError};
pub use export::{export_to_csv, CSV_HEADERS};
pub use forecast::{simulate_project, ProjectForecast};
pub use kmeans::{
    normalize, perform_kmeans_clustering, perform_kmeans_clustering_with,
    prepare_clustering_chart_data, ClusterPoint, ClusterSummary, ClusteredProject,
    ClusteringResult, KMeansConfig, RandomSource, SeededRandom, SystemRandom,
};
pub use kpi::{benchmark_against, KpiBaseline, KpiComparison, VarianceStatus};
pub use pareto::{
    get_pareto_services, get_top_cost_drivers, material_pareto_chart_data, pareto_chart_data,
    PARETO_THRESHOLD_PCT,
};
