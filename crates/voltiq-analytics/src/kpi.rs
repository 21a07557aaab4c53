//! Project-versus-company KPI comparison.

use serde::Serialize;

use crate::aggregate::{cost_to_revenue_ratio, TotalMetrics};

/// Variance magnitude below which a comparison is reported as neutral.
const NEUTRAL_BAND: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceStatus {
    Positive,
    Negative,
    Neutral,
}

impl std::fmt::Display for VarianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiComparison {
    pub metric: String,
    pub project_value: f64,
    pub company_average: f64,
    pub unit: String,
    pub higher_is_better: bool,
}

impl KpiComparison {
    /// `project_value - company_average`.
    #[must_use]
    pub fn variance(&self) -> f64 {
        self.project_value - self.company_average
    }

    /// Whether the variance is good news, taking the metric's direction into account.
    #[must_use]
    pub fn status(&self) -> VarianceStatus {
        let variance = self.variance();
        if !variance.is_finite() || variance.abs() < NEUTRAL_BAND {
            return VarianceStatus::Neutral;
        }
        if (variance > 0.0) == self.higher_is_better {
            VarianceStatus::Positive
        } else {
            VarianceStatus::Negative
        }
    }
}

/// Company-wide reference values the live portfolio is compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiBaseline {
    pub profit_margin_pct: f64,
    pub cost_to_revenue: f64,
}

impl Default for KpiBaseline {
    fn default() -> Self {
        Self {
            profit_margin_pct: 18.3,
            cost_to_revenue: 0.78,
        }
    }
}

/// Compare live totals against `baseline` for overall margin and
/// cost-to-revenue ratio.
#[must_use]
pub fn benchmark_against(metrics: &TotalMetrics, baseline: &KpiBaseline) -> Vec<KpiComparison> {
    vec![
        KpiComparison {
            metric: "Profit Margin".to_string(),
            project_value: metrics.overall_margin,
            company_average: baseline.profit_margin_pct,
            unit: "%".to_string(),
            higher_is_better: true,
        },
        KpiComparison {
            metric: "Cost-to-Revenue".to_string(),
            project_value: cost_to_revenue_ratio(metrics),
            company_average: baseline.cost_to_revenue,
            unit: String::new(),
            higher_is_better: false,
        },
    ]
}
