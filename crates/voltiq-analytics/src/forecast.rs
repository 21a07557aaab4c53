//! Rule-of-thumb cost and timeline breakdown for a proposed project.
//!
//! Offline: nothing here touches the analytics API.

use serde::Serialize;

use crate::error::ForecastError;

const COST_SPLIT: [f64; 4] = [0.40, 0.35, 0.15, 0.10];
const TIMELINE_SPLIT: [f64; 3] = [0.20, 0.70, 0.10];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostForecast {
    pub materials: f64,
    pub labor: f64,
    pub overhead: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineForecast {
    pub planning: f64,
    pub execution: f64,
    pub completion: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborAllocation {
    pub electricians: u32,
    pub apprentices: u32,
    pub project_manager: u32,
}

impl Default for LaborAllocation {
    fn default() -> Self {
        Self {
            electricians: 3,
            apprentices: 2,
            project_manager: 1,
        }
    }
}

/// Share of the contract billed at each stage, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStructure {
    pub deposit_pct: u8,
    pub milestone_pct: u8,
    pub completion_pct: u8,
}

impl Default for PaymentStructure {
    fn default() -> Self {
        Self {
            deposit_pct: 30,
            milestone_pct: 40,
            completion_pct: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectForecast {
    pub cost: CostForecast,
    pub timeline: TimelineForecast,
    pub labor: LaborAllocation,
    pub payment: PaymentStructure,
}

fn validate(field: &'static str, value: f64) -> Result<f64, ForecastError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ForecastError::InvalidInput { field, value })
    }
}

/// Split `budget` and `timeline_days` into rounded components.
///
/// Components are rounded independently, so they may not sum exactly to the
/// input.
///
/// # Errors
///
/// Returns [`ForecastError::InvalidInput`] for a negative or non-finite input.
pub fn simulate_project(budget: f64, timeline_days: f64) -> Result<ProjectForecast, ForecastError> {
    let budget = validate("budget", budget)?;
    let days = validate("timeline_days", timeline_days)?;

    let [materials, labor, overhead, profit] = COST_SPLIT.map(|share| (budget * share).round());
    let [planning, execution, completion] = TIMELINE_SPLIT.map(|share| (days * share).round());

    Ok(ProjectForecast {
        cost: CostForecast {
            materials,
            labor,
            overhead,
            profit,
        },
        timeline: TimelineForecast {
            planning,
            execution,
            completion,
        },
        labor: LaborAllocation::default(),
        payment: PaymentStructure::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_budget_and_timeline() {
        let forecast = simulate_project(1_000_000.0, 90.0).unwrap();
        assert_eq!(forecast.cost.materials, 400_000.0);
        assert_eq!(forecast.cost.labor, 350_000.0);
        assert_eq!(forecast.cost.overhead, 150_000.0);
        assert_eq!(forecast.cost.profit, 100_000.0);
        assert_eq!(forecast.timeline.planning, 18.0);
        assert_eq!(forecast.timeline.execution, 63.0);
        assert_eq!(forecast.timeline.completion, 9.0);
    }

    #[test]
    fn components_are_rounded() {
        let forecast = simulate_project(1_234.0, 47.0).unwrap();
        assert_eq!(forecast.cost.materials, 494.0);
        assert_eq!(forecast.cost.labor, 432.0);
        assert_eq!(forecast.timeline.planning, 9.0);
        assert_eq!(forecast.timeline.execution, 33.0);
        assert_eq!(forecast.timeline.completion, 5.0);
    }

    #[test]
    fn fixed_allocation_and_payment_terms() {
        let forecast = simulate_project(0.0, 0.0).unwrap();
        assert_eq!(forecast.labor, LaborAllocation::default());
        assert_eq!(forecast.labor.electricians, 3);
        assert_eq!(forecast.payment.deposit_pct, 30);
        assert_eq!(forecast.payment.milestone_pct, 40);
        assert_eq!(forecast.cost.materials, 0.0);
    }

    #[test]
    fn rejects_negative_budget() {
        let err = simulate_project(-1.0, 30.0).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InvalidInput {
                field: "budget",
                value: -1.0
            }
        );
    }

    #[test]
    fn rejects_non_finite_timeline() {
        let err = simulate_project(100.0, f64::INFINITY).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InvalidInput {
                field: "timeline_days",
                ..
            }
        ));
    }
}
