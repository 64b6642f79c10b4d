use std::collections::BTreeMap;

use tracing::debug;

use crate::ClientResult;
use crate::analysis::normalize::{ensure_min_records, normalize_records};
use crate::analysis::policy::{FORECAST_POLICY_V1, ForecastPolicy};
use crate::analysis::types::{ExpenseRecord, NormalizedTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastMethod {
    LinearRegression,
    SimpleAverage,
}

impl ForecastMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LinearRegression => "linear_regression",
            Self::SimpleAverage => "simple_average",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyTotal {
    pub month_index: i64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub predicted_amount: f64,
    pub confidence: f64,
    pub method: ForecastMethod,
    pub r2: Option<f64>,
    pub trend_per_month: Option<f64>,
    pub monthly_totals: Vec<MonthlyTotal>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LinearFit {
    slope: f64,
    intercept: f64,
    r2: f64,
}

impl LinearFit {
    fn predict(self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

pub fn forecast_budget(records: &[ExpenseRecord]) -> ClientResult<ForecastResult> {
    forecast_budget_with_policy(records, FORECAST_POLICY_V1)
}

fn forecast_budget_with_policy(
    records: &[ExpenseRecord],
    policy: ForecastPolicy,
) -> ClientResult<ForecastResult> {
    ensure_min_records(records.len(), policy.min_records, "forecast")?;
    let table = normalize_records(records)?;

    let monthly = monthly_aggregate(&table);
    let monthly_totals = monthly
        .iter()
        .map(|(month_index, total)| MonthlyTotal {
            month_index: *month_index,
            total: *total,
        })
        .collect::<Vec<MonthlyTotal>>();

    if monthly_totals.len() < policy.min_distinct_months {
        return Ok(simple_average(&table, monthly_totals, policy));
    }

    let points = monthly_totals
        .iter()
        .map(|row| (row.month_index as f64, row.total))
        .collect::<Vec<(f64, f64)>>();
    let Some(fit) = fit_least_squares(&points) else {
        return Ok(simple_average(&table, monthly_totals, policy));
    };

    let next_month = monthly_totals
        .iter()
        .map(|row| row.month_index)
        .max()
        .unwrap_or(0)
        + 1;
    let predicted_amount = fit.predict(next_month as f64).max(0.0);

    debug!(
        months = monthly_totals.len(),
        slope = fit.slope,
        r2 = fit.r2,
        "fitted monthly spending trend"
    );

    Ok(ForecastResult {
        predicted_amount,
        confidence: policy.confidence_from_r2(fit.r2),
        method: ForecastMethod::LinearRegression,
        r2: Some(fit.r2),
        trend_per_month: Some(fit.slope),
        monthly_totals,
    })
}

/// Sums amounts per month index.
pub fn monthly_aggregate(table: &NormalizedTable) -> BTreeMap<i64, f64> {
    let mut totals = BTreeMap::new();
    for record in &table.records {
        *totals.entry(record.month_index).or_insert(0.0) += record.amount;
    }
    totals
}

fn simple_average(
    table: &NormalizedTable,
    monthly_totals: Vec<MonthlyTotal>,
    policy: ForecastPolicy,
) -> ForecastResult {
    let months_covered = (table.day_span() as f64 / policy.days_per_month).max(1.0);
    let predicted_amount = (table.total_amount() / months_covered).max(0.0);

    debug!(
        day_span = table.day_span(),
        "too few distinct months for a trend, using simple average"
    );

    ForecastResult {
        predicted_amount,
        confidence: policy.simple_average_confidence,
        method: ForecastMethod::SimpleAverage,
        r2: None,
        trend_per_month: None,
        monthly_totals,
    }
}

fn fit_least_squares(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let sxx = points
        .iter()
        .map(|(x, _)| (x - mean_x).powi(2))
        .sum::<f64>();
    if sxx <= f64::EPSILON {
        return None;
    }
    let sxy = points
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum::<f64>();

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let fit = LinearFit {
        slope,
        intercept,
        r2: 0.0,
    };

    let ss_tot = points
        .iter()
        .map(|(_, y)| (y - mean_y).powi(2))
        .sum::<f64>();
    let ss_res = points
        .iter()
        .map(|(x, y)| (y - fit.predict(*x)).powi(2))
        .sum::<f64>();

    // A flat series is fitted exactly by a zero slope.
    let scale = mean_y.abs().max(1.0);
    let r2 = if ss_tot <= 1e-12 * scale * scale * n {
        1.0
    } else {
        1.0 - ss_res / ss_tot
    };

    Some(LinearFit { r2, ..fit })
}
