use serde::Serialize;

use crate::analysis::anomalies::{AnomalyFinding, AnomalyResult};
use crate::analysis::date::format_iso_date;
use crate::analysis::forecast::{ForecastResult, MonthlyTotal};
use crate::analysis::patterns::{CategorySummary, PatternResult, PatternSummary};

#[derive(Debug, Clone, Serialize)]
pub struct RecordIssue {
    pub row: i64,
    pub field: String,
    pub code: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputSummary {
    pub records_read: usize,
    pub source_used: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTotalRow {
    pub month_index: i64,
    pub total: f64,
}

impl From<&MonthlyTotal> for MonthlyTotalRow {
    fn from(value: &MonthlyTotal) -> Self {
        Self {
            month_index: value.month_index,
            total: value.total,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastData {
    pub predicted_monthly_budget: f64,
    pub confidence: f64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r2_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_per_month: Option<f64>,
    pub monthly_totals: Vec<MonthlyTotalRow>,
    pub input: InputSummary,
}

impl ForecastData {
    pub fn from_result(result: &ForecastResult, input: InputSummary) -> Self {
        Self {
            predicted_monthly_budget: result.predicted_amount,
            confidence: result.confidence,
            method: result.method.as_str().to_string(),
            r2_score: result.r2,
            trend_per_month: result.trend_per_month,
            monthly_totals: result
                .monthly_totals
                .iter()
                .map(MonthlyTotalRow::from)
                .collect(),
            input,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRollupRow {
    pub category: String,
    pub total_amount: f64,
    pub average_amount: f64,
    pub count: usize,
}

impl From<&CategorySummary> for CategoryRollupRow {
    fn from(value: &CategorySummary) -> Self {
        Self {
            category: value.category.clone(),
            total_amount: value.total_amount,
            average_amount: value.average_amount,
            count: value.count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternRow {
    pub cluster_id: usize,
    pub dominant_category: String,
    pub average_amount: f64,
    pub total_amount: f64,
    pub count: usize,
    pub description: String,
}

impl From<&PatternSummary> for PatternRow {
    fn from(value: &PatternSummary) -> Self {
        Self {
            cluster_id: value.cluster_id,
            dominant_category: value.dominant_category.clone(),
            average_amount: value.average_amount,
            total_amount: value.total_amount,
            count: value.count,
            description: value.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternsData {
    pub method: String,
    pub k: usize,
    pub seed: u64,
    pub excluded_unknown_category: usize,
    pub clusters: Vec<CategoryRollupRow>,
    pub pattern_analysis: Vec<PatternRow>,
    pub input: InputSummary,
}

impl PatternsData {
    pub fn from_result(result: &PatternResult, input: InputSummary) -> Self {
        Self {
            method: "kmeans_clustering".to_string(),
            k: result.k,
            seed: result.seed,
            excluded_unknown_category: result.excluded_unknown_category,
            clusters: result
                .categories
                .iter()
                .map(CategoryRollupRow::from)
                .collect(),
            pattern_analysis: result.patterns.iter().map(PatternRow::from).collect(),
            input,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnomalyRow {
    pub index: usize,
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub reason: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_score: Option<f64>,
}

impl From<&AnomalyFinding> for AnomalyRow {
    fn from(value: &AnomalyFinding) -> Self {
        Self {
            index: value.index,
            date: format_iso_date(&value.date),
            amount: value.amount,
            category: value.category.clone(),
            reason: value.reason.clone(),
            method: value.method.as_str().to_string(),
            z_score: value.score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnomaliesData {
    pub method: String,
    pub total_detected: usize,
    pub returned: usize,
    pub truncated: bool,
    pub anomalies: Vec<AnomalyRow>,
    pub input: InputSummary,
}

impl AnomaliesData {
    pub fn from_result(result: &AnomalyResult, input: InputSummary) -> Self {
        Self {
            method: "combined_statistical".to_string(),
            total_detected: result.total_detected,
            returned: result.findings.len(),
            truncated: result.total_detected > result.findings.len(),
            anomalies: result.findings.iter().map(AnomalyRow::from).collect(),
            input,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthData {
    pub status: String,
    pub message: String,
    pub version: String,
    pub commands: Vec<String>,
}
