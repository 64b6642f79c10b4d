use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::ClientResult;
use crate::analysis::clustering::{KMeansParams, fit_kmeans, standardize};
use crate::analysis::normalize::{ensure_min_records, normalize_records};
use crate::analysis::policy::{PATTERNS_POLICY_V1, PatternsPolicy};
use crate::analysis::types::{ExpenseRecord, NormalizedRecord, NormalizedTable};

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub total_amount: f64,
    pub average_amount: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternSummary {
    pub cluster_id: usize,
    pub dominant_category: String,
    pub average_amount: f64,
    pub total_amount: f64,
    pub count: usize,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternResult {
    pub categories: Vec<CategorySummary>,
    pub patterns: Vec<PatternSummary>,
    /// Cluster count used; 0 when too few records could be clustered.
    pub k: usize,
    pub seed: u64,
    /// Records left out of clustering because their category has no code.
    pub excluded_unknown_category: usize,
}

pub fn analyze_patterns(records: &[ExpenseRecord], seed: u64) -> ClientResult<PatternResult> {
    analyze_patterns_with_policy(records, seed, PATTERNS_POLICY_V1)
}

fn analyze_patterns_with_policy(
    records: &[ExpenseRecord],
    seed: u64,
    policy: PatternsPolicy,
) -> ClientResult<PatternResult> {
    ensure_min_records(records.len(), policy.min_records, "patterns")?;
    let table = normalize_records(records)?;
    let categories = category_rollup(&table);

    let clusterable = table
        .records
        .iter()
        .filter(|record| record.category_code().is_some())
        .collect::<Vec<&NormalizedRecord>>();
    let excluded_unknown_category = table.len() - clusterable.len();

    let mut result = PatternResult {
        categories,
        patterns: Vec::new(),
        k: 0,
        seed,
        excluded_unknown_category,
    };

    if clusterable.len() < policy.min_clusters {
        warn!(
            clusterable = clusterable.len(),
            excluded = excluded_unknown_category,
            "not enough categorized records to cluster"
        );
        return Ok(result);
    }

    let features = clusterable
        .iter()
        .map(|record| {
            vec![
                record.amount,
                f64::from(record.category_code().unwrap_or_default()),
            ]
        })
        .collect::<Vec<Vec<f64>>>();
    let scaled = standardize(&features);
    let k = policy.cluster_count(clusterable.len());

    let Some(fit) = fit_kmeans(
        &scaled,
        KMeansParams {
            k,
            initializations: policy.initializations,
            max_iterations: policy.max_iterations,
            tolerance: policy.tolerance,
            seed,
        },
    ) else {
        return Ok(result);
    };

    debug!(k, inertia = fit.inertia, "selected best k-means partition");

    result.k = k;
    result.patterns = summarize_clusters(&clusterable, &fit.assignments, k);
    Ok(result)
}

/// Per-category totals, ordered by category label.
pub fn category_rollup(table: &NormalizedTable) -> Vec<CategorySummary> {
    let mut grouped: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for record in &table.records {
        let entry = grouped
            .entry(record.category.label().to_string())
            .or_insert((0.0, 0));
        entry.0 += record.amount;
        entry.1 += 1;
    }

    grouped
        .into_iter()
        .map(|(category, (total_amount, count))| CategorySummary {
            category,
            total_amount,
            average_amount: total_amount / count as f64,
            count,
        })
        .collect()
}

fn summarize_clusters(
    members: &[&NormalizedRecord],
    assignments: &[usize],
    k: usize,
) -> Vec<PatternSummary> {
    let mut summaries = Vec::new();
    for cluster_id in 0..k {
        let cluster = members
            .iter()
            .zip(assignments)
            .filter(|(_, assigned)| **assigned == cluster_id)
            .map(|(record, _)| *record)
            .collect::<Vec<&NormalizedRecord>>();
        if cluster.is_empty() {
            continue;
        }

        let total_amount = cluster.iter().map(|record| record.amount).sum::<f64>();
        let average_amount = total_amount / cluster.len() as f64;
        summaries.push(PatternSummary {
            cluster_id,
            dominant_category: dominant_category(&cluster),
            average_amount,
            total_amount,
            count: cluster.len(),
            description: format!(
                "Pattern {}: Average ${average_amount:.2} per transaction",
                cluster_id + 1
            ),
        });
    }
    summaries
}

/// Most frequent category; ties go to the one seen first.
fn dominant_category(cluster: &[&NormalizedRecord]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for record in cluster {
        let label = record.category.label();
        match counts.iter_mut().find(|(seen, _)| *seen == label) {
            Some(entry) => entry.1 += 1,
            None => counts.push((label, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (label, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label.to_string())
        .unwrap_or_else(|| "Mixed".to_string())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::analyze_patterns;
    use crate::ErrorKind;
    use crate::analysis::types::{Category, ExpenseRecord};

    fn record(day: u32, amount: f64, category: &str) -> ExpenseRecord {
        let date = NaiveDate::from_ymd_opt(2026, 1, day).unwrap_or(NaiveDate::MIN);
        ExpenseRecord::new(date, amount, Category::from_label(category))
    }

    fn sample_rows() -> Vec<ExpenseRecord> {
        vec![
            record(1, 12.0, "Food"),
            record(2, 14.5, "Food"),
            record(3, 11.0, "Food"),
            record(4, 950.0, "Bills"),
            record(5, 980.0, "Bills"),
            record(6, 40.0, "Entertainment"),
            record(7, 45.0, "Entertainment"),
            record(8, 13.0, "Food"),
            record(9, 60.0, "Transport"),
        ]
    }

    #[test]
    fn fewer_than_five_records_is_insufficient() {
        let rows = sample_rows().into_iter().take(4).collect::<Vec<ExpenseRecord>>();
        let result = analyze_patterns(&rows, 42);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.kind, ErrorKind::InsufficientData);
        }
    }

    #[test]
    fn cluster_count_follows_record_count() {
        let result = analyze_patterns(&sample_rows(), 42);
        assert!(result.is_ok());
        if let Ok(patterns) = result {
            assert_eq!(patterns.k, 3);
            let members = patterns.patterns.iter().map(|row| row.count).sum::<usize>();
            assert_eq!(members, 9);
            assert!(patterns.patterns.len() <= 3);
        }
    }

    #[test]
    fn identical_input_and_seed_are_reproducible() {
        let first = analyze_patterns(&sample_rows(), 42);
        let second = analyze_patterns(&sample_rows(), 42);
        assert!(first.is_ok());
        assert_eq!(first.ok(), second.ok());
    }

    #[test]
    fn rollup_groups_by_category_label() {
        let result = analyze_patterns(&sample_rows(), 42);
        assert!(result.is_ok());
        if let Ok(patterns) = result {
            let labels = patterns
                .categories
                .iter()
                .map(|row| row.category.as_str())
                .collect::<Vec<&str>>();
            assert_eq!(labels, vec!["Bills", "Entertainment", "Food", "Transport"]);
            let food = &patterns.categories[2];
            assert_eq!(food.count, 4);
            assert!((food.total_amount - 50.5).abs() < 1e-9);
            assert!((food.average_amount - 12.625).abs() < 1e-9);
        }
    }

    #[test]
    fn descriptions_use_one_based_ids_and_two_decimals() {
        let result = analyze_patterns(&sample_rows(), 42);
        assert!(result.is_ok());
        if let Ok(patterns) = result {
            for pattern in &patterns.patterns {
                let expected = format!(
                    "Pattern {}: Average ${:.2} per transaction",
                    pattern.cluster_id + 1,
                    pattern.average_amount
                );
                assert_eq!(pattern.description, expected);
            }
            let bills = patterns
                .patterns
                .iter()
                .find(|pattern| pattern.dominant_category == "Bills");
            assert!(bills.is_some());
            if let Some(cluster) = bills {
                assert_eq!(cluster.count, 2);
            }
        }
    }

    #[test]
    fn unknown_categories_are_rolled_up_but_not_clustered() {
        let mut rows = sample_rows();
        rows.push(record(10, 22.0, "Groceries"));
        rows.push(record(11, 18.0, "Groceries"));

        let result = analyze_patterns(&rows, 42);
        assert!(result.is_ok());
        if let Ok(patterns) = result {
            assert_eq!(patterns.excluded_unknown_category, 2);
            assert!(patterns.categories.iter().any(|row| row.category == "Groceries"));
            let clustered = patterns.patterns.iter().map(|row| row.count).sum::<usize>();
            assert_eq!(clustered, 9);
            assert!(
                patterns
                    .patterns
                    .iter()
                    .all(|row| row.dominant_category != "Groceries")
            );
        }
    }

    #[test]
    fn all_unknown_categories_yield_no_patterns() {
        let rows = (1..=5)
            .map(|day| record(day, f64::from(day) * 10.0, "Pets"))
            .collect::<Vec<ExpenseRecord>>();

        let result = analyze_patterns(&rows, 42);
        assert!(result.is_ok());
        if let Ok(patterns) = result {
            assert!(patterns.patterns.is_empty());
            assert_eq!(patterns.k, 0);
            assert_eq!(patterns.categories.len(), 1);
        }
    }
}
