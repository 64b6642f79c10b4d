use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::ClientResult;
use crate::analysis::normalize::{ensure_min_records, normalize_records};
use crate::analysis::policy::{ANOMALIES_POLICY_V1, AnomaliesPolicy};
use crate::analysis::stats::{mean, population_std_dev, sample_std_dev};
use crate::analysis::types::{ExpenseRecord, NormalizedRecord, NormalizedTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyMethod {
    Statistical,
    CategoryBased,
}

impl AnomalyMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Statistical => "statistical",
            Self::CategoryBased => "category_based",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyFinding {
    /// Position of the transaction in the caller's input.
    pub index: usize,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    pub reason: String,
    pub method: AnomalyMethod,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyResult {
    pub findings: Vec<AnomalyFinding>,
    pub total_detected: usize,
}

#[derive(Debug, Default)]
struct FindingSet {
    flagged: BTreeSet<usize>,
    findings: Vec<AnomalyFinding>,
}

impl FindingSet {
    /// Keeps the first finding reported for an index.
    fn insert(&mut self, finding: AnomalyFinding) -> bool {
        if !self.flagged.insert(finding.index) {
            return false;
        }
        self.findings.push(finding);
        true
    }

    fn contains(&self, index: usize) -> bool {
        self.flagged.contains(&index)
    }
}

pub fn detect_anomalies(records: &[ExpenseRecord]) -> ClientResult<AnomalyResult> {
    detect_anomalies_with_policy(records, ANOMALIES_POLICY_V1)
}

fn detect_anomalies_with_policy(
    records: &[ExpenseRecord],
    policy: AnomaliesPolicy,
) -> ClientResult<AnomalyResult> {
    ensure_min_records(records.len(), policy.min_records, "anomalies")?;
    let table = normalize_records(records)?;

    let mut found = FindingSet::default();
    statistical_pass(&table, policy, &mut found);
    category_pass(&table, policy, &mut found);

    let mut findings = found.findings;
    findings.sort_by(|left, right| {
        right
            .amount
            .total_cmp(&left.amount)
            .then_with(|| left.index.cmp(&right.index))
    });
    let total_detected = findings.len();
    findings.truncate(policy.report_limit);

    debug!(
        total_detected,
        reported = findings.len(),
        "anomaly detection finished"
    );

    Ok(AnomalyResult {
        findings,
        total_detected,
    })
}

fn statistical_pass(table: &NormalizedTable, policy: AnomaliesPolicy, found: &mut FindingSet) {
    let amounts = table.amounts();
    let (Some(center), Some(spread)) = (mean(&amounts), population_std_dev(&amounts)) else {
        return;
    };
    if spread <= 0.0 {
        debug!("all amounts identical, skipping z-score pass");
        return;
    }

    for record in &table.records {
        let z_score = (record.amount - center).abs() / spread;
        if !policy.exceeds_z_threshold(z_score) {
            continue;
        }
        found.insert(finding(
            record,
            format!("Amount exceeds mean by {z_score:.2} standard deviations"),
            AnomalyMethod::Statistical,
            Some(z_score),
        ));
    }
}

fn category_pass(table: &NormalizedTable, policy: AnomaliesPolicy, found: &mut FindingSet) {
    let mut by_category: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for record in &table.records {
        by_category
            .entry(record.category.label())
            .or_default()
            .push(record.amount);
    }

    let mut ceilings: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for (label, amounts) in &by_category {
        if amounts.len() < policy.min_category_members {
            continue;
        }
        let (Some(category_mean), Some(category_std)) = (mean(amounts), sample_std_dev(amounts))
        else {
            continue;
        };
        if category_std <= 0.0 {
            continue;
        }
        ceilings.insert(
            label,
            (category_mean, policy.category_ceiling(category_mean, category_std)),
        );
    }

    for record in &table.records {
        if found.contains(record.index) {
            continue;
        }
        let Some((category_mean, ceiling)) = ceilings.get(record.category.label()) else {
            continue;
        };
        if record.amount <= *ceiling {
            continue;
        }
        found.insert(finding(
            record,
            format!(
                "Unusually high for {} category (mean: ${category_mean:.2})",
                record.category
            ),
            AnomalyMethod::CategoryBased,
            None,
        ));
    }
}

fn finding(
    record: &NormalizedRecord,
    reason: String,
    method: AnomalyMethod,
    score: Option<f64>,
) -> AnomalyFinding {
    AnomalyFinding {
        index: record.index,
        amount: record.amount,
        category: record.category.label().to_string(),
        date: record.date,
        reason,
        method,
        score,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;

    use super::{AnomalyMethod, detect_anomalies};
    use crate::ErrorKind;
    use crate::analysis::types::{Category, ExpenseRecord};

    fn record(day: u32, amount: f64, category: &str) -> ExpenseRecord {
        let date = NaiveDate::from_ymd_opt(2026, 2, day).unwrap_or(NaiveDate::MIN);
        ExpenseRecord::new(date, amount, Category::from_label(category))
    }

    #[test]
    fn identical_amounts_produce_no_findings() {
        let rows = (1..=5)
            .map(|day| record(day, 50.0, "Food"))
            .collect::<Vec<ExpenseRecord>>();

        let result = detect_anomalies(&rows);
        assert!(result.is_ok());
        if let Ok(anomalies) = result {
            assert!(anomalies.findings.is_empty());
            assert_eq!(anomalies.total_detected, 0);
        }
    }

    #[test]
    fn large_outlier_is_flagged_statistically_once() {
        let mut rows = (1..=10)
            .map(|day| record(day, 20.0 + f64::from(day % 3), "Food"))
            .collect::<Vec<ExpenseRecord>>();
        rows.push(record(11, 500.0, "Food"));

        let result = detect_anomalies(&rows);
        assert!(result.is_ok());
        if let Ok(anomalies) = result {
            assert_eq!(anomalies.total_detected, 1);
            assert_eq!(anomalies.findings[0].index, 10);
            assert_eq!(anomalies.findings[0].method, AnomalyMethod::Statistical);
            assert!(anomalies.findings[0].reason.contains("standard deviations"));
            assert!(anomalies.findings[0].score.is_some_and(|z| z > 2.5));
        }
    }

    #[test]
    fn six_record_outlier_is_reported_exactly_once() {
        let rows = vec![
            record(1, 20.0, "Food"),
            record(2, 21.0, "Food"),
            record(3, 19.0, "Food"),
            record(4, 20.0, "Food"),
            record(5, 22.0, "Food"),
            record(6, 500.0, "Food"),
        ];

        let result = detect_anomalies(&rows);
        assert!(result.is_ok());
        if let Ok(anomalies) = result {
            assert_eq!(anomalies.total_detected, 1);
            assert_eq!(anomalies.findings[0].index, 5);
            assert_eq!(anomalies.findings[0].amount, 500.0);
        }
    }

    #[test]
    fn category_pass_flags_outlier_within_its_category() {
        let rows = vec![
            record(1, 100.0, "Bills"),
            record(2, 102.0, "Bills"),
            record(3, 98.0, "Bills"),
            record(4, 101.0, "Bills"),
            record(5, 99.0, "Bills"),
            record(6, 100.0, "Bills"),
            record(7, 130.0, "Bills"),
            record(8, 120.0, "Shopping"),
        ];

        let result = detect_anomalies(&rows);
        assert!(result.is_ok());
        if let Ok(anomalies) = result {
            assert_eq!(anomalies.total_detected, 1);
            let finding = &anomalies.findings[0];
            assert_eq!(finding.index, 6);
            assert_eq!(finding.method, AnomalyMethod::CategoryBased);
            assert_eq!(finding.score, None);
            assert!(finding.reason.starts_with("Unusually high for Bills category (mean: $"));
        }
    }

    #[test]
    fn single_member_categories_are_not_judged() {
        let rows = vec![
            record(1, 10.0, "Food"),
            record(2, 11.0, "Food"),
            record(3, 10.5, "Food"),
            record(4, 12.0, "Transport"),
            record(5, 14.0, "Education"),
        ];

        let result = detect_anomalies(&rows);
        assert!(result.is_ok());
        if let Ok(anomalies) = result {
            assert!(anomalies.findings.iter().all(|finding| finding.category == "Food"));
        }
    }

    #[test]
    fn output_is_unique_sorted_and_truncated() {
        let mut rows = Vec::new();
        for group in 0..12_u32 {
            let label = format!("Group{group}");
            for day in 1..=9 {
                rows.push(record(day, 10.0, &label));
            }
            rows.push(record(10, 100.0 + f64::from(group), &label));
        }

        let result = detect_anomalies(&rows);
        assert!(result.is_ok());
        if let Ok(anomalies) = result {
            assert_eq!(anomalies.findings.len(), 10);
            assert_eq!(anomalies.total_detected, 12);

            let unique = anomalies
                .findings
                .iter()
                .map(|finding| finding.index)
                .collect::<BTreeSet<usize>>();
            assert_eq!(unique.len(), anomalies.findings.len());

            for pair in anomalies.findings.windows(2) {
                assert!(pair[0].amount >= pair[1].amount);
            }
            assert_eq!(anomalies.findings[0].amount, 111.0);
            assert_eq!(anomalies.findings[9].amount, 102.0);
        }
    }

    #[test]
    fn fewer_than_five_records_is_insufficient() {
        let rows = (1..=4)
            .map(|day| record(day, 10.0, "Food"))
            .collect::<Vec<ExpenseRecord>>();
        let result = detect_anomalies(&rows);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.kind, ErrorKind::InsufficientData);
        }
    }
}
