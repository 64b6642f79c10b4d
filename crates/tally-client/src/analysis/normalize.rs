use chrono::Datelike;
use tracing::debug;

use crate::analysis::date::month_index;
use crate::analysis::types::{ExpenseRecord, NormalizedRecord, NormalizedTable};
use crate::contracts::types::RecordIssue;
use crate::{ClientError, ClientResult};

/// Rejects input below an operation's minimum record count.
pub fn ensure_min_records(received: usize, required: usize, command: &str) -> ClientResult<()> {
    if received < required {
        return Err(ClientError::insufficient_data(command, required, received));
    }
    Ok(())
}

pub fn normalize_records(records: &[ExpenseRecord]) -> ClientResult<NormalizedTable> {
    if records.is_empty() {
        return Err(ClientError::empty_input());
    }

    let issues = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| amount_issue(index, record.amount))
        .collect::<Vec<RecordIssue>>();
    if !issues.is_empty() {
        return Err(ClientError::malformed_records(issues));
    }

    let mut earliest = records[0].date;
    let mut latest = records[0].date;
    for record in records {
        earliest = earliest.min(record.date);
        latest = latest.max(record.date);
    }
    let min_year = earliest.year();

    let normalized = records
        .iter()
        .enumerate()
        .map(|(index, record)| NormalizedRecord {
            index,
            date: record.date,
            amount: record.amount,
            category: record.category.clone(),
            month_index: month_index(record.date, min_year),
        })
        .collect::<Vec<NormalizedRecord>>();

    debug!(
        records = normalized.len(),
        earliest = %earliest,
        latest = %latest,
        "normalized expense records"
    );

    Ok(NormalizedTable {
        records: normalized,
        earliest,
        latest,
    })
}

fn amount_issue(index: usize, amount: f64) -> Option<RecordIssue> {
    if amount.is_finite() && amount >= 0.0 {
        return None;
    }
    let code = if amount.is_finite() {
        "negative_amount"
    } else {
        "invalid_number"
    };
    Some(RecordIssue {
        row: i64::try_from(index).unwrap_or(i64::MAX).saturating_add(1),
        field: "amount".to_string(),
        code: code.to_string(),
        description: format!("amount must be a finite non-negative number; got {amount}"),
        expected: Some("number >= 0".to_string()),
        received: Some(amount.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{ensure_min_records, normalize_records};
    use crate::ErrorKind;
    use crate::analysis::types::{Category, ExpenseRecord};

    fn record(date: &str, amount: f64, category: &str) -> ExpenseRecord {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap_or(NaiveDate::MIN);
        ExpenseRecord::new(parsed, amount, Category::from_label(category))
    }

    #[test]
    fn empty_input_is_rejected() {
        let result = normalize_records(&[]);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.kind, ErrorKind::InsufficientData);
        }
    }

    #[test]
    fn month_index_is_relative_to_earliest_year_and_order_is_preserved() {
        let rows = vec![
            record("2026-02-10", 30.0, "Food"),
            record("2025-11-03", 10.0, "Bills"),
            record("2026-01-20", 20.0, "Groceries"),
        ];

        let table = normalize_records(&rows);
        assert!(table.is_ok());
        if let Ok(table) = table {
            let indexes = table
                .records
                .iter()
                .map(|row| row.month_index)
                .collect::<Vec<i64>>();
            assert_eq!(indexes, vec![14, 11, 13]);
            assert_eq!(table.records[1].index, 1);
            assert_eq!(table.records[0].category_code(), Some(1));
            assert_eq!(table.records[2].category_code(), None);
            assert_eq!(table.day_span(), 99);
        }
    }

    #[test]
    fn negative_and_non_finite_amounts_fail_the_batch() {
        let rows = vec![
            record("2026-01-01", 10.0, "Food"),
            record("2026-01-02", -5.0, "Food"),
            record("2026-01-03", f64::NAN, "Food"),
        ];

        let result = normalize_records(&rows);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.kind, ErrorKind::MalformedRecord);
            assert!(error.message.contains("2 records"));
        }
    }

    #[test]
    fn minimum_count_check_reports_insufficient_data() {
        assert!(ensure_min_records(3, 3, "forecast").is_ok());
        let result = ensure_min_records(4, 5, "patterns");
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.kind, ErrorKind::InsufficientData);
        }
    }
}
