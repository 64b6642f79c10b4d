use crate::analysis::date::parse_expense_date;
use crate::analysis::types::{Category, ExpenseRecord};
use crate::contracts::types::RecordIssue;
use crate::records::parse::ParsedRow;
use crate::{ClientError, ClientResult};

const DATE_EXPECTATION: &str = "ISO-8601 date (e.g. 2026-01-15)";
const AMOUNT_EXPECTATION: &str = "non-negative number (e.g. 42.15)";

/// Converts parsed rows into expense records. Any issue fails the batch.
pub(crate) fn validate_rows(parsed_rows: Vec<ParsedRow>) -> ClientResult<Vec<ExpenseRecord>> {
    let mut records = Vec::with_capacity(parsed_rows.len());
    let mut issues = Vec::new();

    for raw in parsed_rows {
        let mut row_issues = Vec::new();
        let date = validate_date(raw.row, raw.date, &mut row_issues);
        let amount = validate_amount(raw.row, raw.amount, &mut row_issues);
        let category = validate_category(raw.row, raw.category, &mut row_issues);

        match (date, amount, category) {
            (Some(date), Some(amount), Some(category)) if row_issues.is_empty() => {
                records.push(ExpenseRecord::new(date, amount, category));
            }
            _ => issues.extend(row_issues),
        }
    }

    if !issues.is_empty() {
        return Err(ClientError::malformed_records(issues));
    }
    Ok(records)
}

fn validate_date(
    row: i64,
    value: Option<String>,
    issues: &mut Vec<RecordIssue>,
) -> Option<chrono::NaiveDate> {
    let Some(candidate) = normalize_optional(value) else {
        issues.push(missing_field(row, "date", DATE_EXPECTATION));
        return None;
    };

    let parsed = parse_expense_date(&candidate);
    if parsed.is_none() {
        issues.push(RecordIssue {
            row,
            field: "date".to_string(),
            code: "invalid_date".to_string(),
            description: format!("date must be an ISO-8601 date or timestamp; got \"{candidate}\""),
            expected: Some(DATE_EXPECTATION.to_string()),
            received: Some(candidate),
        });
    }
    parsed
}

fn validate_amount(row: i64, value: Option<String>, issues: &mut Vec<RecordIssue>) -> Option<f64> {
    let Some(candidate) = normalize_optional(value) else {
        issues.push(missing_field(row, "amount", AMOUNT_EXPECTATION));
        return None;
    };

    let Some(amount) = candidate
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
    else {
        issues.push(RecordIssue {
            row,
            field: "amount".to_string(),
            code: "invalid_number".to_string(),
            description: format!("amount must be numeric; got \"{candidate}\""),
            expected: Some(AMOUNT_EXPECTATION.to_string()),
            received: Some(candidate),
        });
        return None;
    };

    if amount < 0.0 {
        issues.push(RecordIssue {
            row,
            field: "amount".to_string(),
            code: "negative_amount".to_string(),
            description: format!("amount must not be negative; got {candidate}"),
            expected: Some(AMOUNT_EXPECTATION.to_string()),
            received: Some(candidate),
        });
        return None;
    }

    Some(amount)
}

fn validate_category(
    row: i64,
    value: Option<String>,
    issues: &mut Vec<RecordIssue>,
) -> Option<Category> {
    let Some(candidate) = normalize_optional(value) else {
        issues.push(missing_field(row, "category", "non-empty category label"));
        return None;
    };
    Some(Category::from_label(&candidate))
}

fn missing_field(row: i64, field: &str, expected: &str) -> RecordIssue {
    RecordIssue {
        row,
        field: field.to_string(),
        code: "missing_required_field".to_string(),
        description: format!("{field} must be present and non-empty."),
        expected: Some(expected.to_string()),
        received: Some(String::new()),
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    let raw = value?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::validate_rows;
    use crate::ErrorKind;
    use crate::analysis::types::{Category, KnownCategory};
    use crate::records::parse::ParsedRow;

    fn row(row: i64, date: &str, amount: &str, category: &str) -> ParsedRow {
        ParsedRow {
            row,
            date: Some(date.to_string()),
            amount: Some(amount.to_string()),
            category: Some(category.to_string()),
        }
    }

    #[test]
    fn valid_rows_become_records_in_order() {
        let validated = validate_rows(vec![
            row(1, "2026-01-05", "10.5", "Food"),
            row(2, "2026-01-06T10:00:00Z", "0", "Pets"),
        ]);
        assert!(validated.is_ok());
        if let Ok(records) = validated {
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].category, Category::Known(KnownCategory::Food));
            assert_eq!(records[1].amount, 0.0);
            assert_eq!(records[1].category, Category::Unknown("Pets".to_string()));
        }
    }

    #[test]
    fn every_issue_is_reported_and_the_batch_fails() {
        let validated = validate_rows(vec![
            row(1, "2026-01-05", "10.5", "Food"),
            row(2, "05/01/2026", "-3", "Food"),
            row(3, "2026-01-07", "abc", " "),
            ParsedRow {
                row: 4,
                ..ParsedRow::default()
            },
        ]);
        assert!(validated.is_err());
        if let Err(error) = validated {
            assert_eq!(error.kind, ErrorKind::MalformedRecord);
            let data = error.data.unwrap_or_default();
            assert_eq!(data["rows_invalid"], 3);

            let codes = data["issues"]
                .as_array()
                .map(|issues| {
                    issues
                        .iter()
                        .map(|issue| issue["code"].as_str().unwrap_or_default().to_string())
                        .collect::<Vec<String>>()
                })
                .unwrap_or_default();
            assert_eq!(
                codes,
                vec![
                    "invalid_date",
                    "negative_amount",
                    "invalid_number",
                    "missing_required_field",
                    "missing_required_field",
                    "missing_required_field",
                    "missing_required_field",
                ]
            );
        }
    }

    #[test]
    fn non_finite_amounts_are_invalid_numbers() {
        let validated = validate_rows(vec![row(1, "2026-01-05", "NaN", "Food")]);
        assert!(validated.is_err());
        if let Err(error) = validated {
            assert_eq!(error.kind, ErrorKind::MalformedRecord);
        }
    }
}
