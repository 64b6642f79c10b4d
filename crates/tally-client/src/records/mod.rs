pub(crate) mod input;
pub(crate) mod parse;
pub(crate) mod validate;

use tracing::debug;

use crate::analysis::date::format_iso_date;
use crate::analysis::types::ExpenseRecord;
use crate::contracts::types::InputSummary;
use crate::error::INPUT_HELP_COMMAND;
use crate::records::input::ResolvedSource;
use crate::{ClientError, ClientResult};

pub(crate) const RECORD_FIELDS: [&str; 3] = ["date", "amount", "category"];

#[derive(Debug, Clone)]
pub(crate) struct LoadedRecords {
    pub(crate) records: Vec<ExpenseRecord>,
    pub(crate) summary: InputSummary,
}

/// Reads, parses and validates expense records from a path or stdin.
pub(crate) fn load(
    path: Option<String>,
    stdin_override: Option<String>,
) -> ClientResult<LoadedRecords> {
    let source = input::resolve_source(path, stdin_override)?;
    load_resolved(source)
}

pub(crate) fn load_resolved(source: ResolvedSource) -> ClientResult<LoadedRecords> {
    let records = parse_records(&source.content)?;
    debug!(
        source = source.kind.as_str(),
        records = records.len(),
        "loaded expense records"
    );
    let summary = summarize(&records, &source);
    Ok(LoadedRecords { records, summary })
}

/// Parses a JSON array, an `{"expenses": [...]}` object, or CSV text into
/// validated expense records.
pub fn parse_records(content: &str) -> ClientResult<Vec<ExpenseRecord>> {
    let rows = parse::parse_source(content)?;
    validate::validate_rows(rows)
}

fn summarize(records: &[ExpenseRecord], source: &ResolvedSource) -> InputSummary {
    let earliest = records.iter().map(|record| record.date).min();
    let latest = records.iter().map(|record| record.date).max();
    InputSummary {
        records_read: records.len(),
        source_used: source.kind.as_str().to_string(),
        source_ref: source.source_ref.clone(),
        earliest: earliest.as_ref().map(format_iso_date),
        latest: latest.as_ref().map(format_iso_date),
    }
}

pub(crate) fn invalid_input_error(message: &str) -> ClientError {
    ClientError::invalid_input_with_recovery(
        message,
        vec![
            "Provide a JSON array, an {\"expenses\": [...]} object, or CSV via path or stdin."
                .to_string(),
            format!("Run `{INPUT_HELP_COMMAND}` to confirm the record fields."),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::load;
    use crate::ErrorKind;

    #[test]
    fn load_summarizes_source_and_date_range() {
        let loaded = load(
            None,
            Some(
                "date,amount,category\n2026-03-02,5,Food\n2026-01-20,7,Bills\n2026-02-11,9,Food\n"
                    .to_string(),
            ),
        );
        assert!(loaded.is_ok());
        if let Ok(loaded) = loaded {
            assert_eq!(loaded.records.len(), 3);
            assert_eq!(loaded.summary.records_read, 3);
            assert_eq!(loaded.summary.source_used, "stdin");
            assert_eq!(loaded.summary.earliest.as_deref(), Some("2026-01-20"));
            assert_eq!(loaded.summary.latest.as_deref(), Some("2026-03-02"));
        }
    }

    #[test]
    fn empty_array_loads_zero_records() {
        let loaded = load(None, Some("[]".to_string()));
        assert!(loaded.is_ok());
        if let Ok(loaded) = loaded {
            assert!(loaded.records.is_empty());
            assert_eq!(loaded.summary.earliest, None);
        }
    }

    #[test]
    fn malformed_rows_surface_as_malformed_record() {
        let loaded = load(None, Some(r#"[{"date":"soon","amount":1,"category":"Food"}]"#.to_string()));
        assert!(loaded.is_err());
        if let Err(error) = loaded {
            assert_eq!(error.kind, ErrorKind::MalformedRecord);
        }
    }
}
