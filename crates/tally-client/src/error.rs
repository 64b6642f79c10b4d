use serde_json::{Value, json};
use thiserror::Error;

use crate::contracts::types::RecordIssue;

pub(crate) const INPUT_HELP_COMMAND: &str = "tally <command> --help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InsufficientData,
    MalformedRecord,
    InvalidInput,
    Internal,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsufficientData => "insufficient_data",
            Self::MalformedRecord => "malformed_record",
            Self::InvalidInput => "invalid_input",
            Self::Internal => "internal_error",
        }
    }

    pub const fn is_internal(self) -> bool {
        matches!(self, Self::Internal)
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub kind: ErrorKind,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(kind: ErrorKind, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            kind,
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn insufficient_data(command: &str, required: usize, received: usize) -> Self {
        Self::new(
            ErrorKind::InsufficientData,
            &format!(
                "Need at least {required} expenses for {}; received {received}.",
                command_label(command)
            ),
            vec![
                format!("Add more expense records until the input holds {required} or more."),
                format!("Rerun `tally {command} <path>`."),
            ],
        )
        .with_data(json!({
            "command": command,
            "required": required,
            "received": received,
        }))
    }

    pub fn empty_input() -> Self {
        Self::new(
            ErrorKind::InsufficientData,
            "No expense records were provided.",
            vec![
                "Pass a file with at least one expense record, or pipe records via stdin."
                    .to_string(),
            ],
        )
        .with_data(json!({
            "required": 1,
            "received": 0,
        }))
    }

    pub fn malformed_records(issues: Vec<RecordIssue>) -> Self {
        let rows_invalid = issues
            .iter()
            .map(|issue| issue.row)
            .collect::<std::collections::BTreeSet<i64>>()
            .len();
        Self::new(
            ErrorKind::MalformedRecord,
            &format!(
                "Input failed validation: {rows_invalid} records need fixes. No analysis was run."
            ),
            vec![
                "Fix the listed issues in your source file.".to_string(),
                "Dates must be ISO-8601 (e.g. 2026-01-15) and amounts non-negative numbers."
                    .to_string(),
                format!("Run `{INPUT_HELP_COMMAND}` to review the record fields."),
            ],
        )
        .with_data(json!({
            "rows_invalid": rows_invalid,
            "issues": issues,
        }))
    }

    pub fn invalid_input(message: &str) -> Self {
        Self::invalid_input_with_recovery(
            message,
            vec![
                "Provide a JSON array of expense objects or a CSV with date,amount,category headers."
                    .to_string(),
                format!("Run `{INPUT_HELP_COMMAND}` for usage."),
            ],
        )
    }

    pub fn invalid_input_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message, recovery_steps)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `tally {cmd} --help` for usage."),
            None => "Run `tally --help` for usage.".to_string(),
        };
        let error = Self::invalid_input_with_recovery(message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_input_format(message: &str, received_format: &str) -> Self {
        Self::invalid_input(message).with_data(json!({
            "received_format": received_format,
            "supported_formats": ["json_array", "json_expenses_object", "csv"],
        }))
    }

    pub fn input_schema_mismatch(expected_headers: Vec<String>, actual_headers: Vec<String>) -> Self {
        Self::invalid_input_with_recovery(
            "CSV headers do not match the expense schema.",
            vec![
                "Include exactly the headers date, amount and category.".to_string(),
                "Do not include unknown headers.".to_string(),
            ],
        )
        .with_data(json!({
            "expected_headers": expected_headers,
            "actual_headers": actual_headers,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new(ErrorKind::Internal, message, Vec::new())
    }
}

fn command_label(command: &str) -> &str {
    match command {
        "forecast" => "budget forecasting",
        "patterns" => "pattern analysis",
        "anomalies" => "anomaly detection",
        _ => "analysis",
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
