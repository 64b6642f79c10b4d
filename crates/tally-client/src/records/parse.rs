use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::records::{RECORD_FIELDS, invalid_input_error};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Default)]
pub(crate) struct ParsedRow {
    pub(crate) row: i64,
    pub(crate) date: Option<String>,
    pub(crate) amount: Option<String>,
    pub(crate) category: Option<String>,
}

pub(crate) fn parse_source(content: &str) -> ClientResult<Vec<ParsedRow>> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(invalid_input_error("Expense source is empty."));
    }

    if trimmed.starts_with('[') {
        return parse_json_array(trimmed);
    }

    if trimmed.starts_with('{') {
        return parse_json_object(trimmed);
    }

    if looks_like_csv(trimmed) {
        return parse_csv(trimmed);
    }

    Err(ClientError::invalid_input_format(
        "Unsupported input format. Provide a JSON array, an {\"expenses\": [...]} object, or CSV with headers.",
        "unknown",
    ))
}

fn parse_json_array(content: &str) -> ClientResult<Vec<ParsedRow>> {
    let parsed = serde_json::from_str::<Value>(content)
        .map_err(|_| invalid_input_error("Invalid JSON input. Provide a valid JSON array."))?;
    let Some(items) = parsed.as_array() else {
        return Err(invalid_input_error(
            "JSON input must be an array of expense objects.",
        ));
    };
    rows_from_items(items)
}

fn parse_json_object(content: &str) -> ClientResult<Vec<ParsedRow>> {
    let parsed = serde_json::from_str::<Value>(content)
        .map_err(|_| invalid_input_error("Invalid JSON input. Provide a valid JSON object."))?;

    match parsed.get("expenses") {
        Some(Value::Array(items)) => rows_from_items(items),
        Some(_) => Err(invalid_input_error(
            "The `expenses` field must be an array of expense objects.",
        )),
        None => Err(ClientError::invalid_input_format(
            "JSON objects must wrap the records in an `expenses` array.",
            "json_object",
        )),
    }
}

fn rows_from_items(items: &[Value]) -> ClientResult<Vec<ParsedRow>> {
    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(object) = item.as_object() else {
            return Err(invalid_input_error(
                "JSON array entries must all be objects with date, amount and category fields.",
            ));
        };
        rows.push(row_from_object(index, object));
    }
    Ok(rows)
}

fn row_from_object(index: usize, object: &Map<String, Value>) -> ParsedRow {
    ParsedRow {
        row: row_number(index),
        date: read_optional_string(object.get("date")),
        amount: read_optional_string(object.get("amount")),
        category: read_optional_string(object.get("category")),
    }
}

fn parse_csv(content: &str) -> ClientResult<Vec<ParsedRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| invalid_input_error("CSV header row is missing or unreadable."))?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();

    if !headers_are_valid(&headers) {
        return Err(ClientError::input_schema_mismatch(
            expected_headers(),
            headers,
        ));
    }

    let index_by_name = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.to_string(), index))
        .collect::<HashMap<String, usize>>();

    let mut rows = Vec::new();
    for (row_index, result_row) in reader.records().enumerate() {
        let record =
            result_row.map_err(|_| invalid_input_error("CSV rows are malformed or not UTF-8."))?;

        rows.push(ParsedRow {
            row: row_number(row_index),
            date: value_for(&record, &index_by_name, "date"),
            amount: value_for(&record, &index_by_name, "amount"),
            category: value_for(&record, &index_by_name, "category"),
        });
    }

    Ok(rows)
}

fn row_number(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX).saturating_add(1)
}

fn value_for(
    record: &csv::StringRecord,
    index_by_name: &HashMap<String, usize>,
    field_name: &str,
) -> Option<String> {
    let index = index_by_name.get(field_name)?;
    let value = record.get(*index)?;
    Some(value.to_string())
}

fn read_optional_string(value: Option<&Value>) -> Option<String> {
    let current = value?;

    if current.is_null() {
        return None;
    }

    if let Some(string_value) = current.as_str() {
        return Some(string_value.to_string());
    }

    if let Some(number_value) = current.as_f64() {
        return Some(number_value.to_string());
    }

    Some(current.to_string())
}

fn looks_like_csv(content: &str) -> bool {
    let Some(first_line) = content.lines().find(|line| !line.trim().is_empty()) else {
        return false;
    };
    first_line.contains(',')
}

/// Every record field must appear exactly once and nothing else is allowed.
fn headers_are_valid(actual_headers: &[String]) -> bool {
    if actual_headers.len() != RECORD_FIELDS.len() {
        return false;
    }
    RECORD_FIELDS
        .iter()
        .all(|field| actual_headers.iter().any(|header| header == field))
}

fn expected_headers() -> Vec<String> {
    RECORD_FIELDS
        .iter()
        .map(|value| value.to_string())
        .collect()
}
