use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tally_client::ClientResult;
use tally_client::SuccessEnvelope;
use tempfile::{Builder, TempDir};

pub fn temp_dir(prefix: &str) -> std::io::Result<TempDir> {
    Builder::new().prefix(prefix).tempdir()
}

pub fn write_fixture_json(base: &Path, name: &str, rows: &[Value]) -> std::io::Result<PathBuf> {
    let path = base.join(name);
    let body = serde_json::to_string_pretty(rows).map_err(std::io::Error::other)?;
    fs::write(&path, body)?;
    Ok(path)
}

pub fn write_fixture_text(base: &Path, name: &str, body: &str) -> std::io::Result<PathBuf> {
    let path = base.join(name);
    fs::write(&path, body)?;
    Ok(path)
}

pub fn expense(date: &str, amount: f64, category: &str) -> Value {
    json!({
        "date": date,
        "amount": amount,
        "category": category,
    })
}

pub fn stdin_body(rows: &[Value]) -> String {
    serde_json::to_string(rows).unwrap_or_default()
}

/// Serializes a command response, or returns `Null` after failing the test.
pub fn payload(result: ClientResult<SuccessEnvelope>) -> Value {
    assert!(result.is_ok());
    if let Ok(success) = result {
        let value = serde_json::to_value(success);
        assert!(value.is_ok());
        if let Ok(value) = value {
            return value;
        }
    }
    Value::Null
}
