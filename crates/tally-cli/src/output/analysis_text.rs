use std::io;

use serde_json::Value;

use super::format::{self, Column};

pub fn render_forecast(data: &Value) -> io::Result<String> {
    let predicted = number(data, "predicted_monthly_budget")
        .ok_or_else(|| io::Error::other("forecast output requires predicted_monthly_budget"))?;
    let method = text(data, "method");

    let mut entries = vec![
        ("Predicted budget:", format::money(predicted)),
        (
            "Confidence:",
            number(data, "confidence")
                .map(format::percent)
                .unwrap_or_else(|| "unknown".to_string()),
        ),
        ("Method:", method.replace('_', " ")),
    ];
    if let Some(r2) = number(data, "r2_score") {
        entries.push(("R² score:", format!("{r2:.3}")));
    }
    if let Some(trend) = number(data, "trend_per_month") {
        let sign = if trend < 0.0 { "-" } else { "+" };
        entries.push(("Trend:", format!("{sign}{} per month", format::money(trend.abs()))));
    }

    let mut lines = vec![
        "Next month's spending forecast".to_string(),
        String::new(),
    ];
    lines.extend(format::key_value_rows(&entries, 2));

    let monthly = rows(data, "monthly_totals");
    if !monthly.is_empty() {
        lines.push(String::new());
        lines.push("Monthly totals:".to_string());
        let table_rows = monthly
            .iter()
            .map(|row| {
                vec![
                    row.get("month_index")
                        .and_then(Value::as_i64)
                        .map(|index| index.to_string())
                        .unwrap_or_default(),
                    number(row, "total").map(format::money).unwrap_or_default(),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(format::render_table_or_blocks(
            &[Column::right("Month"), Column::right("Total")],
            &table_rows,
            format::terminal_width(),
            "Month",
        ));
    }

    if method == "simple_average" {
        lines.push(String::new());
        lines.push("Records span a single month, so the forecast is a simple average.".to_string());
    }

    lines.extend(input_footer(data));
    Ok(lines.join("\n"))
}

pub fn render_patterns(data: &Value) -> io::Result<String> {
    let clusters = data
        .get("clusters")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("patterns output requires clusters"))?;
    let patterns = rows(data, "pattern_analysis");

    let mut lines = vec!["Spending by category".to_string(), String::new()];
    let category_rows = clusters
        .iter()
        .map(|row| {
            vec![
                text(row, "category"),
                count(row, "count"),
                number(row, "total_amount").map(format::money).unwrap_or_default(),
                number(row, "average_amount").map(format::money).unwrap_or_default(),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table_or_blocks(
        &[
            Column::left("Category"),
            Column::right("Count"),
            Column::right("Total"),
            Column::right("Average"),
        ],
        &category_rows,
        format::terminal_width(),
        "Category",
    ));

    lines.push(String::new());
    if patterns.is_empty() {
        lines.push("No spending patterns: fewer than 2 records have a known category.".to_string());
    } else {
        lines.push(format!(
            "Spending patterns (k = {}, seed {}):",
            count(data, "k"),
            count(data, "seed")
        ));
        let pattern_rows = patterns
            .iter()
            .map(|row| {
                vec![
                    text(row, "description"),
                    text(row, "dominant_category"),
                    count(row, "count"),
                    number(row, "total_amount").map(format::money).unwrap_or_default(),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(format::render_table_or_blocks(
            &[
                Column::left("Pattern"),
                Column::left("Mostly"),
                Column::right("Count"),
                Column::right("Total"),
            ],
            &pattern_rows,
            format::terminal_width(),
            "Pattern",
        ));
    }

    let excluded = data
        .get("excluded_unknown_category")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    if excluded > 0 {
        lines.push(String::new());
        lines.push(format!(
            "{excluded} records with categories outside the known list were left out of clustering."
        ));
    }

    lines.extend(input_footer(data));
    Ok(lines.join("\n"))
}

pub fn render_anomalies(data: &Value) -> io::Result<String> {
    let findings = data
        .get("anomalies")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("anomalies output requires anomalies"))?;

    if findings.is_empty() {
        let mut lines = vec!["No anomalies found.".to_string()];
        lines.extend(input_footer(data));
        return Ok(lines.join("\n"));
    }

    let total = data
        .get("total_detected")
        .and_then(Value::as_u64)
        .unwrap_or(findings.len() as u64);
    let heading = if total as usize > findings.len() {
        format!("Found {total} anomalies (showing the {} largest)", findings.len())
    } else if total == 1 {
        "Found 1 anomaly".to_string()
    } else {
        format!("Found {total} anomalies")
    };

    let mut lines = vec![heading, String::new()];
    let table_rows = findings
        .iter()
        .map(|row| {
            vec![
                text(row, "date"),
                text(row, "category"),
                number(row, "amount").map(format::money).unwrap_or_default(),
                text(row, "reason"),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table_or_blocks(
        &[
            Column::left("Date"),
            Column::left("Category"),
            Column::right("Amount"),
            Column::left("Reason"),
        ],
        &table_rows,
        format::terminal_width(),
        "Finding",
    ));

    lines.extend(input_footer(data));
    Ok(lines.join("\n"))
}

pub fn render_health(data: &Value) -> io::Result<String> {
    let status = data
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("health output requires status"))?;
    let entries = [
        ("Status:", status.to_string()),
        ("Message:", text(data, "message")),
        ("Version:", text(data, "version")),
    ];
    Ok(format::key_value_rows(&entries, 0).join("\n"))
}

fn input_footer(data: &Value) -> Vec<String> {
    let Some(input) = data.get("input") else {
        return Vec::new();
    };
    let records = count(input, "records_read");
    let source = match input.get("source_ref").and_then(Value::as_str) {
        Some(reference) => format!("{} {reference}", text(input, "source_used")),
        None => text(input, "source_used"),
    };
    let mut footer = format!("Analyzed {records} records from {source}");
    if let (Some(earliest), Some(latest)) = (
        input.get("earliest").and_then(Value::as_str),
        input.get("latest").and_then(Value::as_str),
    ) {
        footer.push_str(&format!(" ({earliest} to {latest})"));
    }
    vec![String::new(), footer]
}

fn rows<'a>(data: &'a Value, key: &str) -> &'a [Value] {
    data.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn number(data: &Value, key: &str) -> Option<f64> {
    data.get(key).and_then(Value::as_f64)
}

fn count(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_u64)
        .map(|value| value.to_string())
        .unwrap_or_else(|| "0".to_string())
}

fn text(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}
