use std::cmp;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

impl<'a> Column<'a> {
    pub const fn left(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Left,
        }
    }

    pub const fn right(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Right,
        }
    }
}

const INDENT: usize = 2;
const COLUMN_GAP: usize = 2;

pub fn terminal_width() -> usize {
    let from_env = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(120);
    cmp::max(from_env, 40)
}

pub fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

pub fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    let label_width = entries
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| format!("{padding}{label:<label_width$}  {value}"))
        .collect()
}

/// Renders an aligned table, or one labelled block per row when the table
/// would not fit in `max_width`.
pub fn render_table_or_blocks(
    columns: &[Column<'_>],
    rows: &[Vec<String>],
    max_width: usize,
    block_label: &str,
) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let widths = column_widths(columns, rows);
    let table_width =
        INDENT + widths.iter().sum::<usize>() + COLUMN_GAP * columns.len().saturating_sub(1);
    if table_width > max_width {
        return render_blocks(columns, rows, block_label);
    }

    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    let mut output = vec![format_row(columns, &header, &widths)];
    output.extend(rows.iter().map(|row| format_row(columns, row, &widths)));
    output
}

fn column_widths(columns: &[Column<'_>], rows: &[Vec<String>]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .fold(column.name.len(), cmp::max)
        })
        .collect()
}

fn format_row(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let pieces = columns
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (column, width))| {
            let value = cells.get(index).map(String::as_str).unwrap_or("");
            match column.align {
                Align::Left => format!("{value:<width$}"),
                Align::Right => format!("{value:>width$}"),
            }
        })
        .collect::<Vec<String>>();
    let line = format!("{}{}", " ".repeat(INDENT), pieces.join(&" ".repeat(COLUMN_GAP)));
    line.trim_end().to_string()
}

fn render_blocks(columns: &[Column<'_>], rows: &[Vec<String>], block_label: &str) -> Vec<String> {
    let labels = columns
        .iter()
        .map(|column| format!("{}:", column.name))
        .collect::<Vec<String>>();

    let mut output = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        if row_index > 0 {
            output.push(String::new());
        }
        output.push(format!("  {block_label} {}:", row_index + 1));
        let entries = labels
            .iter()
            .enumerate()
            .map(|(index, label)| (label.as_str(), row.get(index).cloned().unwrap_or_default()))
            .collect::<Vec<(&str, String)>>();
        output.extend(key_value_rows(&entries, 4));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::{Column, key_value_rows, money, percent, render_table_or_blocks};

    #[test]
    fn key_value_rows_align_labels() {
        let rows = key_value_rows(
            &[
                ("Records:", "100".to_string()),
                ("Confidence:", "95%".to_string()),
            ],
            2,
        );

        assert_eq!(rows[0], "  Records:     100");
        assert_eq!(rows[1], "  Confidence:  95%");
    }

    #[test]
    fn table_aligns_columns_when_width_allows() {
        let columns = [Column::left("Category"), Column::right("Total")];
        let rows = vec![
            vec!["Food".to_string(), "$12.50".to_string()],
            vec!["Entertainment".to_string(), "$1200.00".to_string()],
        ];

        let rendered = render_table_or_blocks(&columns, &rows, 80, "Row");
        assert_eq!(rendered.len(), 3);
        assert_eq!(rendered[0], "  Category          Total");
        assert_eq!(rendered[1], "  Food             $12.50");
        assert_eq!(rendered[2], "  Entertainment  $1200.00");
    }

    #[test]
    fn narrow_width_falls_back_to_blocks() {
        let columns = [Column::left("Date"), Column::left("Reason")];
        let rows = vec![vec![
            "2026-01-05".to_string(),
            "Amount exceeds mean by 3.10 standard deviations".to_string(),
        ]];

        let rendered = render_table_or_blocks(&columns, &rows, 40, "Finding");
        assert_eq!(rendered[0], "  Finding 1:");
        assert_eq!(rendered[1], "    Date:    2026-01-05");
        assert!(rendered[2].starts_with("    Reason:  Amount exceeds"));
    }

    #[test]
    fn money_and_percent_use_fixed_precision() {
        assert_eq!(money(3.0), "$3.00");
        assert_eq!(percent(0.6), "60%");
    }
}
