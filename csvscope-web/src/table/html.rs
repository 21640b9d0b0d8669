//! HTML fragments for the preview and statistics tables
//!
//! The markup follows the common data-frame `to_html` layout so that the
//! stylesheet can target `table.dataframe` together with the
//! `table-striped`/`table-bordered` markers.

use super::describe::{describe, ColumnSummary, STAT_LABELS};
use super::Table;

/// Rows shown by the head preview
pub const PREVIEW_ROWS: usize = 5;

pub const PREVIEW_CLASSES: &str = "dataframe table table-striped";
pub const SUMMARY_CLASSES: &str = "dataframe table table-bordered";

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Float for the preview: up to 6 decimals, trailing zeros trimmed, at least one decimal
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return format_special(value);
    }
    let text = format!("{:.6}", value);
    let trimmed = text.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Float for the statistics table: fixed 6 decimals
pub fn format_stat(value: f64) -> String {
    if !value.is_finite() {
        return format_special(value);
    }
    format!("{:.6}", value)
}

fn format_special(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

/// `<table>` open tag plus the header row
fn table_head<'a>(classes: &str, headers: impl Iterator<Item = &'a str>) -> String {
    let mut html = format!(
        "<table border=\"1\" class=\"{}\">\n  <thead>\n    <tr style=\"text-align: right;\">\n",
        classes
    );
    for header in headers {
        html.push_str(&format!("      <th>{}</th>\n", header));
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");
    html
}

/// First `n` rows (all columns, no index) as an HTML table
pub fn preview_html(table: &Table, n: usize) -> String {
    let headers: Vec<String> = table.headers().iter().map(|h| escape_html(h)).collect();
    let mut html = table_head(PREVIEW_CLASSES, headers.iter().map(String::as_str));

    for row in 0..n.min(table.row_count()) {
        html.push_str("    <tr>\n");
        for column in table.columns() {
            html.push_str(&format!("      <td>{}</td>\n", escape_html(&column.display(row))));
        }
        html.push_str("    </tr>\n");
    }

    html.push_str("  </tbody>\n</table>");
    html
}

/// Statistics of every numeric column as an HTML table
///
/// With no numeric columns the table keeps its eight labelled rows and has
/// no data columns.
pub fn describe_html(table: &Table) -> String {
    summary_table_html(&describe(table))
}

/// Render precomputed summaries
pub fn summary_table_html(summaries: &[ColumnSummary]) -> String {
    // Blank corner cell above the row labels
    let headers: Vec<String> = std::iter::once(String::new())
        .chain(summaries.iter().map(|s| escape_html(&s.name)))
        .collect();
    let mut html = table_head(SUMMARY_CLASSES, headers.iter().map(String::as_str));

    let rows: Vec<[(&str, f64); 8]> = summaries.iter().map(ColumnSummary::rows).collect();
    for (index, label) in STAT_LABELS.iter().enumerate() {
        html.push_str(&format!("    <tr>\n      <th>{}</th>\n", label));
        for column in &rows {
            html.push_str(&format!("      <td>{}</td>\n", format_stat(column[index].1)));
        }
        html.push_str("    </tr>\n");
    }

    html.push_str("  </tbody>\n</table>");
    html
}
