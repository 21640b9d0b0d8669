//! In-memory CSV tables
//!
//! A [`Table`] is loaded fresh for every analysis request and dropped with the
//! response. Column types are inferred once at load time:
//! - every present cell parses as a float -> [`Column::Numeric`]
//! - otherwise -> [`Column::Text`]
//!
//! A column in which every cell is missing counts as numeric.

pub mod describe;
pub mod html;

use std::io::Read;
use std::path::Path;
use thiserror::Error;

pub use describe::{describe, summarize, ColumnSummary};
pub use html::{describe_html, escape_html, preview_html, PREVIEW_ROWS};

/// Cell values treated as missing (besides empty/whitespace-only cells)
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Errors raised while loading a table
#[derive(Debug, Error)]
pub enum TableError {
    /// The file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The content is not valid delimited tabular data
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(e) => TableError::Io(e),
            _ => TableError::Parse(message),
        }
    }
}

/// One typed column
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Floating point values, `None` marks a missing cell
    Numeric {
        values: Vec<Option<f64>>,
        /// Exact values when every cell is present and written as an integer
        integers: Option<Vec<i64>>,
    },
    /// Free text, `None` marks a missing cell
    Text(Vec<Option<String>>),
}

impl Column {
    /// Infer the column type from raw cell text
    fn infer(cells: Vec<Option<String>>) -> Self {
        let mut values = Vec::with_capacity(cells.len());
        let mut integers = Some(Vec::with_capacity(cells.len()));

        for cell in &cells {
            let Some(text) = cell else {
                values.push(None);
                integers = None;
                continue;
            };
            let text = text.trim();
            match text.parse::<f64>() {
                // "NAN"/"nAn" spellings parse as NaN; treat them as missing too
                Ok(v) if v.is_nan() => {
                    values.push(None);
                    integers = None;
                }
                Ok(v) => {
                    values.push(Some(v));
                    integers = match (integers, text.parse::<i64>()) {
                        (Some(mut exact), Ok(i)) => {
                            exact.push(i);
                            Some(exact)
                        }
                        _ => None,
                    };
                }
                Err(_) => return Column::Text(cells),
            }
        }

        Column::Numeric { values, integers }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Numeric { values, .. } => values.len(),
            Column::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric { .. })
    }

    /// Numeric values, or `None` for a text column
    pub fn numeric_values(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Numeric { values, .. } => Some(values),
            Column::Text(_) => None,
        }
    }

    /// Display text for one cell (unescaped)
    pub fn display(&self, row: usize) -> String {
        match self {
            Column::Numeric {
                integers: Some(exact),
                ..
            } => match exact.get(row) {
                Some(i) => i.to_string(),
                None => "NaN".to_string(),
            },
            Column::Numeric { values, .. } => match values.get(row).copied().flatten() {
                Some(v) => html::format_float(v),
                None => "NaN".to_string(),
            },
            Column::Text(values) => match values.get(row) {
                Some(Some(text)) => text.clone(),
                _ => "NaN".to_string(),
            },
        }
    }
}

/// Parsed CSV contents: ordered header names, one typed column per header
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Load a CSV file from disk
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse CSV from any reader
    ///
    /// The first record is the header row. Short rows are padded with missing
    /// cells; rows with more cells than headers are rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = dedupe_headers(reader.headers()?.iter());
        if headers.is_empty() {
            return Err(TableError::Parse("No columns to parse from file".to_string()));
        }

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        let mut row_count = 0;

        for record in reader.records() {
            let record = record?;

            // Whitespace-only lines
            if record.len() == 1 && record[0].trim().is_empty() {
                continue;
            }

            if record.len() > headers.len() {
                return Err(TableError::Parse(format!(
                    "Expected {} fields in line {}, saw {}",
                    headers.len(),
                    record.position().map_or(0, |p| p.line()),
                    record.len()
                )));
            }

            for (col, column_cells) in cells.iter_mut().enumerate() {
                column_cells.push(record.get(col).and_then(parse_cell));
            }
            row_count += 1;
        }

        let columns = cells.into_iter().map(Column::infer).collect();

        Ok(Self {
            headers,
            columns,
            row_count,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `(name, values)` for every numeric column, in column order
    pub fn numeric_columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.headers
            .iter()
            .zip(&self.columns)
            .filter_map(|(name, column)| column.numeric_values().map(|v| (name.as_str(), v)))
    }

    pub fn has_numeric_columns(&self) -> bool {
        self.columns.iter().any(Column::is_numeric)
    }
}

/// Load the CSV file at `path`
pub fn load_table(path: &Path) -> Result<Table, TableError> {
    Table::load(path)
}

/// Missing-value detection for one raw cell
fn parse_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Name blank headers `Unnamed: {i}` and suffix repeats with `.1`, `.2`, ...
fn dedupe_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for (index, name) in raw.enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {}", index)
        } else {
            name.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while headers.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        headers.push(candidate);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(content: &str) -> Table {
        Table::from_reader(content.as_bytes()).unwrap()
    }

    #[test]
    fn test_mixed_columns() {
        let t = table("a,b\n1,x\n2,y\n3,z\n");
        assert_eq!(t.headers(), &["a".to_string(), "b".to_string()]);
        assert_eq!(t.row_count(), 3);
        assert_eq!(
            t.columns()[0],
            Column::Numeric {
                values: vec![Some(1.0), Some(2.0), Some(3.0)],
                integers: Some(vec![1, 2, 3])
            }
        );
        assert!(!t.columns()[1].is_numeric());
    }

    #[test]
    fn test_missing_values_keep_numeric_type() {
        let t = table("v,w\n1.5,\nNA,2\n,3\n");
        assert_eq!(
            t.columns()[0].numeric_values().unwrap(),
            &[Some(1.5), None, None]
        );
        assert_eq!(
            t.columns()[1],
            Column::Numeric {
                values: vec![None, Some(2.0), Some(3.0)],
                integers: None
            }
        );
    }

    #[test]
    fn test_all_missing_column_is_numeric() {
        let t = table("a,b\n,x\n,y\n");
        assert!(t.columns()[0].is_numeric());
        assert_eq!(t.numeric_columns().count(), 1);
    }

    #[test]
    fn test_text_column_keeps_missing_markers() {
        let t = table("name\nalice\n\nNA\n");
        // empty lines are skipped by the reader
        assert_eq!(t.row_count(), 2);
        assert_eq!(
            t.columns()[0],
            Column::Text(vec![Some("alice".to_string()), None])
        );
        assert!(!t.has_numeric_columns());
    }

    #[test]
    fn test_whitespace_lines_skipped_in_single_column() {
        let t = table("n\n1\n   \n2\n\t\n");
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.columns()[0].numeric_values().unwrap(), &[Some(1.0), Some(2.0)]);
        assert!(!preview_html(&t, PREVIEW_ROWS).contains("NaN"));
    }

    #[test]
    fn test_large_integers_display_exactly() {
        let t = table("id,score\n9007199254740993,1.5\n-9007199254740995,2\n");
        assert_eq!(t.columns()[0].display(0), "9007199254740993");
        assert_eq!(t.columns()[0].display(1), "-9007199254740995");
        assert!(preview_html(&t, PREVIEW_ROWS).contains("<td>9007199254740993</td>"));
    }

    #[test]
    fn test_short_rows_padded() {
        let t = table("a,b,c\n1,2\n4,5,6\n");
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.columns()[2].numeric_values().unwrap(), &[None, Some(6.0)]);
    }

    #[test]
    fn test_long_row_rejected() {
        let result = Table::from_reader("a,b\n1,2,3\n".as_bytes());
        match result {
            Err(TableError::Parse(msg)) => assert!(msg.contains("Expected 2 fields")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            Table::from_reader("".as_bytes()),
            Err(TableError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let bytes: &[u8] = b"a,b\n\xff\xfe,1\n";
        assert!(matches!(Table::from_reader(bytes), Err(TableError::Parse(_))));
    }

    #[test]
    fn test_header_only() {
        let t = table("a,b\n");
        assert_eq!(t.row_count(), 0);
        assert_eq!(t.column_count(), 2);
        assert!(t.columns().iter().all(Column::is_empty));
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let t = table("a,a,,a\n1,2,3,4\n");
        assert_eq!(
            t.headers(),
            &[
                "a".to_string(),
                "a.1".to_string(),
                "Unnamed: 2".to_string(),
                "a.2".to_string()
            ]
        );
    }

    #[test]
    fn test_display_formats() {
        let t = table("i,f,s\n1,1.5,x\n2,,\n");
        assert_eq!(t.columns()[0].display(0), "1");
        assert_eq!(t.columns()[1].display(0), "1.5");
        assert_eq!(t.columns()[1].display(1), "NaN");
        assert_eq!(t.columns()[2].display(1), "NaN");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = load_table(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(TableError::Io(_))));
    }
}
