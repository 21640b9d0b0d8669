//! Descriptive statistics for numeric columns
//!
//! Matches the usual data-frame `describe()` conventions: missing values are
//! skipped, the standard deviation is the sample one (n - 1 denominator) and
//! percentiles interpolate linearly between the closest ranks.

use super::Table;

/// Statistics for one numeric column
///
/// Undefined statistics (empty column, std of a single value) are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Statistic values in [`STAT_LABELS`] order
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.p25,
            self.p50,
            self.p75,
            self.max,
        ]
    }

    /// `(label, value)` pairs in display order
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        let values = self.values();
        std::array::from_fn(|i| (STAT_LABELS[i], values[i]))
    }
}

/// Row labels of the statistics table
pub const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Summaries for every numeric column, in column order
pub fn describe(table: &Table) -> Vec<ColumnSummary> {
    table
        .numeric_columns()
        .map(|(name, values)| summarize(name, values))
        .collect()
}

/// Summarize one column of optional values
pub fn summarize(name: &str, values: &[Option<f64>]) -> ColumnSummary {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    present.sort_by(f64::total_cmp);

    ColumnSummary {
        name: name.to_string(),
        count: present.len(),
        mean: mean(&present),
        std: sample_std(&present),
        min: present.first().copied().unwrap_or(f64::NAN),
        p25: percentile(&present, 0.25),
        p50: percentile(&present, 0.50),
        p75: percentile(&present, 0.75),
        max: present.last().copied().unwrap_or(f64::NAN),
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1)
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Linear-interpolated percentile of an ascending slice, `q` in `[0, 1]`
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
    }
}
