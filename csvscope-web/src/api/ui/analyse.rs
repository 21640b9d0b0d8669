//! Analyse page handlers
//!
//! The selected file is checked against the current listing before anything
//! is read from disk. Loading, statistics and chart rendering are CPU-bound
//! and run on the blocking pool.

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::response::Html;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, warn};

use super::layout::{message_html, page, Page};
use crate::chart::{render_mean_std_chart, ChartImage};
use crate::table::{describe_html, escape_html, load_table, preview_html, TableError, PREVIEW_ROWS};
use crate::{ApiError, ApiResult, AppState};

pub const NO_DATA_MESSAGE: &str = "No data uploaded. Please upload a CSV file.";
pub const INVALID_SELECTION_MESSAGE: &str = "Invalid file selected.";

/// POST /analyse form body
#[derive(Debug, Deserialize)]
pub struct AnalyseForm {
    #[serde(default)]
    pub selected_file: Option<String>,
}

/// Rendered pieces of one analysis
#[derive(Debug)]
struct Analysis {
    preview: String,
    summary: String,
    chart: Option<ChartImage>,
}

/// Load `path` and build the preview, statistics and chart
fn analyse_file(path: PathBuf, title: String) -> ApiResult<Analysis> {
    let table = load_table(&path)?;
    info!(
        "Analysing {}: {} rows, {} columns",
        title,
        table.row_count(),
        table.column_count()
    );

    Ok(Analysis {
        preview: preview_html(&table, PREVIEW_ROWS),
        summary: describe_html(&table),
        chart: render_mean_std_chart(&table, &title)?,
    })
}

fn selection_form_html(files: &[String], selected: Option<&str>) -> String {
    let options: String = files
        .iter()
        .map(|f| {
            let marker = if Some(f.as_str()) == selected { " selected" } else { "" };
            format!(
                "        <option value=\"{0}\"{1}>{0}</option>\n",
                escape_html(f),
                marker
            )
        })
        .collect();

    format!(
        r#"<form method="post" action="/analyse" class="select-form">
    <label for="selected_file">File</label>
    <select id="selected_file" name="selected_file">
{}    </select>
    <button type="submit">Analyse</button>
</form>
"#,
        options
    )
}

fn analysis_html(selected: &str, analysis: &Analysis) -> String {
    let chart = match &analysis.chart {
        Some(chart) => format!(
            r#"<img class="chart" src="{}" alt="Mean and standard deviation of numeric columns">"#,
            chart.data_url()
        ),
        None => r#"<p class="muted">No numeric columns to plot.</p>"#.to_string(),
    };

    format!(
        r#"<section class="analysis">
<h2>Results for <span class="filename">{}</span></h2>
<h3>Preview</h3>
<div class="table-wrap">
{}
</div>
<h3>Summary statistics</h3>
<div class="table-wrap">
{}
</div>
<h3>Mean &plusmn; standard deviation</h3>
{}
</section>
"#,
        escape_html(selected),
        analysis.preview,
        analysis.summary,
        chart
    )
}

/// Full analyse view; the selection form is shown whenever files exist
fn analyse_view(
    files: &[String],
    message: Option<&str>,
    selected: Option<&str>,
    analysis: Option<&Analysis>,
) -> String {
    let mut body = String::from("<h1>Analyse</h1>\n");
    body.push_str(&message_html(message));

    if files.is_empty() {
        body.push_str(r#"<p><a href="/upload">Upload a CSV file</a></p>"#);
    } else {
        body.push_str(&selection_form_html(files, selected));
    }

    if let (Some(selected), Some(analysis)) = (selected, analysis) {
        body.push_str(&analysis_html(selected, analysis));
    }

    page(Page::Analyse, &body)
}

fn sorted_csv_files(state: &AppState) -> ApiResult<Vec<String>> {
    let mut files = state.store.list_csv_files()?;
    files.sort();
    Ok(files)
}

/// GET /analyse
pub async fn analyse_page(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let files = sorted_csv_files(&state)?;
    let message = files.is_empty().then_some(NO_DATA_MESSAGE);
    Ok(Html(analyse_view(&files, message, None, None)))
}

/// POST /analyse
pub async fn analyse_submit(
    State(state): State<AppState>,
    form: Result<Form<AnalyseForm>, FormRejection>,
) -> ApiResult<Html<String>> {
    let files = sorted_csv_files(&state)?;
    if files.is_empty() {
        return Ok(Html(analyse_view(&files, Some(NO_DATA_MESSAGE), None, None)));
    }

    // A missing or non-urlencoded body selects nothing
    let selected_file = match form {
        Ok(Form(form)) => form.selected_file,
        Err(rejection) => {
            warn!("Analysis request without a form body: {}", rejection);
            None
        }
    };

    let selected = match selected_file {
        Some(name) if files.contains(&name) => name,
        other => {
            warn!("Rejected analysis of {:?}: not an uploaded file", other);
            return Ok(Html(analyse_view(
                &files,
                Some(INVALID_SELECTION_MESSAGE),
                None,
                None,
            )));
        }
    };

    let path = state.store.path_of(&selected);
    let title = selected.clone();
    let result = tokio::task::spawn_blocking(move || analyse_file(path, title))
        .await
        .map_err(|e| ApiError::Internal(format!("Analysis task failed: {}", e)))?;

    match result {
        Ok(analysis) => Ok(Html(analyse_view(
            &files,
            None,
            Some(selected.as_str()),
            Some(&analysis),
        ))),
        Err(ApiError::Table(TableError::Parse(reason))) => {
            warn!("Could not parse {}: {}", selected, reason);
            let message = format!("Could not read {}: {}", selected, reason);
            Ok(Html(analyse_view(&files, Some(message.as_str()), Some(selected.as_str()), None)))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_form_marks_selected() {
        let files = vec!["a.csv".to_string(), "b.csv".to_string()];
        let html = selection_form_html(&files, Some("b.csv"));
        assert!(html.contains(r#"<option value="a.csv">a.csv</option>"#));
        assert!(html.contains(r#"<option value="b.csv" selected>b.csv</option>"#));
    }

    #[test]
    fn test_view_without_files_has_no_form() {
        let html = analyse_view(&[], Some(NO_DATA_MESSAGE), None, None);
        assert!(html.contains(NO_DATA_MESSAGE));
        assert!(!html.contains("<select"));
    }

    #[test]
    fn test_analysis_without_chart() {
        let analysis = Analysis {
            preview: "<table>p</table>".to_string(),
            summary: "<table>s</table>".to_string(),
            chart: None,
        };
        let html = analysis_html("x.csv", &analysis);
        assert!(html.contains("No numeric columns to plot."));
        assert!(!html.contains("<img"));
        assert!(html.contains("<table>p</table>"));
    }
}
