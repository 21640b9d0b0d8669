//! About page handler

use axum::response::Html;

use super::layout::{page, Page};

/// GET /about
pub async fn about_page() -> Html<String> {
    let body = format!(
        r#"<h1>About csvscope</h1>
<p>csvscope is a small self-hosted tool for a first look at tabular data.</p>
<ul>
    <li>Uploaded files are kept in a single folder on the server, under a sanitized name.</li>
    <li>The analysis shows the first {} rows, count, mean, standard deviation, min, quartiles and max of every numeric column.</li>
    <li>The chart plots the mean of each numeric column with a &plusmn; one standard deviation error bar.</li>
</ul>
<p>Version {}</p>"#,
        crate::table::PREVIEW_ROWS,
        env!("CARGO_PKG_VERSION")
    );
    Html(page(Page::About, &body))
}
