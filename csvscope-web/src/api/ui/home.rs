//! Home page handler

use axum::response::Html;

use super::layout::{page, Page};

/// GET /
pub async fn home_page() -> Html<String> {
    Html(page(
        Page::Home,
        r#"<h1>csvscope</h1>
<p class="lead">Upload a CSV file and get a quick look at what is inside it.</p>
<ol class="steps">
    <li><a href="/upload">Upload</a> one or more <code>.csv</code> files.</li>
    <li><a href="/analyse">Analyse</a> a file: preview the first rows, read the summary statistics and compare column means.</li>
</ol>"#,
    ))
}
