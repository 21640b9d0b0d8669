//! Static asset handlers
//!
//! Embeds the stylesheet at compile time

use axum::{http::StatusCode, response::{IntoResponse, Response}};

const CSVSCOPE_CSS: &str = include_str!("../../../static/csvscope.css");

/// GET /static/csvscope.css
pub async fn serve_csvscope_css() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/css"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        CSVSCOPE_CSS,
    )
        .into_response()
}
