//! Error types for csvscope-web
//!
//! Validation problems (wrong file type, unknown selection, malformed CSV)
//! are rendered in-band by the handlers. Everything that reaches
//! [`ApiError`] is a server-side failure and becomes an HTML 500 page,
//! except broken multipart bodies, which keep their 4xx status.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::api::ui::layout::{page, Page};
use crate::chart::ChartError;
use crate::table::{escape_html, TableError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// csvscope-common error (upload folder access)
    #[error("Storage error: {0}")]
    Common(#[from] csvscope_common::Error),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    /// Malformed or oversized multipart upload; keeps the status axum assigns
    #[error("Upload error: {0}")]
    Upload(#[from] MultipartError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Upload(err) => err.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        let body = format!(
            r#"<h1>Something went wrong</h1>
<p class="alert alert-danger">{}</p>"#,
            escape_html(&self.to_string())
        );

        (status, Html(page(Page::Error, &body))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_error_renders_html_500() {
        let err = ApiError::Common(csvscope_common::Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "uploads <locked>",
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()["content-type"],
            "text/html; charset=utf-8"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.contains("uploads &lt;locked&gt;"));
        assert!(body.contains("<!DOCTYPE html>"));
    }
}
