//! csvscope-web library interface
//!
//! Exposes the router and its building blocks for the binary and for
//! integration tests.

pub mod api;
pub mod chart;
pub mod error;
pub mod store;
pub mod table;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use csvscope_common::config::DEFAULT_MAX_UPLOAD_BYTES;
use tower_http::trace::TraceLayer;

use crate::store::FileStore;

/// Application state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Upload directory, the only persistent state
    pub store: FileStore,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: FileStore) -> Self {
        Self {
            store,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router with the default upload size limit
pub fn build_router(state: AppState) -> Router {
    build_router_with_limit(state, DEFAULT_MAX_UPLOAD_BYTES)
}

/// Build application router, rejecting request bodies over `max_upload_bytes`
pub fn build_router_with_limit(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        // UI routes (HTML pages)
        .merge(api::ui_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
