//! UI routes - HTML pages for the csvscope web interface
//!
//! - **Home** (`home`): landing page
//! - **Upload** (`upload`): CSV upload form and confirmation
//! - **Analyse** (`analyse`): file selection, preview, statistics and chart
//! - **About** (`about`): project description
//! - **Static Assets** (`static_assets`): embedded stylesheet
//!
//! Every page is wrapped by [`layout::page`].

use axum::{routing::get, Router};
use crate::AppState;

pub mod layout;
mod static_assets;
mod home;
mod upload;
mod analyse;
mod about;

use static_assets::serve_csvscope_css;
use home::home_page;
use upload::{upload_form, upload_submit};
use analyse::{analyse_page, analyse_submit};
use about::about_page;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        // Page routes
        .route("/", get(home_page))
        .route("/upload", get(upload_form).post(upload_submit))
        .route("/analyse", get(analyse_page).post(analyse_submit))
        .route("/about", get(about_page))
        // Static assets
        .route("/static/csvscope.css", get(serve_csvscope_css))
}
