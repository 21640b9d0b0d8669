//! HTTP handlers for csvscope
//!
//! HTML pages live in [`ui`]; the JSON health check in [`health`].

pub mod health;
pub mod ui;

pub use health::health_routes;
pub use ui::ui_routes;
