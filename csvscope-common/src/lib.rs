//! # csvscope Common Library
//!
//! Shared code for the csvscope crates:
//! - Common error type
//! - Configuration loading and upload folder resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
