//! Configuration loading and upload folder resolution
//!
//! Bootstrap configuration comes from (highest priority first):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! A missing or unreadable TOML file never stops startup: the service logs a
//! warning and continues with defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the upload folder
pub const UPLOAD_FOLDER_ENV: &str = "CSVSCOPE_UPLOAD_FOLDER";

/// Upload folder used when nothing else is configured (relative to the working directory)
pub const DEFAULT_UPLOAD_FOLDER: &str = "uploads";

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5780;

/// Request body limit for uploads (16 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; absent values fall through to the compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Directory holding uploaded CSV files
    #[serde(default)]
    pub upload_folder: Option<PathBuf>,

    /// Interface to bind the HTTP server to
    #[serde(default)]
    pub bind_address: Option<String>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Maximum accepted request body size in bytes
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Platform config file location: `{config_dir}/csvscope/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("csvscope").join("config.toml"))
}

/// Load the TOML config, falling back to defaults
///
/// An explicit path that cannot be loaded is logged as a warning. When no
/// explicit path is given, the platform default location is tried silently.
pub fn load_config_or_default(explicit: Option<&Path>) -> TomlConfig {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return TomlConfig::default(),
        },
    };

    match load_toml_config(&path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Using default configuration: {}", e);
            TomlConfig::default()
        }
    }
}

/// Resolves the upload folder by priority order
pub struct UploadFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_value: Option<PathBuf>,
}

impl UploadFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>) -> Self {
        Self {
            cli_arg,
            toml_value: None,
        }
    }

    /// Use the `upload_folder` entry of a loaded TOML config as the third tier
    pub fn with_toml_config(mut self, config: &TomlConfig) -> Self {
        self.toml_value = config.upload_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(UPLOAD_FOLDER_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Some(path) = &self.toml_value {
            return path.clone();
        }

        // Priority 4: Compiled default
        PathBuf::from(DEFAULT_UPLOAD_FOLDER)
    }
}

/// Creates the upload folder on first start
pub struct UploadFolderInitializer {
    folder: PathBuf,
}

impl UploadFolderInitializer {
    pub fn new(folder: PathBuf) -> Self {
        Self { folder }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.folder.exists() {
            info!("Creating upload folder: {}", self.folder.display());
        }
        std::fs::create_dir_all(&self.folder)?;
        Ok(())
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

/// HTTP server settings after resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Merge command-line/environment values (already combined by the argument
    /// parser) over the TOML config and compiled defaults
    pub fn resolve(cli_bind: Option<String>, cli_port: Option<u16>, toml: &TomlConfig) -> Self {
        Self {
            bind_address: cli_bind
                .or_else(|| toml.bind_address.clone())
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port: cli_port.or(toml.port).unwrap_or(DEFAULT_PORT),
            max_upload_bytes: toml.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| {
                Error::Config(format!(
                    "Invalid bind address {}:{}: {}",
                    self.bind_address, self.port, e
                ))
            })
    }
}
