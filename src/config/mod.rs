//! # Configuration
//!
//! TOML configuration for the srordle client. `srordle init` writes the defaults;
//! every section may be omitted and falls back to those defaults.
//!
//! ## Sections
//!
//! - [`ServerConfig`] - where the game server lives and how long to wait for it
//! - [`StorageConfig`] - where saved progress is kept
//! - [`LoggingConfig`] - log level and optional log file
//! - [`DisplayConfig`] - terminal output
//!
//! ## Usage
//!
//! ```rust,no_run
//! use srordle::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("srordle.toml").await?;
//!     config.validate()?;
//!     println!("Server: {}", config.server.base_url);
//!     Ok(())
//! }
//! ```
//!
//! ## File format
//!
//! ```toml
//! [server]
//! base_url = "http://localhost:8000"
//! timeout_seconds = 5
//!
//! [storage]
//! data_dir = "./data"
//! backend = "file"   # or "sled"
//!
//! [logging]
//! level = "info"
//! file = "srordle.log"
//!
//! [display]
//! color = true
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

pub const DEFAULT_CONFIG_PATH: &str = "srordle.toml";

/// Backends accepted in `[storage] backend`. `memory` keeps nothing between runs.
pub const STORAGE_BACKENDS: [&str; 3] = ["file", "sled", "memory"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_seconds() -> u64 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_backend")]
    pub backend: String,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_backend() -> String {
    "file".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: default_backend(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: Some("srordle.log".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Emit 24-bit ANSI colors for the board and keyboard.
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_color() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Write the default configuration to `path`
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.trim().is_empty() {
            return Err(anyhow!("[server] base_url must not be empty"));
        }
        if self.server.timeout_seconds == 0 {
            return Err(anyhow!("[server] timeout_seconds must be at least 1"));
        }
        if !STORAGE_BACKENDS.contains(&self.storage.backend.as_str()) {
            return Err(anyhow!(
                "[storage] backend {:?} is not one of {}",
                self.storage.backend,
                STORAGE_BACKENDS.join(", ")
            ));
        }
        Ok(())
    }
}
