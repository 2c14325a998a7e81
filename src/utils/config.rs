// Configuration utilities
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::path::Path;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::query::DEFAULT_PAGE_LIMIT;
use super::{AppError, AppResult};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub pagination: PaginationConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
            enable_cors: false,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file with `users`, `appointments` and `lifeguards` arrays
    pub seed_path: Option<String>,
    /// Offset from UTC used for analytics buckets
    pub utc_offset_minutes: Option<i32>,
}

impl StorageConfig {
    /// Bucket time zone; UTC when unset
    pub fn time_zone(&self) -> AppResult<FixedOffset> {
        let minutes = self.utc_offset_minutes.unwrap_or(0);

        FixedOffset::east_opt(minutes * 60)
            .ok_or_else(|| AppError::Config(format!("utc_offset_minutes {} is out of range", minutes)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        PaginationConfig {
            default_page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON or YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents).map_err(|e| AppError::Config(e.to_string())),
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&contents).map_err(|e| AppError::Config(e.to_string()))
            }
            _ => Err(AppError::Config(format!("Unsupported config file format: {}", path.display()))),
        }
    }

    /// Load from `path` when given and present, defaults otherwise
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> AppResult<Self> {
        match path {
            Some(p) if p.as_ref().exists() => Self::from_file(p),
            _ => Ok(Config::default()),
        }
    }

    /// Get the log level filter
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        }
    }
}
