//! Application configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`ATELIER_CONFIG`, or `./atelier.toml` when present), then `ATELIER_*`
//! environment variables. A `.env` file in the working directory is loaded
//! into the environment first.

use crate::error::{AppError, AppResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Selectable table page sizes
pub const PAGE_SIZES: [usize; 5] = [10, 20, 30, 40, 50];

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "atelier.toml";

/// Upper bound for the autocomplete debounce delay
pub const MAX_DEBOUNCE_MS: u64 = 2000;

/// Runtime settings shared by the desktop app and the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the REST API, e.g. `http://127.0.0.1:8000/api`
    pub api_base_url: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Initial table page size
    pub page_size: usize,
    /// Autocomplete filtering debounce
    pub debounce_ms: u64,
    /// Age after which cached queries are re-fetched; `None` keeps them
    /// until invalidated
    pub stale_after_secs: Option<u64>,
    /// Fallback `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
            request_timeout_secs: 30,
            page_size: PAGE_SIZES[0],
            debounce_ms: 200,
            stale_after_secs: None,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load the full configuration stack from the process environment
    pub fn load() -> AppResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }

        let mut config = match Self::config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;

        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Resolve which TOML file to read, if any
    fn config_path() -> Option<PathBuf> {
        if let Ok(explicit) = std::env::var("ATELIER_CONFIG") {
            return Some(PathBuf::from(explicit));
        }
        let local = PathBuf::from(CONFIG_FILE_NAME);
        local.exists().then_some(local)
    }

    /// Read settings from a TOML file; unspecified keys keep their defaults
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).with_context(format!("Parsing {}", path.display()))
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> AppResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override settings from `ATELIER_*` variables using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ATELIER_API_URL") {
            self.api_base_url = url;
        }
        if let Some(v) = lookup("ATELIER_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("ATELIER_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("ATELIER_PAGE_SIZE") {
            self.page_size = parse_env("ATELIER_PAGE_SIZE", &v)?;
        }
        if let Some(v) = lookup("ATELIER_DEBOUNCE_MS") {
            self.debounce_ms = parse_env("ATELIER_DEBOUNCE_MS", &v)?;
        }
        if let Some(v) = lookup("ATELIER_STALE_AFTER_SECS") {
            self.stale_after_secs = if v.trim().is_empty() {
                None
            } else {
                Some(parse_env("ATELIER_STALE_AFTER_SECS", &v)?)
            };
        }
        if let Some(filter) = lookup("ATELIER_LOG") {
            self.log_filter = filter;
        }
        Ok(())
    }

    /// Check every setting, reporting the first problem found
    pub fn validate(&self) -> AppResult<()> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(AppError::config("api_base_url cannot be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::config(format!(
                "api_base_url must start with http:// or https://, got '{}'",
                url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::config("request_timeout_secs must be greater than 0"));
        }
        if !PAGE_SIZES.contains(&self.page_size) {
            return Err(AppError::config(format!(
                "page_size must be one of {:?}, got {}",
                PAGE_SIZES, self.page_size
            )));
        }
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(AppError::config(format!(
                "debounce_ms must be at most {}, got {}",
                MAX_DEBOUNCE_MS, self.debounce_ms
            )));
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim().trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn stale_after(&self) -> Option<Duration> {
        self.stale_after_secs.map(Duration::from_secs)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> AppResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AppError::internal(format!("Failed to render configuration: {}", e)))
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> AppResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::config(format!("{} has an invalid value: '{}'", key, value)))
}
