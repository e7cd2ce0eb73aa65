//! Client Configuration
//!
//! Settings for the backend connection, host process control, UI defaults
//! and logging. Persisted as TOML in the platform config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::constants::{
    API_URL_ENV, BACKEND_STARTUP_DELAY_MS, CONFIG_FILE_NAME, DEFAULT_API_BASE_URL,
    DEFAULT_HEALTH_URL, REQUEST_TIMEOUT_SECS, SNACKBAR_TIMEOUT_MS,
};
use crate::error::Result;
use crate::helpers::get_or_create_config_dir;
use crate::i18n::Locale;

/// Main client configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend API connection
    pub api: ApiConfig,
    /// Local backend process control
    pub backend: BackendConfig,
    /// UI defaults
    pub ui: UiConfig,
    /// Logging output
    pub logging: LoggingConfig,
}

/// Backend API connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL all `/api` paths are joined to
    pub base_url: String,
    /// Health endpoint at the bare host root
    pub health_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            health_url: DEFAULT_HEALTH_URL.to_string(),
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Local backend process control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Program used to start the backend (e.g. `uvicorn`)
    pub command: Option<String>,
    /// Arguments passed to the program
    pub args: Vec<String>,
    /// Working directory for the backend process
    pub working_dir: Option<PathBuf>,
    /// Settle delay before re-probing after a start
    pub startup_delay_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            working_dir: None,
            startup_delay_ms: BACKEND_STARTUP_DELAY_MS,
        }
    }
}

/// UI defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Language tag; empty means detect from the system
    pub locale: Option<String>,
    /// Default snackbar auto-dismiss timeout
    pub snackbar_timeout_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            locale: None,
            snackbar_timeout_ms: SNACKBAR_TIMEOUT_MS,
        }
    }
}

/// Logging output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Directory for daily-rolling log files; stderr only when unset
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the platform config directory
    ///
    /// A missing or empty file yields defaults. The API base URL may be
    /// overridden through `SOLAR_CONFIGURATOR_API_URL`.
    pub fn try_load() -> Result<Self> {
        let path = config_path()?;
        let mut config = Self::load_from(&path)?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                info!(url = %url, "API base URL overridden from environment");
                config.api.base_url = url;
            }
        }
        Ok(config)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        info!(path = ?path, "Loading config file");
        let value = std::fs::read_to_string(path)?;
        if value.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = toml::from_str(&value).map_err(|e| {
            error!(error = %e, path = ?path, "Failed to parse config file");
            e
        })?;
        Ok(config)
    }

    /// Save configuration to an explicit file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let value = toml::to_string_pretty(self)?;
        std::fs::write(path, value)?;
        Ok(())
    }

    /// Resolve the UI locale: configured tag, then system locale, then German
    pub fn locale(&self) -> Locale {
        self.ui
            .locale
            .as_deref()
            .filter(|tag| !tag.is_empty())
            .and_then(Locale::from_tag)
            .unwrap_or_else(Locale::detect)
    }
}

/// Path of the config file inside the platform config directory
pub fn config_path() -> Result<PathBuf> {
    Ok(get_or_create_config_dir()?.join(CONFIG_FILE_NAME))
}
