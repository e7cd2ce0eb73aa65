//! Client Constants
//!
//! Centralized defaults shared by the API client, stores and router.

/// Application name appended to every document title
pub const APP_NAME: &str = "Solar Configurator";

/// Default backend API base URL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Default health endpoint (bare host root, not under `/api`)
pub const DEFAULT_HEALTH_URL: &str = "http://localhost:8000/health";

/// Request timeout for all backend calls
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settle delay between starting the backend and re-probing it
pub const BACKEND_STARTUP_DELAY_MS: u64 = 3000;

/// Default snackbar auto-dismiss timeout
pub const SNACKBAR_TIMEOUT_MS: u64 = 4000;

/// Default snackbar color
pub const SNACKBAR_DEFAULT_COLOR: &str = "info";

/// Default page size for list endpoints
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// PDF task polling
pub const PDF_POLL_INTERVAL_MS: u64 = 1000;
pub const PDF_POLL_MAX_ATTEMPTS: u32 = 120;

/// Pending application events kept for a slow listener
pub const EVENT_QUEUE_CAPACITY: usize = 256;

/// Navigation entries kept by the router
pub const ROUTER_HISTORY_LIMIT: usize = 100;

/// Prefix of local project snapshot keys
pub const SNAPSHOT_KEY_PREFIX: &str = "project_snapshot_";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "SOLAR_CONFIGURATOR_API_URL";

/// Config file name inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "solar-configurator.toml";
