//! Error types for the Solar Configurator client
//!
//! Centralized error handling using snafu for ergonomic error definitions.
//! Backend failures are translated into user-facing variants here so that
//! callers above the API client never see raw transport detail for the
//! classified cases.

use snafu::Snafu;

use crate::i18n::{tr, tr_with};

/// Main error type for the application
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// IO error (file operations, process spawning, etc.)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },

    /// The backend refused the connection
    #[snafu(display("{}", tr("errors.backend_unreachable")))]
    BackendUnreachable,

    /// HTTP 422 from the backend
    #[snafu(display("{}", tr_with("errors.validation", &[("detail", detail.as_str())])))]
    Validation { detail: String },

    /// HTTP 5xx from the backend
    #[snafu(display("{}", tr_with("errors.server", &[("detail", detail.as_str())])))]
    Server { status: u16, detail: String },

    /// Any other non-success HTTP status, passed through unchanged
    #[snafu(display("HTTP status {status}: {body}"))]
    Status { status: u16, body: String },

    /// Transport error that is not a refused connection (timeouts, decoding, ...)
    #[snafu(display("HTTP error: {source}"))]
    Http { source: reqwest::Error },

    /// Host capability failure (backend process control)
    #[snafu(display("Host error: {message}"))]
    Host { message: String },

    /// Background task ended without a result
    #[snafu(display("Task {task_id}: {message}"))]
    Task { task_id: String, message: String },

    /// Local snapshot storage failure
    #[snafu(display("Storage error: {message}"))]
    Storage { message: String },
}

impl Error {
    /// Whether this error was produced by the backend-error translation
    pub fn is_translated(&self) -> bool {
        matches!(
            self,
            Error::BackendUnreachable | Error::Validation { .. } | Error::Server { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Error::Http { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
