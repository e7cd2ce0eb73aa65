//! Service Layer
//!
//! Outbound integrations of the configurator client.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                 Controllers                   │
//! └──────────────┬───────────────────┬────────────┘
//!                │                   │
//!                ▼                   ▼
//! ┌──────────────────────┐  ┌───────────────────┐
//! │      ApiClient       │  │    BackendHost    │
//! │ (REST, translation)  │  │ (probe / start)   │
//! └──────────────────────┘  └───────────────────┘
//! ```

pub mod api;
pub mod host;
pub mod http;

#[cfg(test)]
pub(crate) mod test_server;

pub use api::ApiClient;
pub use host::{BackendHost, ProcessHost};
