//! Solar Configurator Client Library
//!
//! Headless client core of the solar and heat-pump offer configurator:
//! routing, the backend REST client, the client-side stores and the
//! controllers that connect them.

rust_i18n::i18n!("locales", fallback = "de");

pub mod app;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod eventing;
pub mod features;
pub mod helpers;
pub mod i18n;
pub mod logging;
pub mod services;
pub mod state;
pub mod utils;

pub use error::{Error, Result};
