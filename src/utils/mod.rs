//! Utilities

pub mod format;
pub mod snapshot_store;
