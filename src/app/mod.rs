//! Application Layer
//!
//! Startup wiring, the shared application context and routing.

pub mod application;
pub mod entities;
pub mod navigation;
