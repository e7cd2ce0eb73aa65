//! Project feature

mod controller;

pub use controller::ProjectController;
