//! Analysis feature

mod controller;

pub use controller::AnalysisController;
