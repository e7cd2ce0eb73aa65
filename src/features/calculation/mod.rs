//! Calculation feature

mod controller;

pub use controller::CalculationController;
