//! PDF feature

mod controller;

pub use controller::PdfController;
