//! Features - View Controllers
//!
//! Each feature owns the controller that runs "API call, then store update"
//! for its page. Failures are shown as the current notification and handed
//! back to the caller.

pub mod analysis;
pub mod calculation;
pub mod pdf;
pub mod project;

pub use analysis::AnalysisController;
pub use calculation::CalculationController;
pub use pdf::PdfController;
pub use project::ProjectController;

use tracing::error;

use crate::app::entities::AppEntities;
use crate::error::Error;

/// Log a failed operation and show it to the user
pub(crate) fn surface_error(entities: &AppEntities, operation: &str, err: Error) -> Error {
    error!(operation, error = %err, "Operation failed");
    entities.notify_error(err.to_string());
    err
}
