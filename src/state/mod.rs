//! State - Client-Side Stores
//!
//! One store per concern. The status store is shared across tasks and
//! synchronizes internally; the calculation and project stores are plain
//! values that the application context wraps in locks.

pub mod calculation_state;
pub mod project_state;
pub mod status_state;

pub use calculation_state::CalculationState;
pub use project_state::{CustomerPatch, HpPatch, ProjectPatch, ProjectState, PvPatch};
pub use status_state::{BackendStatus, Snackbar, StatusState};
