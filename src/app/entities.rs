//! AppEntities - Application Context
//!
//! One instance of every store plus the shared services, cloned into each
//! controller. Nothing here is a process-wide global.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::app::navigation::Router;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::eventing::EventSink;
use crate::services::{ApiClient, ProcessHost};
use crate::state::{CalculationState, ProjectState, StatusState};
use crate::utils::snapshot_store::SnapshotStore;

/// Collection of all shared handles
#[derive(Clone)]
pub struct AppEntities {
    /// Backend REST client
    pub api: ApiClient,
    /// Backend process control
    pub host: Arc<ProcessHost>,
    /// Reachability, loading indicator, snackbar
    pub status: Arc<StatusState>,
    /// Latest calculation results
    pub calculation: Arc<RwLock<CalculationState>>,
    /// Project being edited
    pub project: Arc<RwLock<ProjectState>>,
    /// Route resolution and views
    pub router: Arc<Mutex<Router>>,
    /// Page snapshot persistence
    pub snapshots: Arc<dyn SnapshotStore>,
}

impl AppEntities {
    /// Build every store and service from the configuration
    pub fn init(
        config: &ClientConfig,
        snapshots: Arc<dyn SnapshotStore>,
        events: EventSink,
    ) -> Result<Self> {
        let api = ApiClient::new(&config.api)?;
        let host = ProcessHost::new(api.clone(), &config.backend);
        let status = StatusState::new(
            Duration::from_millis(config.backend.startup_delay_ms),
            config.ui.snackbar_timeout_ms,
        )
        .with_events(events.clone());

        Ok(Self {
            api,
            host: Arc::new(host),
            status: Arc::new(status),
            calculation: Arc::new(RwLock::new(
                CalculationState::default().with_events(events.clone()),
            )),
            project: Arc::new(RwLock::new(
                ProjectState::default().with_events(events.clone()),
            )),
            router: Arc::new(Mutex::new(Router::new().with_events(events))),
            snapshots,
        })
    }

    /// Show an error as the current notification
    pub fn notify_error(&self, message: impl Into<String>) {
        self.status.show_snackbar(message, "error");
    }

    pub fn notify_success(&self, message: impl Into<String>) {
        self.status.show_snackbar(message, "success");
    }
}
