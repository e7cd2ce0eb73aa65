//! Application - Startup Wiring
//!
//! Builds the application context from the configuration, connects the
//! event channel and runs the initial backend probe and navigation.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use tracing::{info, warn};

use crate::app::entities::AppEntities;
use crate::app::navigation::Resolution;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::eventing::{AppEvent, EventSink};
use crate::i18n::set_locale;
use crate::utils::snapshot_store::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};

/// Running client: shared context plus the receiving end of its events
pub struct Application {
    entities: AppEntities,
    events: Receiver<AppEvent>,
    auto_start_backend: bool,
}

impl Application {
    /// Build the application from a loaded configuration
    ///
    /// Snapshots go to the platform data directory; when it cannot be
    /// created the session keeps snapshots in memory only.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let snapshots: Arc<dyn SnapshotStore> = match FileSnapshotStore::open_default() {
            Ok(store) => {
                info!(dir = ?store.dir(), "Using file snapshot store");
                Arc::new(store)
            }
            Err(e) => {
                warn!(error = %e, "Snapshot directory unavailable, keeping snapshots in memory");
                Arc::new(MemorySnapshotStore::new())
            }
        };
        Self::with_snapshots(config, snapshots)
    }

    pub fn with_snapshots(config: &ClientConfig, snapshots: Arc<dyn SnapshotStore>) -> Result<Self> {
        let locale = config.locale();
        set_locale(locale);
        info!(locale = locale.code(), "Locale selected");

        let (sink, events) = EventSink::channel();
        let entities = AppEntities::init(config, snapshots, sink)?;

        Ok(Self {
            entities,
            events,
            auto_start_backend: config.backend.command.is_some(),
        })
    }

    pub fn entities(&self) -> &AppEntities {
        &self.entities
    }

    pub fn events(&self) -> &Receiver<AppEvent> {
        &self.events
    }

    /// Probe the backend, start it when configured and unreachable, then
    /// open the root path
    pub async fn start(&self) -> Resolution {
        let status = &self.entities.status;
        status.check_backend_status(self.entities.host.as_ref()).await;

        if !status.is_connected() && self.auto_start_backend {
            info!("Backend not reachable, starting it");
            status.start_backend(self.entities.host.as_ref()).await;
        }

        if status.is_connected() {
            info!(url = self.entities.api.base_url(), "Backend connected");
        } else {
            warn!(url = self.entities.api.base_url(), "Backend not connected");
        }

        self.entities.router.lock().navigate("/")
    }
}
