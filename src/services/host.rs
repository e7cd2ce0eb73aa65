//! Host Capability
//!
//! Backend process control owned by the host runtime: a health probe and a
//! fire-and-forget start trigger. The status store only sees the
//! [`BackendHost`] trait; [`ProcessHost`] is the local implementation.

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;

use parking_lot::Mutex;
use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::services::api::ApiClient;

/// Operations the host provides for managing the backend process
pub trait BackendHost: Send + Sync {
    /// Whether the backend process answers as healthy
    fn check_backend_health(&self) -> impl Future<Output = Result<bool>> + Send;

    /// Trigger backend startup without waiting for it to become ready
    fn start_backend(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Spawns the backend as a local child process and probes it over HTTP
///
/// The child outlives this handle; dropping the host does not stop it.
pub struct ProcessHost {
    api: ApiClient,
    command: Option<String>,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    child: Mutex<Option<Child>>,
}

impl ProcessHost {
    pub fn new(api: ApiClient, config: &BackendConfig) -> Self {
        Self {
            api,
            command: config.command.clone(),
            args: config.args.clone(),
            working_dir: config.working_dir.clone(),
            child: Mutex::new(None),
        }
    }

    /// Whether a child process was spawned and is still running
    pub fn is_running(&self) -> bool {
        let mut guard = self.child.lock();
        match guard.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    fn spawn(&self) -> Result<()> {
        let Some(program) = self.command.as_deref() else {
            return Err(Error::Host {
                message: "no backend command configured".to_string(),
            });
        };

        if self.is_running() {
            info!(program, "Backend process already running");
            return Ok(());
        }

        let mut command = Command::new(program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|e| Error::Host {
            message: format!("failed to spawn {program}: {e}"),
        })?;
        info!(program, pid = ?child.id(), "Backend process spawned");
        *self.child.lock() = Some(child);
        Ok(())
    }
}

impl BackendHost for ProcessHost {
    async fn check_backend_health(&self) -> Result<bool> {
        let health = self.api.health_check().await?;
        if !health.is_healthy() {
            warn!(status = %health.status, "Backend reported unhealthy status");
        }
        Ok(health.is_healthy())
    }

    async fn start_backend(&self) -> Result<()> {
        self.spawn()
    }
}
