//! StatusState - Backend Reachability, Loading Indicator and Snackbar
//!
//! Shared across tasks, so every method takes `&self`. The probe guard is an
//! atomic flag; the remaining fields sit behind short-lived locks that are
//! never held across an await point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::constants::{BACKEND_STARTUP_DELAY_MS, SNACKBAR_DEFAULT_COLOR, SNACKBAR_TIMEOUT_MS};
use crate::eventing::{AppEvent, EventSink};
use crate::i18n::tr;
use crate::services::host::BackendHost;

/// The single transient notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snackbar {
    pub show: bool,
    pub message: String,
    pub color: String,
    pub timeout_ms: u64,
}

impl Default for Snackbar {
    fn default() -> Self {
        Self {
            show: false,
            message: String::new(),
            color: SNACKBAR_DEFAULT_COLOR.to_string(),
            timeout_ms: SNACKBAR_TIMEOUT_MS,
        }
    }
}

/// Snapshot of the backend probe flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendStatus {
    pub connected: bool,
    pub checking: bool,
}

#[derive(Debug, Clone, Default)]
struct Loading {
    active: bool,
    message: String,
}

/// Application status store
#[derive(Debug)]
pub struct StatusState {
    connected: AtomicBool,
    checking: AtomicBool,
    loading: Mutex<Loading>,
    snackbar: Mutex<Snackbar>,
    startup_delay: Duration,
    snackbar_timeout_ms: u64,
    events: EventSink,
}

impl Default for StatusState {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(BACKEND_STARTUP_DELAY_MS),
            SNACKBAR_TIMEOUT_MS,
        )
    }
}

/// Clears the probe flag on every exit path, including cancellation
struct CheckingGuard<'a>(&'a AtomicBool);

impl Drop for CheckingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl StatusState {
    pub fn new(startup_delay: Duration, snackbar_timeout_ms: u64) -> Self {
        Self {
            connected: AtomicBool::new(false),
            checking: AtomicBool::new(false),
            loading: Mutex::new(Loading::default()),
            snackbar: Mutex::new(Snackbar {
                timeout_ms: snackbar_timeout_ms,
                ..Snackbar::default()
            }),
            startup_delay,
            snackbar_timeout_ms,
            events: EventSink::disabled(),
        }
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    pub fn backend_status(&self) -> BackendStatus {
        BackendStatus {
            connected: self.connected.load(Ordering::Acquire),
            checking: self.checking.load(Ordering::Acquire),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.lock().active
    }

    pub fn loading_message(&self) -> String {
        self.loading.lock().message.clone()
    }

    pub fn snackbar(&self) -> Snackbar {
        self.snackbar.lock().clone()
    }

    /// Toggle the global loading indicator
    pub fn set_loading(&self, loading: bool, message: impl Into<String>) {
        let message = message.into();
        {
            let mut guard = self.loading.lock();
            guard.active = loading;
            guard.message = message.clone();
        }
        self.events.emit(AppEvent::LoadingChanged { loading, message });
    }

    /// Replace the current notification, using the configured timeout
    pub fn show_snackbar(&self, message: impl Into<String>, color: impl Into<String>) {
        self.show_snackbar_for(message, color, self.snackbar_timeout_ms);
    }

    /// Replace the current notification. The previous one is discarded.
    pub fn show_snackbar_for(
        &self,
        message: impl Into<String>,
        color: impl Into<String>,
        timeout_ms: u64,
    ) {
        let snackbar = Snackbar {
            show: true,
            message: message.into(),
            color: color.into(),
            timeout_ms,
        };
        let event = AppEvent::SnackbarShown {
            message: snackbar.message.clone(),
            color: snackbar.color.clone(),
        };
        *self.snackbar.lock() = snackbar;
        self.events.emit(event);
    }

    /// Dismiss the notification, keeping its content
    pub fn hide_snackbar(&self) {
        self.snackbar.lock().show = false;
    }

    /// Probe backend health through the host
    ///
    /// A call made while another probe is in flight returns immediately
    /// without probing. Any probe failure counts as not connected.
    pub async fn check_backend_status<H: BackendHost>(&self, host: &H) {
        if self
            .checking
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Backend probe already in flight");
            return;
        }
        let _guard = CheckingGuard(&self.checking);

        let connected = match host.check_backend_health().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!(error = %e, "Backend health check failed");
                false
            }
        };

        self.connected.store(connected, Ordering::Release);
        info!(connected, "Backend status updated");
        self.events.emit(AppEvent::BackendStatusChanged { connected });
    }

    /// Ask the host to start the backend, wait for it to settle, re-probe
    pub async fn start_backend<H: BackendHost>(&self, host: &H) {
        self.set_loading(true, tr("status.backend_starting"));

        match host.start_backend().await {
            Ok(()) => {
                tokio::time::sleep(self.startup_delay).await;
                self.check_backend_status(host).await;
            }
            Err(e) => {
                error!(error = %e, "Failed to start backend");
                self.show_snackbar(tr("status.backend_start_failed"), "error");
            }
        }

        self.set_loading(false, "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct FakeHost {
        healthy: bool,
        fail_probe: bool,
        fail_start: bool,
        probe_delay: Duration,
        probes: AtomicUsize,
        starts: AtomicUsize,
    }

    impl BackendHost for FakeHost {
        async fn check_backend_health(&self) -> Result<bool> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            if !self.probe_delay.is_zero() {
                tokio::time::sleep(self.probe_delay).await;
            }
            if self.fail_probe {
                return Err(Error::BackendUnreachable);
            }
            Ok(self.healthy)
        }

        async fn start_backend(&self) -> Result<()> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            if self.fail_start {
                return Err(Error::Host {
                    message: "spawn failed".to_string(),
                });
            }
            Ok(())
        }
    }

    fn state() -> StatusState {
        StatusState::new(Duration::ZERO, SNACKBAR_TIMEOUT_MS)
    }

    #[tokio::test]
    async fn probe_sets_connected() {
        let state = state();
        let host = FakeHost {
            healthy: true,
            ..FakeHost::default()
        };
        state.check_backend_status(&host).await;
        assert_eq!(
            state.backend_status(),
            BackendStatus {
                connected: true,
                checking: false
            }
        );
    }

    #[tokio::test]
    async fn probe_failure_means_disconnected() {
        let state = state();
        state.connected.store(true, Ordering::Release);
        let host = FakeHost {
            fail_probe: true,
            ..FakeHost::default()
        };
        state.check_backend_status(&host).await;
        assert!(!state.is_connected());
        assert!(!state.backend_status().checking);
    }

    #[tokio::test]
    async fn concurrent_probe_is_suppressed() {
        let state = state();
        let host = FakeHost {
            healthy: true,
            probe_delay: Duration::from_millis(50),
            ..FakeHost::default()
        };

        tokio::join!(
            state.check_backend_status(&host),
            state.check_backend_status(&host)
        );

        assert_eq!(host.probes.load(Ordering::SeqCst), 1);
        assert!(state.is_connected());

        // guard released, a later probe runs again
        state.check_backend_status(&host).await;
        assert_eq!(host.probes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn snackbar_last_write_wins() {
        let state = state();
        state.show_snackbar("erste", "info");
        state.show_snackbar_for("zweite", "error", 1000);

        let snackbar = state.snackbar();
        assert!(snackbar.show);
        assert_eq!(snackbar.message, "zweite");
        assert_eq!(snackbar.color, "error");
        assert_eq!(snackbar.timeout_ms, 1000);

        state.hide_snackbar();
        assert!(!state.snackbar().show);
    }

    #[tokio::test]
    async fn start_backend_reprobes_and_clears_loading() {
        let state = state();
        let host = FakeHost {
            healthy: true,
            ..FakeHost::default()
        };
        state.start_backend(&host).await;

        assert_eq!(host.starts.load(Ordering::SeqCst), 1);
        assert_eq!(host.probes.load(Ordering::SeqCst), 1);
        assert!(state.is_connected());
        assert!(!state.is_loading());
        assert!(!state.snackbar().show);
    }

    #[tokio::test]
    async fn start_backend_failure_shows_error() {
        let (events, rx) = EventSink::channel();
        let state = state().with_events(events);
        let host = FakeHost {
            fail_start: true,
            ..FakeHost::default()
        };
        state.start_backend(&host).await;

        let snackbar = state.snackbar();
        assert!(snackbar.show);
        assert_eq!(snackbar.message, tr("status.backend_start_failed"));
        assert_eq!(snackbar.color, "error");
        assert!(!state.is_loading());
        assert_eq!(host.probes.load(Ordering::SeqCst), 0);

        let received: Vec<AppEvent> = rx.try_iter().collect();
        assert!(matches!(
            received.first(),
            Some(AppEvent::LoadingChanged { loading: true, .. })
        ));
        assert!(matches!(
            received.last(),
            Some(AppEvent::LoadingChanged { loading: false, .. })
        ));
    }
}
