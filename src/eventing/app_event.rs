//! AppEvent - Application Event Enum
//!
//! Events pushed from the stores and the router to whatever presentation
//! layer is listening. Delivery is best-effort: the queue is bounded,
//! sending never blocks, events that find it full are dropped and a dropped
//! receiver is ignored.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use tracing::trace;

use crate::app::navigation::Route;
use crate::constants::EVENT_QUEUE_CAPACITY;

/// Application events for store -> UI communication
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Router moved to a new route
    Navigated {
        route: Route,
        path: String,
        title: Option<String>,
    },

    /// Global loading indicator toggled
    LoadingChanged { loading: bool, message: String },

    /// A notification replaced the current one
    SnackbarShown { message: String, color: String },

    /// Backend probe finished
    BackendStatusChanged { connected: bool },

    /// Calculation store received new data
    ResultsUpdated,

    /// Project store content changed
    ProjectChanged { has_unsaved_changes: bool },
}

/// Optional sending half held by stores
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<Sender<AppEvent>>,
}

impl EventSink {
    /// A sink that drops every event
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn new(tx: Sender<AppEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Create a connected sink and its receiver
    pub fn channel() -> (Self, Receiver<AppEvent>) {
        Self::with_capacity(EVENT_QUEUE_CAPACITY)
    }

    /// Connected sink holding at most `capacity` undelivered events
    pub fn with_capacity(capacity: usize) -> (Self, Receiver<AppEvent>) {
        let (tx, rx) = bounded(capacity.max(1));
        (Self::new(tx), rx)
    }

    pub fn emit(&self, event: AppEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        match tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => trace!(?event, "Event queue full, dropping event"),
            // Receiver gone means nobody is listening anymore
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_delivers_in_order() {
        let (sink, rx) = EventSink::channel();
        sink.emit(AppEvent::ResultsUpdated);
        sink.emit(AppEvent::BackendStatusChanged { connected: true });

        assert_eq!(rx.try_recv().ok(), Some(AppEvent::ResultsUpdated));
        assert_eq!(
            rx.try_recv().ok(),
            Some(AppEvent::BackendStatusChanged { connected: true })
        );
    }

    #[test]
    fn full_queue_drops_newest_without_blocking() {
        let (sink, rx) = EventSink::with_capacity(2);
        sink.emit(AppEvent::ResultsUpdated);
        sink.emit(AppEvent::BackendStatusChanged { connected: true });
        for _ in 0..1000 {
            sink.emit(AppEvent::ProjectChanged {
                has_unsaved_changes: true,
            });
        }

        assert_eq!(rx.len(), 2);
        assert_eq!(rx.try_recv().ok(), Some(AppEvent::ResultsUpdated));
        sink.emit(AppEvent::ResultsUpdated);
        assert_eq!(rx.len(), 2);
    }

    #[test]
    fn default_channel_is_bounded() {
        let (sink, rx) = EventSink::channel();
        for _ in 0..EVENT_QUEUE_CAPACITY * 4 {
            sink.emit(AppEvent::ResultsUpdated);
        }
        assert_eq!(rx.len(), EVENT_QUEUE_CAPACITY);
        assert_eq!(rx.capacity(), Some(EVENT_QUEUE_CAPACITY));
    }

    #[test]
    fn emit_survives_dropped_receiver() {
        let (sink, rx) = EventSink::channel();
        drop(rx);
        sink.emit(AppEvent::ResultsUpdated);
        EventSink::disabled().emit(AppEvent::ResultsUpdated);
    }
}
