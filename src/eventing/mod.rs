//! Eventing - push notifications from stores to the presentation layer

pub mod app_event;

pub use app_event::{AppEvent, EventSink};
