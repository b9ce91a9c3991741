// SmtpView - app/clear_source.rs
//
// Clear signal source: the "Clear all" trigger. Broadcasts `ClearAll`;
// each pane decides on its own how to reset.

use std::sync::Arc;

use crate::app::publisher::{DeliveryReport, EventPublisher};
use crate::core::event::Event;

/// Publishes `ClearAll` events.
#[derive(Debug, Clone)]
pub struct ClearSource {
    publisher: Arc<EventPublisher>,
}

impl ClearSource {
    pub fn new(publisher: Arc<EventPublisher>) -> Self {
        Self { publisher }
    }

    pub fn notify_clear_requested(&self) -> DeliveryReport {
        tracing::info!("Clear all requested");
        self.publisher.publish(Event::ClearAll)
    }
}
