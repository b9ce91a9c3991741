// SmtpView - app/log_bridge.rs
//
// Logging bridge: turns records captured by a named sink of the logging
// subsystem into `LogLine` events.
//
// The sink is injected at construction (resolved by the caller through
// `SinkRegistry::get`). A missing sink is logged once at error level and
// leaves the bridge permanently inert; it never fails start-up.
//
// The timestamp of each line is taken when the record reaches the bridge,
// not when it was emitted. The two are practically simultaneous since
// capture is synchronous.

use std::sync::Arc;

use chrono::Local;

use crate::app::publisher::EventPublisher;
use crate::core::event::Event;
use crate::util::error::BridgeError;
use crate::util::logging::{CaptureSink, LogRecord, RecordTarget, SinkRegistry};

/// Forwards captured log records to the publisher.
pub struct LogBridge {
    sink_name: String,
    binding: Result<(), BridgeError>,
    publisher: Arc<EventPublisher>,
}

impl LogBridge {
    /// Bind to `sink` (resolved from `sink_name`) and start forwarding.
    ///
    /// With `None` the bridge logs the missing binding and stays inert.
    pub fn attach(
        sink: Option<Arc<CaptureSink>>,
        sink_name: &str,
        publisher: Arc<EventPublisher>,
    ) -> Arc<Self> {
        let binding = match &sink {
            Some(_) => Ok(()),
            None => Err(BridgeError::BindingNotFound {
                sink: sink_name.to_string(),
            }),
        };

        let bridge = Arc::new(Self {
            sink_name: sink_name.to_string(),
            binding,
            publisher,
        });

        match sink {
            Some(sink) => {
                sink.attach(Arc::clone(&bridge) as Arc<dyn RecordTarget>);
                tracing::info!(
                    sink = sink_name,
                    component = sink.component(),
                    "Logs pane bound to capture sink"
                );
            }
            None => {
                tracing::error!(sink = sink_name, "Can't find log sink; logs pane will stay empty");
            }
        }

        bridge
    }

    /// Resolve `sink_name` in `registry` and attach.
    pub fn resolve(
        registry: &SinkRegistry,
        sink_name: &str,
        publisher: Arc<EventPublisher>,
    ) -> Arc<Self> {
        Self::attach(registry.get(sink_name), sink_name, publisher)
    }

    pub fn sink_name(&self) -> &str {
        &self.sink_name
    }

    /// Whether a sink was found at construction.
    pub fn is_bound(&self) -> bool {
        self.binding.is_ok()
    }

    /// The binding outcome, for status reporting.
    pub fn binding(&self) -> Result<(), BridgeError> {
        self.binding.clone()
    }

    /// Publish `record` as a log line stamped now. Dropped silently when unbound.
    pub fn forward(&self, record: &LogRecord) {
        if !self.is_bound() {
            return;
        }
        self.publisher.publish(Event::LogLine {
            message: record.message.clone(),
            timestamp: Local::now(),
        });
    }
}

impl RecordTarget for LogBridge {
    fn on_record(&self, record: &LogRecord) {
        self.forward(record);
    }
}

impl std::fmt::Debug for LogBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogBridge")
            .field("sink_name", &self.sink_name)
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::display::LogsBuffer;
    use tracing::Level;

    fn record(message: &str) -> LogRecord {
        LogRecord {
            level: Level::INFO,
            target: "smtp::session".to_string(),
            message: message.to_string(),
        }
    }

    fn publisher_with_logs() -> (Arc<EventPublisher>, Arc<LogsBuffer>) {
        let publisher = Arc::new(EventPublisher::new());
        let logs = Arc::new(LogsBuffer::new());
        publisher.subscribe(logs.clone());
        (publisher, logs)
    }

    #[test]
    fn test_missing_sink_leaves_bridge_inert() {
        let (publisher, logs) = publisher_with_logs();
        let bridge = LogBridge::resolve(&SinkRegistry::new(), "smtp-session", publisher);

        assert!(!bridge.is_bound());
        assert_eq!(
            bridge.binding(),
            Err(BridgeError::BindingNotFound {
                sink: "smtp-session".to_string()
            })
        );

        bridge.forward(&record("Connection received"));
        assert_eq!(logs.content(), "");
    }

    #[test]
    fn test_bound_bridge_publishes_formatted_lines() {
        let (publisher, logs) = publisher_with_logs();
        let mut registry = SinkRegistry::new();
        let sink = registry.register(CaptureSink::new("smtp-session", "smtp", Level::DEBUG));
        let bridge = LogBridge::resolve(&registry, "smtp-session", publisher);

        assert!(bridge.is_bound());
        assert_eq!(sink.target_count(), 1);

        sink.deliver(&record("Message stored"));
        let content = logs.content();
        assert!(content.ends_with(" - Message stored\n"), "got {content:?}");
        // "hh:mm:ss AM - "
        assert_eq!(content.find(" - "), Some(11));
    }
}
