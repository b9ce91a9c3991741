// SmtpView - util/logging.rs
//
// Structured logging with runtime-selectable debug mode, plus the named
// capture sinks that the logs pane binds to.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - CLI flag: --debug (sets RUST_LOG=debug)
//   - Config file: [logging] level = "debug"
//
// Output: stderr. Capture sinks are independent of the stderr filter: a sink
// configured for `debug` still receives debug records while stderr shows
// only `info` and above.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::field::{Field, Visit};
use tracing::Level;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Initialise the logging subsystem.
///
/// `debug_flag` is true when the user passed --debug on the CLI.
/// `config_level` is the level from config.toml (if present).
/// `sinks` are installed alongside the stderr formatter so that records of
/// their components are captured for display.
///
/// Priority: RUST_LOG env var > CLI --debug flag > config level > default "info".
pub fn init(debug_flag: bool, config_level: Option<&str>, sinks: &SinkRegistry) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = config_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(super::constants::DEFAULT_LOG_LEVEL)
    };

    let stderr = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(stderr)
        .with(sinks.layer())
        .init();

    tracing::debug!(
        app = super::constants::APP_NAME,
        version = super::constants::APP_VERSION,
        sinks = ?sinks.names(),
        "Logging initialised"
    );
}

/// Parse a level name as accepted in config (`error` .. `trace`).
pub fn parse_level(name: &str) -> Option<Level> {
    match name.to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

// =============================================================================
// Capture suppression
// =============================================================================

thread_local! {
    static CAPTURE_SUPPRESSED: Cell<bool> = const { Cell::new(false) };
}

/// Restores the previous suppression state on drop, including on unwind.
struct SuppressGuard {
    previous: bool,
}

impl Drop for SuppressGuard {
    fn drop(&mut self) {
        CAPTURE_SUPPRESSED.with(|flag| flag.set(self.previous));
    }
}

/// Run `f` with capture sinks deaf to records emitted on this thread.
///
/// Records still reach every other layer (stderr). Used around anything that
/// may publish events, so a record produced while an event is being delivered
/// can never be fed back into the publisher on the same thread.
pub fn without_capture<R>(f: impl FnOnce() -> R) -> R {
    let previous = CAPTURE_SUPPRESSED.with(|flag| flag.replace(true));
    let _guard = SuppressGuard { previous };
    f()
}

/// Whether capture is currently suppressed on this thread.
pub fn capture_suppressed() -> bool {
    CAPTURE_SUPPRESSED.with(Cell::get)
}

// =============================================================================
// Captured records
// =============================================================================

/// A log record captured by a sink, stripped down to what display needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    pub target: String,
    /// Rendered message, followed by any extra fields as ` key=value`.
    pub message: String,
}

/// Receives every record that passes through a capture sink.
///
/// Called synchronously on the thread that emitted the record.
pub trait RecordTarget: Send + Sync {
    fn on_record(&self, record: &LogRecord);
}

// =============================================================================
// Capture sink
// =============================================================================

/// A named sink inside the logging subsystem.
///
/// Accepts records whose target is `component` or nested below it and whose level is
/// at least as severe as `min_level`, and hands them to every attached
/// [`RecordTarget`] in attachment order.
pub struct CaptureSink {
    name: String,
    component: String,
    min_level: Level,
    targets: RwLock<Vec<Arc<dyn RecordTarget>>>,
}

impl CaptureSink {
    pub fn new(name: impl Into<String>, component: impl Into<String>, min_level: Level) -> Self {
        Self {
            name: name.into(),
            component: component.into(),
            min_level,
            targets: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    /// Attach a delivery target. Targets are never detached.
    pub fn attach(&self, target: Arc<dyn RecordTarget>) {
        match self.targets.write() {
            Ok(mut targets) => targets.push(target),
            Err(poisoned) => poisoned.into_inner().push(target),
        }
    }

    /// Number of attached targets.
    pub fn target_count(&self) -> usize {
        match self.targets.read() {
            Ok(targets) => targets.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether a record with this target and level belongs to the sink.
    ///
    /// The target must be the component itself or one of its `::` children.
    pub fn accepts(&self, target: &str, level: &Level) -> bool {
        // tracing orders levels by verbosity: ERROR < WARN < ... < TRACE.
        *level <= self.min_level && is_within(target, &self.component)
    }

    /// Hand a record to every attached target.
    ///
    /// The target list is snapshotted first so a target may attach further
    /// targets without deadlocking.
    pub fn deliver(&self, record: &LogRecord) {
        let targets: Vec<Arc<dyn RecordTarget>> = match self.targets.read() {
            Ok(targets) => targets.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        for target in targets {
            target.on_record(record);
        }
    }
}

fn is_within(target: &str, component: &str) -> bool {
    match target.strip_prefix(component) {
        Some(rest) => rest.is_empty() || rest.starts_with("::"),
        None => false,
    }
}

impl fmt::Debug for CaptureSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureSink")
            .field("name", &self.name)
            .field("component", &self.component)
            .field("min_level", &self.min_level)
            .field("targets", &self.target_count())
            .finish()
    }
}

// =============================================================================
// Sink registry
// =============================================================================

/// All capture sinks known to the logging subsystem, keyed by name.
///
/// Built once at start-up before [`init`]; lookups hand out shared handles so
/// consumers receive their sink by injection instead of global lookup.
#[derive(Debug, Default, Clone)]
pub struct SinkRegistry {
    sinks: HashMap<String, Arc<CaptureSink>>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink, replacing any previous sink of the same name.
    pub fn register(&mut self, sink: CaptureSink) -> Arc<CaptureSink> {
        let sink = Arc::new(sink);
        if self
            .sinks
            .insert(sink.name().to_string(), Arc::clone(&sink))
            .is_some()
        {
            tracing::warn!(sink = sink.name(), "Capture sink registered twice; keeping the latest");
        }
        sink
    }

    /// Resolve a sink by name.
    pub fn get(&self, name: &str) -> Option<Arc<CaptureSink>> {
        self.sinks.get(name).cloned()
    }

    /// Sorted sink names, for diagnostics.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sinks.keys().cloned().collect();
        names.sort();
        names
    }

    /// A `tracing` layer feeding every registered sink.
    pub fn layer(&self) -> CaptureLayer {
        let mut sinks: Vec<Arc<CaptureSink>> = self.sinks.values().cloned().collect();
        sinks.sort_by(|a, b| a.name().cmp(b.name()));
        CaptureLayer { sinks }
    }
}

// =============================================================================
// tracing integration
// =============================================================================

/// `tracing_subscriber` layer that routes events into capture sinks.
pub struct CaptureLayer {
    sinks: Vec<Arc<CaptureSink>>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if capture_suppressed() {
            return;
        }
        let meta = event.metadata();
        let mut record: Option<LogRecord> = None;

        for sink in &self.sinks {
            if !sink.accepts(meta.target(), meta.level()) {
                continue;
            }
            let record = record.get_or_insert_with(|| {
                let mut visitor = MessageVisitor::default();
                event.record(&mut visitor);
                LogRecord {
                    level: *meta.level(),
                    target: meta.target().to_string(),
                    message: visitor.finish(),
                }
            });
            without_capture(|| sink.deliver(record));
        }
    }
}

/// Collects the `message` field and appends the remaining fields.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push_str(&format!(" {}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push_str(&format!(" {}={:?}", field.name(), value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<LogRecord>>);

    impl RecordTarget for Collect {
        fn on_record(&self, record: &LogRecord) {
            self.0.lock().unwrap().push(record.clone());
        }
    }

    fn registry_with(component: &str, min_level: Level) -> (SinkRegistry, Arc<Collect>) {
        let mut registry = SinkRegistry::new();
        let sink = registry.register(CaptureSink::new("smtp-session", component, min_level));
        let collect = Arc::new(Collect::default());
        sink.attach(collect.clone());
        (registry, collect)
    }

    #[test]
    fn test_parse_level_accepts_known_names() {
        assert_eq!(parse_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_level("warn"), Some(Level::WARN));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn test_accepts_filters_by_component_and_level() {
        let sink = CaptureSink::new("s", "smtp::session", Level::INFO);
        assert!(sink.accepts("smtp::session", &Level::INFO));
        assert!(sink.accepts("smtp::session::data", &Level::ERROR));
        assert!(!sink.accepts("smtp::session", &Level::DEBUG));
        assert!(!sink.accepts("http::server", &Level::ERROR));
    }

    #[test]
    fn test_accepts_ignores_sibling_targets() {
        let sink = CaptureSink::new("s", "smtpview::smtp", Level::TRACE);
        assert!(sink.accepts("smtpview::smtp", &Level::INFO));
        assert!(sink.accepts("smtpview::smtp::session", &Level::INFO));
        assert!(!sink.accepts("smtpview::smtpx", &Level::INFO));
        assert!(!sink.accepts("smtpview::smtp_relay::session", &Level::INFO));
        assert!(!sink.accepts("smtpview", &Level::INFO));
    }

    #[test]
    fn test_suppressed_records_are_not_captured() {
        let (registry, collect) = registry_with("smtp", Level::TRACE);
        let subscriber = tracing_subscriber::registry().with(registry.layer());

        tracing::subscriber::with_default(subscriber, || {
            without_capture(|| {
                tracing::info!(target: "smtp", "during delivery");
                without_capture(|| tracing::info!(target: "smtp", "nested"));
                assert!(capture_suppressed());
            });
            assert!(!capture_suppressed());
            tracing::info!(target: "smtp", "after delivery");
        });

        let records = collect.0.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "after delivery");
    }

    #[test]
    fn test_suppression_is_restored_after_panic() {
        let result = std::panic::catch_unwind(|| without_capture(|| panic!("boom")));
        assert!(result.is_err());
        assert!(!capture_suppressed());
    }

    #[test]
    fn test_layer_captures_matching_events_only() {
        let (registry, collect) = registry_with("smtp::session", Level::DEBUG);
        let subscriber = tracing_subscriber::registry().with(registry.layer());

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(target: "smtp::session", "Connection received from {}", "127.0.0.1");
            tracing::trace!(target: "smtp::session", "too verbose");
            tracing::info!(target: "other", "unrelated");
        });

        let records = collect.0.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "Connection received from 127.0.0.1");
        assert_eq!(records[0].level, Level::DEBUG);
        assert_eq!(records[0].target, "smtp::session");
    }

    #[test]
    fn test_extra_fields_are_appended_to_message() {
        let (registry, collect) = registry_with("smtp", Level::TRACE);
        let subscriber = tracing_subscriber::registry().with(registry.layer());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "smtp", peer = "10.0.0.1", size = 42, "Message stored");
        });

        let records = collect.0.lock().unwrap();
        assert_eq!(records[0].message, "Message stored peer=10.0.0.1 size=42");
    }

    #[test]
    fn test_registry_lookup_by_name() {
        let (registry, _) = registry_with("smtp", Level::DEBUG);
        assert!(registry.get("smtp-session").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.names(), vec!["smtp-session".to_string()]);
    }
}
