// SmtpView - app/state.rs
//
// Application state: wires the publisher, the two display panes, the
// logging bridge and the event sources together, and holds the UI-side
// ends of the render queues. Owned by the eframe::App implementation.

use std::sync::Arc;

use crate::app::clear_source::ClearSource;
use crate::app::display::{LogsBuffer, MailBuffer};
use crate::app::log_bridge::LogBridge;
use crate::app::mail_source::MailSource;
use crate::app::publisher::EventPublisher;
use crate::app::render::{render_channel, RenderQueue};
use crate::util::error::SmtpViewError;
use crate::util::logging::SinkRegistry;

/// The pane a search or view action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Logs,
    LastMail,
}

impl Pane {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Logs => "SMTP logs",
            Self::LastMail => "Last message",
        }
    }
}

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Broadcast point shared by every producer.
    pub publisher: Arc<EventPublisher>,

    /// Logs pane subscriber.
    pub logs: Arc<LogsBuffer>,

    /// Last-mail pane subscriber.
    pub last_mail: Arc<MailBuffer>,

    /// Bridge from the capture sink to the publisher.
    pub bridge: Arc<LogBridge>,

    /// Entry point for the mail persistence collaborator.
    pub mail_source: MailSource,

    /// Entry point for the "Clear all" trigger.
    pub clear_source: ClearSource,

    /// UI-side end of the logs pane render queue.
    pub logs_queue: RenderQueue,

    /// UI-side end of the last-mail pane render queue.
    pub mail_queue: RenderQueue,

    /// Currently visible pane.
    pub active_pane: Pane,

    /// Text in the search box.
    pub search_term: String,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal start-up problems, shown in the status bar.
    pub warnings: Vec<String>,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    /// Build the pipeline and bind the logs pane to `sink_name` in `sinks`.
    ///
    /// Subscribers are registered logs first, then last mail; that is the
    /// order in which every event reaches them.
    pub fn new(sinks: &SinkRegistry, sink_name: &str, debug_mode: bool) -> Self {
        let publisher = Arc::new(EventPublisher::new());

        let (logs_tx, logs_queue) = render_channel("logs");
        let (mail_tx, mail_queue) = render_channel("last-mail");

        let logs = Arc::new(LogsBuffer::with_renderer(logs_tx));
        let last_mail = Arc::new(MailBuffer::with_renderer(mail_tx));
        publisher.subscribe(logs.clone());
        publisher.subscribe(last_mail.clone());

        let bridge = LogBridge::resolve(sinks, sink_name, Arc::clone(&publisher));

        let mut warnings = Vec::new();
        if let Err(e) = bridge.binding() {
            warnings.push(SmtpViewError::from(e).to_string());
        }

        Self {
            mail_source: MailSource::new(Arc::clone(&publisher)),
            clear_source: ClearSource::new(Arc::clone(&publisher)),
            publisher,
            logs,
            last_mail,
            bridge,
            logs_queue,
            mail_queue,
            active_pane: Pane::default(),
            search_term: String::new(),
            status_message: "Ready. Waiting for SMTP activity.".to_string(),
            warnings,
            debug_mode,
        }
    }

    /// Search the active pane for the current search term.
    ///
    /// Returns whether a match was found and updates the status message.
    pub fn find_next(&mut self) -> bool {
        if self.search_term.is_empty() {
            return false;
        }
        let found = match self.active_pane {
            Pane::Logs => self.logs.find(&self.search_term),
            Pane::LastMail => self.last_mail.find(&self.search_term),
        };
        self.status_message = if found {
            format!("Found \"{}\" in {}.", self.search_term, self.active_pane.label())
        } else {
            format!("\"{}\" not found in {}.", self.search_term, self.active_pane.label())
        };
        found
    }

    /// Clear every pane.
    pub fn clear_all(&mut self) {
        self.clear_source.notify_clear_requested();
        self.status_message = "Cleared.".to_string();
    }
}
