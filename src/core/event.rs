// SmtpView - core/event.rs
//
// Event vocabulary shared by every producer and subscriber.
// Pure data definitions with no I/O, no UI, no platform dependencies.

use chrono::{DateTime, Local};

use crate::util::constants::LOG_LINE_TIME_FORMAT;

// =============================================================================
// Event
// =============================================================================

/// One occurrence delivered to every display subscriber.
///
/// Immutable once constructed; each subscriber decides by kind whether to
/// append, replace, clear, or ignore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A captured SMTP session log record.
    LogLine {
        message: String,
        /// Moment the record was formatted for display (delivery time).
        timestamp: DateTime<Local>,
    },

    /// The fully rendered content of the most recently saved mail.
    MailReceived { rendered: String },

    /// The user asked to clear every pane.
    ClearAll,
}

impl Event {
    /// Build a log line stamped with the current local time.
    pub fn log_line(message: impl Into<String>) -> Self {
        Self::LogLine {
            message: message.into(),
            timestamp: Local::now(),
        }
    }

    /// Short label used in diagnostics.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::LogLine { .. } => EventKind::LogLine,
            Self::MailReceived { .. } => EventKind::MailReceived,
            Self::ClearAll => EventKind::ClearAll,
        }
    }

    /// Display form of a log line: `"hh:mm:ss AM - message"`.
    ///
    /// Returns `None` for the other kinds.
    pub fn formatted(&self) -> Option<String> {
        match self {
            Self::LogLine { message, timestamp } => Some(format_log_line(message, timestamp)),
            _ => None,
        }
    }
}

/// Format a log message for display, prefixed by a 12-hour clock timestamp.
pub fn format_log_line(message: &str, timestamp: &DateTime<Local>) -> String {
    format!("{} - {}", timestamp.format(LOG_LINE_TIME_FORMAT), message)
}

/// Discriminant of [`Event`], for logging and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    LogLine,
    MailReceived,
    ClearAll,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LogLine => "log-line",
            Self::MailReceived => "mail-received",
            Self::ClearAll => "clear-all",
        }
    }
}

// =============================================================================
// Mail model
// =============================================================================

/// A saved mail as handed over by the persistence collaborator.
///
/// Only `rendered` travels to the display; the remaining fields feed
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailModel {
    /// When the mail finished writing to storage.
    pub received_at: DateTime<Local>,

    /// Envelope sender.
    pub from: String,

    /// Envelope recipients.
    pub to: Vec<String>,

    /// Subject header, if any.
    pub subject: Option<String>,

    /// Full rendered content: headers followed by the body.
    pub rendered: String,
}
