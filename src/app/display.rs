// SmtpView - app/display.rs
//
// Display subscribers: the logs pane and the last-mail pane.
//
// Each pane owns a `TextBuffer` behind a mutex. `handle` runs on the
// producer's thread: it applies the event to the buffer and, while still
// holding the lock, queues the matching render commands. The UI thread
// therefore replays changes in exactly the order the buffer applied them.
//
// `find` is called from the UI thread and goes through the same lock.

use std::sync::{Mutex, MutexGuard};

use crate::app::publisher::Subscriber;
use crate::app::render::{RenderCommand, RenderSender};
use crate::core::buffer::TextBuffer;
use crate::core::event::Event;
use crate::util::error::{HandlerError, RenderError};

/// Buffer, cursor and optional render hand-off shared by both pane kinds.
#[derive(Debug)]
struct DisplayPane {
    name: &'static str,
    buffer: Mutex<TextBuffer>,
    render: Option<RenderSender>,
}

impl DisplayPane {
    fn new(name: &'static str, render: Option<RenderSender>) -> Self {
        Self {
            name,
            buffer: Mutex::new(TextBuffer::new()),
            render,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TextBuffer> {
        self.buffer.lock().unwrap_or_else(|poisoned| {
            tracing::warn!(pane = self.name, "Pane buffer lock poisoned; recovering");
            poisoned.into_inner()
        })
    }

    /// Mutate the buffer and queue the resulting render commands atomically.
    fn update<F>(&self, mutate: F) -> Result<(), RenderError>
    where
        F: FnOnce(&mut TextBuffer) -> Vec<RenderCommand>,
    {
        let mut buffer = self.lock();
        let commands = mutate(&mut buffer);
        self.emit(commands)
    }

    fn emit(&self, commands: Vec<RenderCommand>) -> Result<(), RenderError> {
        if let Some(render) = &self.render {
            for command in commands {
                render.send(command)?;
            }
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), RenderError> {
        self.update(|buffer| {
            buffer.clear();
            vec![RenderCommand::SetText(String::new())]
        })
    }

    fn find(&self, term: &str) -> bool {
        let mut buffer = self.lock();
        let Some(hit) = buffer.find(term) else {
            tracing::debug!(pane = self.name, len = term.len(), "Search term not found");
            return false;
        };
        tracing::debug!(
            pane = self.name,
            start = hit.range.start,
            wrapped = hit.wrapped,
            "Search match"
        );
        if let Err(e) = self.emit(vec![RenderCommand::Select {
            start: hit.range.start,
            end: hit.range.end,
        }]) {
            tracing::warn!(pane = self.name, error = %e, "Could not highlight search match");
        }
        true
    }

    fn content(&self) -> String {
        self.lock().content().to_string()
    }

    fn cursor(&self) -> usize {
        self.lock().cursor()
    }
}

// =============================================================================
// LogsBuffer
// =============================================================================

/// Logs pane: appends every log line, clears on request, ignores mail.
#[derive(Debug)]
pub struct LogsBuffer {
    pane: DisplayPane,
}

impl LogsBuffer {
    /// Pane without a renderer (headless use and tests).
    pub fn new() -> Self {
        Self {
            pane: DisplayPane::new("logs", None),
        }
    }

    /// Pane that mirrors every change into `render`.
    pub fn with_renderer(render: RenderSender) -> Self {
        Self {
            pane: DisplayPane::new("logs", Some(render)),
        }
    }

    /// Find the next occurrence of `term`, wrapping once. See [`TextBuffer::find`].
    pub fn find(&self, term: &str) -> bool {
        self.pane.find(term)
    }

    /// Snapshot of the buffer content.
    pub fn content(&self) -> String {
        self.pane.content()
    }

    /// Current search cursor (byte offset).
    pub fn cursor(&self) -> usize {
        self.pane.cursor()
    }
}

impl Default for LogsBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscriber for LogsBuffer {
    fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        match event {
            Event::LogLine { .. } => {
                let Some(mut line) = event.formatted() else {
                    return Ok(());
                };
                line.push('\n');
                self.pane.update(|buffer| {
                    let end = buffer.append(&line);
                    vec![
                        RenderCommand::Append(line),
                        RenderCommand::SetCursorPosition(end),
                    ]
                })?;
            }
            Event::ClearAll => self.pane.clear()?,
            Event::MailReceived { .. } => {}
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "logs"
    }
}

// =============================================================================
// MailBuffer
// =============================================================================

/// Last-mail pane: shows only the most recent mail, clears on request,
/// ignores log lines.
#[derive(Debug)]
pub struct MailBuffer {
    pane: DisplayPane,
}

impl MailBuffer {
    /// Pane without a renderer (headless use and tests).
    pub fn new() -> Self {
        Self {
            pane: DisplayPane::new("last-mail", None),
        }
    }

    /// Pane that mirrors every change into `render`.
    pub fn with_renderer(render: RenderSender) -> Self {
        Self {
            pane: DisplayPane::new("last-mail", Some(render)),
        }
    }

    /// Find the next occurrence of `term`, wrapping once. See [`TextBuffer::find`].
    pub fn find(&self, term: &str) -> bool {
        self.pane.find(term)
    }

    /// Snapshot of the buffer content.
    pub fn content(&self) -> String {
        self.pane.content()
    }

    /// Current search cursor (byte offset).
    pub fn cursor(&self) -> usize {
        self.pane.cursor()
    }
}

impl Default for MailBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscriber for MailBuffer {
    fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        match event {
            Event::MailReceived { rendered } => {
                self.pane.update(|buffer| {
                    buffer.replace(rendered.as_str());
                    vec![
                        RenderCommand::SetText(rendered.clone()),
                        RenderCommand::SetCursorPosition(0),
                    ]
                })?;
            }
            Event::ClearAll => self.pane.clear()?,
            Event::LogLine { .. } => {}
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "last-mail"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::render::{render_channel, testing::RecordingSurface};
    use chrono::{DateTime, Local, TimeZone};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 2, h, m, s).unwrap()
    }

    fn line(message: &str, timestamp: DateTime<Local>) -> Event {
        Event::LogLine {
            message: message.to_string(),
            timestamp,
        }
    }

    fn mail(rendered: &str) -> Event {
        Event::MailReceived {
            rendered: rendered.to_string(),
        }
    }

    #[test]
    fn test_logs_append_formatted_lines_in_order() {
        let logs = LogsBuffer::new();
        logs.handle(&line("Connection received from 127.0.0.1", at(14, 1, 2)))
            .unwrap();
        logs.handle(&line("Message stored", at(14, 1, 3))).unwrap();

        assert_eq!(
            logs.content(),
            "02:01:02 PM - Connection received from 127.0.0.1\n\
             02:01:03 PM - Message stored\n"
        );
        assert_eq!(logs.cursor(), logs.content().len());
    }

    #[test]
    fn test_logs_ignore_mail_and_clear_on_request() {
        let logs = LogsBuffer::new();
        logs.handle(&line("HELO", at(8, 0, 0))).unwrap();
        logs.handle(&mail("Subject: hi")).unwrap();
        assert_eq!(logs.content(), "08:00:00 AM - HELO\n");

        logs.handle(&Event::ClearAll).unwrap();
        assert_eq!(logs.content(), "");
        assert_eq!(logs.cursor(), 0);
    }

    #[test]
    fn test_mail_replaces_instead_of_appending() {
        let last = MailBuffer::new();
        last.handle(&mail("first mail")).unwrap();
        last.handle(&mail("second mail")).unwrap();
        assert_eq!(last.content(), "second mail");
    }

    #[test]
    fn test_mail_ignores_log_lines_and_clears() {
        let last = MailBuffer::new();
        last.handle(&mail("body")).unwrap();
        last.handle(&line("noise", at(1, 2, 3))).unwrap();
        assert_eq!(last.content(), "body");

        last.handle(&Event::ClearAll).unwrap();
        assert_eq!(last.content(), "");
    }

    #[test]
    fn test_find_on_mail_cycles_through_matches() {
        let last = MailBuffer::new();
        last.handle(&mail("hello world test this is a test for a message test"))
            .unwrap();

        assert!(last.find("TEST"));
        assert_eq!(last.cursor(), 16);
        assert!(last.find("test"));
        assert_eq!(last.cursor(), 31);
        assert!(last.find("test"));
        assert_eq!(last.cursor(), 50);
        assert!(last.find("test"));
        assert_eq!(last.cursor(), 16);
    }

    #[test]
    fn test_find_empty_term_is_not_found() {
        let logs = LogsBuffer::new();
        logs.handle(&line("something", at(3, 3, 3))).unwrap();
        let before = logs.cursor();
        assert!(!logs.find(""));
        assert_eq!(logs.cursor(), before);
    }

    #[test]
    fn test_logs_render_commands_mirror_buffer() {
        let (tx, queue) = render_channel("logs");
        let logs = LogsBuffer::with_renderer(tx);
        logs.handle(&line("one", at(10, 0, 0))).unwrap();
        logs.handle(&line("two", at(10, 0, 1))).unwrap();

        let mut surface = RecordingSurface::default();
        queue.drain_into(&mut surface);
        assert_eq!(surface.text, logs.content());
        assert_eq!(surface.cursor, logs.content().len());

        assert!(logs.find("ONE"));
        queue.drain_into(&mut surface);
        assert_eq!(surface.selection, Some(14..17));

        logs.handle(&Event::ClearAll).unwrap();
        queue.drain_into(&mut surface);
        assert_eq!(surface.text, "");
    }

    #[test]
    fn test_closed_render_queue_still_updates_buffer() {
        let (tx, queue) = render_channel("last-mail");
        drop(queue);
        let last = MailBuffer::with_renderer(tx);

        let result = last.handle(&mail("kept"));
        assert!(matches!(result, Err(HandlerError::Render(_))));
        assert_eq!(last.content(), "kept");
    }
}
