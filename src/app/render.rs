// SmtpView - app/render.rs
//
// Hand-off of display mutations from producer threads to the UI thread.
//
// Architecture:
//   - Display subscribers run on whichever thread published the event. They
//     never touch UI-owned state; instead each change to a pane's buffer is
//     described as a `RenderCommand` and sent over an mpsc channel.
//   - The UI thread owns the receiving `RenderQueue` and drains it each frame
//     into its `TextSurface` (try_recv until empty, never block).
//
// Positions in commands are byte offsets into the pane's buffer.

use std::ops::Range;
use std::sync::mpsc;

use crate::util::error::RenderError;

/// One change to apply to a text surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    /// Replace the whole displayed text.
    SetText(String),
    /// Append text at the end.
    Append(String),
    /// Move the caret (and the view) to this position.
    SetCursorPosition(usize),
    /// Highlight a search match.
    Select { start: usize, end: usize },
}

/// The opaque display surface owned by the rendering thread.
pub trait TextSurface {
    fn set_text(&mut self, text: &str);
    fn append(&mut self, text: &str);
    fn set_cursor_position(&mut self, position: usize);
    fn select(&mut self, range: Range<usize>);
}

impl RenderCommand {
    /// Apply this command to a surface.
    pub fn apply(&self, surface: &mut dyn TextSurface) {
        match self {
            Self::SetText(text) => surface.set_text(text),
            Self::Append(text) => surface.append(text),
            Self::SetCursorPosition(pos) => surface.set_cursor_position(*pos),
            Self::Select { start, end } => surface.select(*start..*end),
        }
    }
}

/// Create a connected sender/queue pair for the pane called `pane`.
pub fn render_channel(pane: &'static str) -> (RenderSender, RenderQueue) {
    let (tx, rx) = mpsc::channel();
    (RenderSender { pane, tx }, RenderQueue { pane, rx })
}

/// Producer side, held by a display subscriber.
#[derive(Debug, Clone)]
pub struct RenderSender {
    pane: &'static str,
    tx: mpsc::Sender<RenderCommand>,
}

impl RenderSender {
    pub fn send(&self, command: RenderCommand) -> Result<(), RenderError> {
        self.tx
            .send(command)
            .map_err(|_| RenderError::QueueClosed { pane: self.pane })
    }
}

/// Consumer side, owned by the UI thread.
#[derive(Debug)]
pub struct RenderQueue {
    pane: &'static str,
    rx: mpsc::Receiver<RenderCommand>,
}

impl RenderQueue {
    pub fn pane(&self) -> &'static str {
        self.pane
    }

    /// Drain all currently queued commands without blocking.
    pub fn poll(&self) -> Vec<RenderCommand> {
        let mut commands = Vec::new();
        while let Ok(command) = self.rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    /// Drain the queue into `surface`, returning how many commands were applied.
    pub fn drain_into(&self, surface: &mut dyn TextSurface) -> usize {
        let commands = self.poll();
        for command in &commands {
            command.apply(surface);
        }
        commands.len()
    }
}
