// SmtpView - ui/pane.rs
//
// Read-only text pane: the rendering collaborator behind each display
// subscriber. Lives on the UI thread and is fed exclusively through
// `RenderQueue::drain_into`.

use std::ops::Range;

use crate::app::render::TextSurface;

/// UI-side copy of a pane's text plus pending view actions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PaneView {
    /// Displayed text.
    pub text: String,

    /// Caret position (byte offset).
    pub cursor: usize,

    /// Search match waiting to be highlighted on the next frame.
    pub pending_selection: Option<Range<usize>>,

    /// Keep the view pinned to the bottom while new text is appended.
    pub follow_tail: bool,
}

impl PaneView {
    pub fn new(follow_tail: bool) -> Self {
        Self {
            follow_tail,
            ..Self::default()
        }
    }
}

impl TextSurface for PaneView {
    fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.cursor = self.cursor.min(self.text.len());
        self.pending_selection = None;
    }

    fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn set_cursor_position(&mut self, position: usize) {
        self.cursor = position.min(self.text.len());
    }

    fn select(&mut self, range: Range<usize>) {
        if range.end <= self.text.len() {
            self.cursor = range.end;
            self.pending_selection = Some(range);
        }
    }
}

/// Convert a byte offset into a char index, as egui cursors count chars.
pub fn char_index(text: &str, byte_offset: usize) -> usize {
    let end = byte_offset.min(text.len());
    text.char_indices().take_while(|(i, _)| *i < end).count()
}

/// Zero-based line that contains `byte_offset`.
pub fn line_index(text: &str, byte_offset: usize) -> usize {
    let end = byte_offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count()
}

/// Render the pane as a read-only, scrollable monospace text area.
///
/// A pending search match is selected and scrolled into view. Keyboard
/// focus only moves to the pane when no other widget holds it, so the
/// search box keeps focus and Enter keeps cycling through matches.
pub fn render(ui: &mut egui::Ui, id: &str, pane: &mut PaneView, font_size: f32) {
    let text_id = ui.make_persistent_id(id);
    let font = egui::FontId::monospace(font_size);

    let scroll_to_line = pane.pending_selection.take().map(|range| {
        let start = char_index(&pane.text, range.start);
        let end = char_index(&pane.text, range.end);
        let mut state = egui::text_edit::TextEditState::load(ui.ctx(), text_id).unwrap_or_default();
        state
            .cursor
            .set_char_range(Some(egui::text::CCursorRange::two(
                egui::text::CCursor::new(start),
                egui::text::CCursor::new(end),
            )));
        state.store(ui.ctx(), text_id);
        if ui.memory(|m| m.focused().is_none()) {
            ui.memory_mut(|m| m.request_focus(text_id));
        }
        line_index(&pane.text, range.start)
    });

    egui::ScrollArea::vertical()
        .id_salt(id)
        .auto_shrink([false, false])
        .stick_to_bottom(pane.follow_tail && scroll_to_line.is_none())
        .show(ui, |ui| {
            let mut text = pane.text.as_str();
            let response = ui.add(
                egui::TextEdit::multiline(&mut text)
                    .id(text_id)
                    .font(font.clone())
                    .desired_width(f32::INFINITY),
            );
            if let Some(line) = scroll_to_line {
                let row_height = ui.fonts(|f| f.row_height(&font));
                let top = response.rect.top() + line as f32 * row_height;
                let row = egui::Rect::from_min_size(
                    egui::pos2(response.rect.left(), top),
                    egui::vec2(response.rect.width(), row_height),
                );
                ui.scroll_to_rect(row, Some(egui::Align::Center));
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::render::{RenderCommand, TextSurface};

    #[test]
    fn test_commands_update_view() {
        let mut view = PaneView::new(true);
        RenderCommand::Append("héllo\n".into()).apply(&mut view);
        RenderCommand::SetCursorPosition(7).apply(&mut view);
        assert_eq!(view.text, "héllo\n");
        assert_eq!(view.cursor, 7);

        view.select(1..3);
        assert_eq!(view.pending_selection, Some(1..3));

        view.set_text("");
        assert_eq!(view.cursor, 0);
        assert_eq!(view.pending_selection, None);
    }

    #[test]
    fn test_out_of_range_selection_is_ignored() {
        let mut view = PaneView::default();
        view.set_text("abc");
        view.select(2..10);
        assert_eq!(view.pending_selection, None);
    }

    #[test]
    fn test_line_index_counts_preceding_newlines() {
        let text = "one\ntwo\nthree\n";
        assert_eq!(line_index(text, 0), 0);
        assert_eq!(line_index(text, 4), 1);
        assert_eq!(line_index(text, 8), 2);
        assert_eq!(line_index(text, 99), 3);
    }

    /// Show `pane` for one frame after `before` ran on the same `Ui`.
    fn run_frame(pane: &mut PaneView, before: impl Fn(&mut egui::Ui)) -> (bool, bool) {
        let ctx = egui::Context::default();
        let mut focus = (false, false);
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                before(ui);
                render(ui, "logs_pane", pane, 14.0);
                let search = ui.make_persistent_id("search");
                let text = ui.make_persistent_id("logs_pane");
                focus = (
                    ui.memory(|m| m.has_focus(search)),
                    ui.memory(|m| m.has_focus(text)),
                );
            });
        });
        focus
    }

    #[test]
    fn test_match_keeps_focus_in_search_box() {
        let mut pane = PaneView::new(true);
        pane.set_text("HELO\nRCPT TO:<bob>\n");
        pane.select(5..9);

        let (search, text) = run_frame(&mut pane, |ui| {
            let search = ui.make_persistent_id("search");
            ui.memory_mut(|m| m.request_focus(search));
        });
        assert!(search);
        assert!(!text);
        assert_eq!(pane.pending_selection, None);
    }

    #[test]
    fn test_match_focuses_pane_when_nothing_else_is_focused() {
        let mut pane = PaneView::new(true);
        pane.set_text("HELO\nRCPT TO:<bob>\n");
        pane.select(5..9);

        let (search, text) = run_frame(&mut pane, |_| {});
        assert!(!search);
        assert!(text);
    }

    #[test]
    fn test_char_index_counts_chars_not_bytes() {
        assert_eq!(char_index("héllo", 0), 0);
        assert_eq!(char_index("héllo", 3), 2);
        assert_eq!(char_index("héllo", 99), 5);
    }
}
