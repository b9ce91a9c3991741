// SmtpView - core/buffer.rs
//
// Logical text buffer behind a display pane: content plus the search
// cursor. Knows nothing about threads or rendering; the display subscribers
// in `app::display` wrap it in a lock and mirror its changes to the UI.
//
// Positions are byte offsets into the content and always sit on a char
// boundary.

use crate::core::search::{self, SearchHit};

/// Append/replace text buffer with a search cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    content: String,
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer seeded with `content`, cursor at the start.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            cursor: 0,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Append `text` and move the cursor to the new end of content.
    ///
    /// Returns the new end position.
    pub fn append(&mut self, text: &str) -> usize {
        self.content.push_str(text);
        self.cursor = self.content.len();
        self.cursor
    }

    /// Replace the whole content and move the cursor to the start.
    pub fn replace(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = 0;
    }

    /// Drop all content.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Move the cursor, clamped to the content length.
    pub fn set_cursor(&mut self, position: usize) {
        let mut pos = position.min(self.content.len());
        while !self.content.is_char_boundary(pos) {
            pos -= 1;
        }
        self.cursor = pos;
    }

    /// Find the next occurrence of `term` from the cursor, wrapping once.
    ///
    /// - Empty term: returns `None` and leaves the cursor untouched.
    /// - Match: the cursor moves just past it, so repeating the call finds
    ///   the following occurrence.
    /// - No match: the wrap has already reset the cursor to the start; it
    ///   stays there.
    pub fn find(&mut self, term: &str) -> Option<SearchHit> {
        if term.is_empty() {
            return None;
        }
        match search::find_wrapping(&self.content, term, self.cursor) {
            Some(hit) => {
                self.cursor = hit.range.end;
                Some(hit)
            }
            None => {
                self.cursor = 0;
                None
            }
        }
    }
}
