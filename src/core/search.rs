// SmtpView - core/search.rs
//
// Find-in-buffer with wrap-around.
// Case-insensitive, literal (non-regex) substring matching. The term is
// escaped and compiled with the regex crate so that case folding works on
// the original text and match offsets stay valid byte positions.
// Core layer: pure logic, no I/O or UI dependencies.

use regex::{Regex, RegexBuilder};
use std::ops::Range;

/// Outcome of a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Byte range of the match in the searched text.
    pub range: Range<usize>,
    /// True when the match was found only after restarting from the top.
    pub wrapped: bool,
}

/// Compile a literal, case-insensitive matcher for `term`.
///
/// Returns `None` for an empty term.
pub fn literal_matcher(term: &str) -> Option<Regex> {
    if term.is_empty() {
        return None;
    }
    // An escaped literal is always a valid pattern; the size limit is the
    // only way this can fail, which is reported as "no matcher".
    match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(error = %e, len = term.len(), "Search term could not be compiled");
            None
        }
    }
}

/// Search forward for `term` in `text` starting at byte `cursor`.
///
/// If nothing matches between the cursor and the end, the search restarts at
/// the beginning of the text exactly once. A cursor past the end or off a
/// character boundary is clamped back to the nearest boundary before it.
pub fn find_wrapping(text: &str, term: &str, cursor: usize) -> Option<SearchHit> {
    let matcher = literal_matcher(term)?;
    let start = floor_char_boundary(text, cursor);

    if let Some(m) = matcher.find_at(text, start) {
        return Some(SearchHit {
            range: m.range(),
            wrapped: false,
        });
    }

    matcher.find(text).map(|m| SearchHit {
        range: m.range(),
        wrapped: true,
    })
}

/// Largest char boundary of `text` that is `<= index`.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut i = index;
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}
