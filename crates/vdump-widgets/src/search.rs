#![forbid(unsafe_code)]

//! Incremental search over rendered text.
//!
//! Search runs against the text exactly as it is drawn, prefixes and type
//! labels included. [`SearchCanvas`] sits between a draw routine and the real
//! canvas: it buffers each row, finds case-insensitive non-overlapping matches
//! of the query in it, forwards the row with matched text recolored to
//! [`ColorTag::MATCH`], and records which elements produced a match.

use std::collections::BTreeSet;
use std::ops::Range;

use vdump_render::canvas::Canvas;
use vdump_render::color::ColorTag;
use vdump_render::display_width;

use crate::var_tree::NodeId;

/// Strip control characters (newlines included) from a raw query.
#[must_use]
pub fn clean_query(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_control()).collect()
}

fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Byte ranges of case-insensitive, non-overlapping matches of `needle` in
/// `haystack`, left to right. `needle` must already be folded.
fn find_matches(haystack: &str, needle: &[char]) -> Vec<Range<usize>> {
    if needle.is_empty() {
        return Vec::new();
    }
    let chars: Vec<(usize, char)> = haystack.char_indices().collect();
    let mut results = Vec::new();
    let mut i = 0;
    while i + needle.len() <= chars.len() {
        let hit = chars[i..i + needle.len()]
            .iter()
            .zip(needle)
            .all(|(&(_, c), &n)| fold(c) == n);
        if hit {
            let start = chars[i].0;
            let end = chars
                .get(i + needle.len())
                .map_or(haystack.len(), |&(offset, _)| offset);
            results.push(start..end);
            i += needle.len();
        } else {
            i += 1;
        }
    }
    results
}

/// Count matches of `query` in `text`, line by line.
#[must_use]
pub fn count_matches(text: &str, query: &str) -> usize {
    let needle: Vec<char> = clean_query(query).chars().map(fold).collect();
    text.split('\n').map(|line| find_matches(line, &needle).len()).sum()
}

/// Search results of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Number of matches found.
    pub match_count: usize,
    /// Elements owning at least one match.
    pub matched: BTreeSet<NodeId>,
}

/// Canvas adapter that highlights and counts matches of a query.
pub struct SearchCanvas<'a> {
    inner: &'a mut dyn Canvas,
    needle: Vec<char>,
    pending: Vec<(String, ColorTag)>,
    pending_width: usize,
    element: Option<NodeId>,
    outcome: SearchOutcome,
}

impl<'a> SearchCanvas<'a> {
    /// Wrap `inner`, searching for `query` (cleaned and case-folded here).
    pub fn new(inner: &'a mut dyn Canvas, query: &str) -> Self {
        Self {
            inner,
            needle: clean_query(query).chars().map(fold).collect(),
            pending: Vec::new(),
            pending_width: 0,
            element: None,
            outcome: SearchOutcome::default(),
        }
    }

    /// Flush the last row and return what was found.
    pub fn finish(mut self) -> SearchOutcome {
        self.flush();
        self.outcome
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending);
        self.pending_width = 0;
        let text: String = pending.iter().map(|(t, _)| t.as_str()).collect();
        let matches = find_matches(&text, &self.needle);
        if !matches.is_empty() {
            self.outcome.match_count += matches.len();
            if let Some(element) = self.element {
                self.outcome.matched.insert(element);
            }
        }

        let mut offset = 0;
        for (piece, color) in &pending {
            let piece_range = offset..offset + piece.len();
            let mut cursor = piece_range.start;
            for m in &matches {
                let start = m.start.max(piece_range.start);
                let end = m.end.min(piece_range.end);
                if start >= end {
                    continue;
                }
                if cursor < start {
                    self.inner.print_segment(&text[cursor..start], *color);
                }
                self.inner.print_segment(&text[start..end], ColorTag::MATCH);
                cursor = end;
            }
            if cursor < piece_range.end {
                self.inner.print_segment(&text[cursor..piece_range.end], *color);
            }
            offset = piece_range.end;
        }
    }
}

impl Canvas for SearchCanvas<'_> {
    fn print_segment(&mut self, text: &str, color: ColorTag) {
        for (i, piece) in text.split('\n').enumerate() {
            if i > 0 {
                self.new_line();
            }
            if !piece.is_empty() {
                self.pending_width += display_width(piece);
                self.pending.push((piece.to_string(), color));
            }
        }
    }

    fn new_line(&mut self) {
        self.flush();
        self.inner.new_line();
    }

    fn skip_rows(&mut self, rows: usize) {
        self.flush();
        self.inner.skip_rows(rows);
    }

    fn row(&self) -> usize {
        self.inner.row()
    }

    fn col(&self) -> usize {
        self.inner.col() + self.pending_width
    }

    fn window(&self) -> Range<usize> {
        self.inner.window()
    }

    fn is_measuring(&self) -> bool {
        self.inner.is_measuring()
    }

    fn begin_element(&mut self, element: usize) {
        self.flush();
        self.element = Some(element);
        self.inner.begin_element(element);
    }
}

/// Query and results of the search in one view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    match_count: usize,
    matched: BTreeSet<NodeId>,
}

impl SearchState {
    /// Empty search.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The query as typed, control characters removed.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether there is a non-empty query.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    /// Matches found by the last pass.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.match_count
    }

    /// Elements that matched in the last pass.
    #[must_use]
    pub fn matched(&self) -> &BTreeSet<NodeId> {
        &self.matched
    }

    /// Append typed text. Control characters are dropped.
    /// Returns `true` if the query changed.
    pub fn push_str(&mut self, raw: &str) -> bool {
        let cleaned = clean_query(raw);
        self.query.push_str(&cleaned);
        !cleaned.is_empty()
    }

    /// Remove the last character. Returns `true` if the query changed.
    pub fn pop(&mut self) -> bool {
        self.query.pop().is_some()
    }

    /// Drop the query and every result.
    pub fn clear(&mut self) {
        self.query.clear();
        self.match_count = 0;
        self.matched.clear();
    }

    /// Store the results of a pass.
    pub fn apply(&mut self, outcome: SearchOutcome) {
        if self.is_active() {
            self.match_count = outcome.match_count;
            self.matched = outcome.matched;
        } else {
            self.match_count = 0;
            self.matched.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdump_render::buffer::Buffer;
    use vdump_render::canvas::{LineAccumulator, PadCanvas};
    use vdump_render::color::Color;

    #[test]
    fn clean_strips_controls() {
        assert_eq!(clean_query("a\nb\x1b\tc"), "abc");
        assert_eq!(clean_query("\n\r"), "");
    }

    #[test]
    fn counts_case_insensitive_non_overlapping() {
        assert_eq!(count_matches("Hello hello HELLO", "hello"), 3);
        assert_eq!(count_matches("aaaa", "aa"), 2);
        assert_eq!(count_matches("abc", ""), 0);
        assert_eq!(count_matches("ÄÖ äö", "äö"), 2);
    }

    #[test]
    fn matches_do_not_span_lines() {
        assert_eq!(count_matches("ab\ncd", "bc"), 0);
    }

    #[test]
    fn match_across_segments_is_recolored() {
        let mut buf = Buffer::new(10, 1);
        let outcome = {
            let mut pad = PadCanvas::new(&mut buf, 0, 0);
            let mut canvas = SearchCanvas::new(&mut pad, "t(4");
            canvas.begin_element(3);
            canvas.print_segment("int(", Color::Green.tag());
            canvas.print_segment("42", Color::Blue.tag());
            canvas.print_segment(")", Color::Green.tag());
            canvas.new_line();
            canvas.finish()
        };
        assert_eq!(outcome.match_count, 1);
        assert!(outcome.matched.contains(&3));
        assert_eq!(buf.row_text(0), "int(42)");
        assert_eq!(buf.get(1, 0).unwrap().color, Color::Green.tag());
        for x in 2..5 {
            assert_eq!(buf.get(x, 0).unwrap().color, ColorTag::MATCH);
        }
        assert_eq!(buf.get(5, 0).unwrap().color, Color::Blue.tag());
    }

    #[test]
    fn empty_query_leaves_colors_alone() {
        let mut buf = Buffer::new(5, 1);
        let outcome = {
            let mut pad = PadCanvas::new(&mut buf, 0, 0);
            let mut canvas = SearchCanvas::new(&mut pad, "\n");
            canvas.print_segment("abc", Color::Red.tag());
            canvas.finish()
        };
        assert_eq!(outcome.match_count, 0);
        assert!((0..3).all(|x| buf.get(x, 0).unwrap().color == Color::Red.tag()));
    }

    #[test]
    fn measurement_extent_is_preserved() {
        let mut acc = LineAccumulator::new();
        {
            let mut canvas = SearchCanvas::new(&mut acc, "b");
            canvas.print_segment("abc\nbb", ColorTag::DEFAULT);
            assert_eq!(canvas.col(), 2);
            let outcome = canvas.finish();
            assert_eq!(outcome.match_count, 3);
        }
        assert_eq!(acc.height(), 2);
        assert_eq!(acc.width(), 3);
    }

    #[test]
    fn state_clear_resets_results() {
        let mut state = SearchState::new();
        assert!(!state.push_str("\x1b"));
        assert!(!state.is_active());
        assert!(state.push_str("ab"));
        let mut outcome = SearchOutcome::default();
        outcome.match_count = 2;
        outcome.matched.insert(1);
        state.apply(outcome);
        assert_eq!(state.match_count(), 2);
        state.clear();
        assert_eq!(state.match_count(), 0);
        assert!(state.matched().is_empty());
    }
}
