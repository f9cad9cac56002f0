#![forbid(unsafe_code)]

//! Aligned (label, value, stats) rows for auxiliary producers.
//!
//! The view does not interpret its rows. Producers (profilers, request
//! variables, environment listings) hand over pre-formatted text and the
//! table only aligns it into columns.

use vdump_core::event::KeyEvent;
use vdump_core::geometry::Rect;
use vdump_render::buffer::Buffer;
use vdump_render::display_width;
use vdump_render::segment::Line;

use crate::View;
use crate::format::{KEY, LITERAL, NUMBER, PUNCT, TYPE};
use crate::profile::{ProfileRecord, format_elapsed};
use crate::text_view::TextView;

const COLUMN_GAP: usize = 2;

/// One row of a [`TableView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// First column.
    pub label: String,
    /// Second column.
    pub value: String,
    /// Optional third column.
    pub stats: Option<String>,
}

impl TableRow {
    /// A row without stats.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            stats: None,
        }
    }

    /// Attach stats text.
    #[must_use]
    pub fn with_stats(mut self, stats: impl Into<String>) -> Self {
        self.stats = Some(stats.into());
        self
    }
}

/// A scrollable table of pre-formatted rows.
#[derive(Debug)]
pub struct TableView {
    rows: Vec<TableRow>,
    text: TextView,
    hide_when_empty: bool,
}

impl TableView {
    /// Create a table, optionally with a header row.
    pub fn new(label: impl Into<String>, header: Option<[&str; 3]>, rows: Vec<TableRow>) -> Self {
        let lines = layout(header, &rows);
        Self {
            rows,
            text: TextView::new(label, lines),
            hide_when_empty: false,
        }
    }

    /// One row per profile: label, elapsed time, detail.
    pub fn from_profiles<P: ProfileRecord>(label: impl Into<String>, records: &[P]) -> Self {
        let rows = records
            .iter()
            .map(|record| TableRow {
                label: record.label().to_string(),
                value: format_elapsed(record.elapsed()),
                stats: record.detail(),
            })
            .collect();
        Self::new(label, Some(["Profile", "Elapsed", "Detail"]), rows).hide_when_empty()
    }

    /// Make the view non-showable while it has no rows.
    #[must_use]
    pub fn hide_when_empty(mut self) -> Self {
        self.hide_when_empty = true;
        self
    }

    /// The rows shown.
    #[must_use]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }
}

fn layout(header: Option<[&str; 3]>, rows: &[TableRow]) -> Vec<Line> {
    let mut label_width = header.map_or(0, |h| display_width(h[0]));
    let mut value_width = header.map_or(0, |h| display_width(h[1]));
    for row in rows {
        label_width = label_width.max(display_width(&row.label));
        value_width = value_width.max(display_width(&row.value));
    }
    let pad = |text: &str, width: usize| {
        let fill = width.saturating_sub(display_width(text)) + COLUMN_GAP;
        " ".repeat(fill)
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    if let Some([a, b, c]) = header {
        lines.push(
            Line::new()
                .with(TYPE, a)
                .with(PUNCT, pad(a, label_width))
                .with(TYPE, b)
                .with(PUNCT, pad(b, value_width))
                .with(TYPE, c),
        );
        let rule = label_width + value_width + 2 * COLUMN_GAP + display_width(c);
        lines.push(Line::from_segment(PUNCT, "-".repeat(rule)));
    }
    for row in rows {
        let mut line = Line::new()
            .with(KEY, row.label.clone())
            .with(PUNCT, pad(&row.label, label_width))
            .with(NUMBER, row.value.clone());
        if let Some(stats) = &row.stats {
            line.push(PUNCT, pad(&row.value, value_width));
            line.push(LITERAL, stats.clone());
        }
        lines.push(line);
    }
    lines
}

impl View for TableView {
    fn label(&self) -> &str {
        self.text.label()
    }

    fn is_showable(&self) -> bool {
        !(self.hide_when_empty && self.rows.is_empty())
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        self.text.render(area, buf);
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.text.handle_key(key)
    }

    fn hints(&self) -> String {
        self.text.hints()
    }

    fn drop_cache(&mut self) {
        self.text.drop_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Timing;
    use std::time::Duration;

    fn texts(view: &TableView) -> Vec<String> {
        view.text.lines().iter().map(Line::plain_text).collect()
    }

    #[test]
    fn columns_align() {
        let view = TableView::new(
            "Vars",
            None,
            vec![
                TableRow::new("HOME", "/root").with_stats("env"),
                TableRow::new("LANG", "C"),
                TableRow::new("X", "1").with_stats("arg"),
            ],
        );
        assert_eq!(
            texts(&view),
            ["HOME  /root  env", "LANG  C", "X     1      arg"]
        );
    }

    #[test]
    fn profiles_become_rows() {
        let records = [
            Timing::new("query", Duration::from_micros(1250)).with_detail("3 calls"),
            Timing::new("render", Duration::from_millis(2)),
        ];
        let view = TableView::from_profiles("Profiler", &records);
        assert_eq!(view.rows().len(), 2);
        assert_eq!(view.rows()[0].value, "1.250 ms");
        assert_eq!(view.rows()[0].stats.as_deref(), Some("3 calls"));
        let lines = texts(&view);
        assert_eq!(lines[0], "Profile  Elapsed   Detail");
        assert_eq!(lines[2], "query    1.250 ms  3 calls");
        assert!(view.is_showable());
    }

    #[test]
    fn empty_profiles_are_hidden() {
        let view = TableView::from_profiles::<Timing>("Profiler", &[]);
        assert!(!view.is_showable());
        assert!(TableView::new("t", None, Vec::new()).is_showable());
    }
}
