#![forbid(unsafe_code)]

//! Scrollable multi-line text.

use vdump_core::event::KeyEvent;
use vdump_core::geometry::Rect;
use vdump_render::buffer::Buffer;
use vdump_render::canvas::Canvas;
use vdump_render::color::ColorTag;
use vdump_render::segment::Line;

use crate::View;
use crate::scroll_view::{ScrollView, ViewportState};

/// A view showing fixed colored lines, scrollable in both directions.
#[derive(Debug)]
pub struct TextView {
    label: String,
    lines: Vec<Line>,
    scroll: ScrollView,
    showable: bool,
}

impl TextView {
    /// Create a view over pre-built lines.
    pub fn new(label: impl Into<String>, lines: Vec<Line>) -> Self {
        Self {
            label: label.into(),
            lines,
            scroll: ScrollView::new(),
            showable: true,
        }
    }

    /// Create a view over plain text, one row per line.
    pub fn from_text(label: impl Into<String>, text: &str, color: ColorTag) -> Self {
        let lines = text
            .lines()
            .map(|line| Line::from_segment(color, line))
            .collect();
        Self::new(label, lines)
    }

    /// Hide the view from rotation when it has no lines.
    #[must_use]
    pub fn hide_when_empty(mut self) -> Self {
        self.showable = !self.lines.is_empty();
        self
    }

    /// The lines shown.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Viewport state.
    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        self.scroll.state()
    }

    /// Draw every line onto `canvas`, skipping rows outside its window.
    pub fn draw_lines(lines: &[Line], canvas: &mut dyn Canvas) {
        let window = canvas.window();
        let skip = window.start.min(lines.len());
        canvas.skip_rows(skip);
        for line in &lines[skip..] {
            if canvas.row() >= window.end {
                break;
            }
            line.draw(canvas);
            canvas.new_line();
        }
    }
}

impl View for TextView {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_showable(&self) -> bool {
        self.showable
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let lines = &self.lines;
        self.scroll
            .render(area, buf, |canvas: &mut dyn Canvas| Self::draw_lines(lines, canvas));
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.scroll.handle_scroll_key(&key)
    }

    fn hints(&self) -> String {
        "Arrows:Scroll".to_string()
    }

    fn drop_cache(&mut self) {
        self.scroll.drop_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdump_core::event::KeyCode;

    #[test]
    fn renders_and_scrolls() {
        let text: String = (0..500).map(|i| format!("row {i}\n")).collect();
        let mut view = TextView::from_text("text", &text, ColorTag::DEFAULT);
        let mut buf = Buffer::new(30, 20);
        view.render(buf.bounds(), &mut buf);
        assert_eq!(view.viewport().virtual_height, 500);
        assert_eq!(buf.row_text(0), "row 0");

        for _ in 0..40 {
            view.handle_key(KeyEvent::new(KeyCode::PageDown));
        }
        assert_eq!(view.viewport().scroll_y, 480);
        view.render(buf.bounds(), &mut buf);
        assert_eq!(buf.row_text(19), "row 499");
    }

    #[test]
    fn horizontal_scroll() {
        let mut view = TextView::from_text("t", "abcdefghij", ColorTag::DEFAULT);
        let mut buf = Buffer::new(4, 1);
        view.render(buf.bounds(), &mut buf);
        view.handle_key(KeyEvent::new(KeyCode::End));
        view.render(buf.bounds(), &mut buf);
        assert_eq!(buf.row_text(0), "ghij");
        view.handle_key(KeyEvent::new(KeyCode::Left));
        view.render(buf.bounds(), &mut buf);
        assert_eq!(buf.row_text(0), "fghi");
    }

    #[test]
    fn empty_view_can_hide() {
        let view = TextView::new("empty", Vec::new()).hide_when_empty();
        assert!(!view.is_showable());
        let view = TextView::from_text("x", "y", ColorTag::DEFAULT).hide_when_empty();
        assert!(view.is_showable());
    }
}
