#![forbid(unsafe_code)]

//! Title bar and footer.

use vdump_core::config::KeyConfig;
use vdump_core::geometry::Rect;
use vdump_render::buffer::Buffer;
use vdump_render::cell::{Cell, CellFlags};
use vdump_render::color::{Color, ColorTag};

/// Screen areas: title row, content, footer row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeLayout {
    /// Top row.
    pub title: Rect,
    /// Everything between title and footer.
    pub content: Rect,
    /// Bottom row.
    pub footer: Rect,
}

impl ChromeLayout {
    /// Split `screen` into title, content and footer.
    ///
    /// On a screen shorter than three rows the content gets what is left,
    /// possibly nothing.
    #[must_use]
    pub fn new(screen: Rect) -> Self {
        let (title, rest) = screen.split_top(1);
        let (content, footer) = rest.split_bottom(1);
        Self {
            title,
            content,
            footer,
        }
    }
}

/// Key legend for the global keys.
#[must_use]
pub fn key_legend(keys: &KeyConfig) -> String {
    format!(
        "{}:Quit Tab:Next S-Tab:Prev {}:Views",
        keys.quit, keys.view_list
    )
}

fn bar(buf: &mut Buffer, area: Rect, text: &str, color: ColorTag) {
    if area.is_empty() {
        return;
    }
    buf.fill(area, Cell::BLANK.with_flags(CellFlags::REVERSE));
    buf.print_with_flags(
        area.x,
        area.y,
        text,
        color,
        CellFlags::REVERSE | CellFlags::BOLD,
        area.right(),
    );
}

/// Draw the title bar: static context plus the current view label.
pub fn render_title(buf: &mut Buffer, area: Rect, context: &str, label: &str) {
    let text = if context.is_empty() {
        format!(" {label}")
    } else {
        format!(" {context} | {label}")
    };
    bar(buf, area, &text, Color::Default.tag());
}

/// Draw the footer: global key legend, then view-specific hints.
pub fn render_footer(buf: &mut Buffer, area: Rect, legend: &str, hints: &str) {
    let text = if hints.is_empty() {
        format!(" {legend}")
    } else {
        format!(" {legend}  {hints}")
    };
    bar(buf, area, &text, Color::Default.tag());
}
