#![forbid(unsafe_code)]

//! Render kernel: palette, cells, buffers, canvases, diffs and presentation.

pub mod buffer;
pub mod canvas;
pub mod cell;
pub mod color;
pub mod diff;
pub mod presenter;
pub mod segment;

/// Display width of a single character in terminal columns.
///
/// Control characters and zero-width code points report 0 and are never
/// written to a cell.
#[inline]
pub fn char_width(c: char) -> usize {
    if c.is_control() {
        return 0;
    }
    unicode_width::UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Display width of a string in terminal columns, ignoring newlines.
#[inline]
pub fn display_width(text: &str) -> usize {
    if text.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
        return text.len();
    }
    text.chars().map(char_width).sum()
}
