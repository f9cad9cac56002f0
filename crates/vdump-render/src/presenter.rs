#![forbid(unsafe_code)]

//! Presenter: state-tracked terminal emission.
//!
//! Turns a [`BufferDiff`] into terminal output. The presenter remembers the
//! last style and cursor position it emitted so redundant escape sequences
//! are skipped, and buffers a whole frame before flushing once.
//!
//! ```
//! use vdump_render::buffer::Buffer;
//! use vdump_render::color::ColorTag;
//! use vdump_render::diff::BufferDiff;
//! use vdump_render::presenter::Presenter;
//!
//! let mut presenter = Presenter::new(Vec::new());
//! let old = Buffer::new(10, 1);
//! let mut new = Buffer::new(10, 1);
//! new.print(0, 0, "hi", ColorTag::DEFAULT, 10);
//! presenter.present(&new, &BufferDiff::compute(&old, &new)).unwrap();
//! let bytes = presenter.into_inner().unwrap();
//! assert!(String::from_utf8_lossy(&bytes).contains("hi"));
//! ```

use std::io::{self, BufWriter, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color as CtColor, Print, SetAttribute, SetColors, Colors};
use crossterm::terminal::{Clear, ClearType};

use crate::buffer::Buffer;
use crate::cell::{Cell, CellFlags};
use crate::char_width;
use crate::color::ColorTag;
use crate::diff::BufferDiff;

const BUFFER_CAPACITY: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellStyle {
    color: ColorTag,
    bold: bool,
    reverse: bool,
}

impl CellStyle {
    fn from_cell(cell: &Cell) -> Self {
        Self {
            color: cell.color,
            bold: cell.flags.contains(CellFlags::BOLD),
            reverse: cell.flags.contains(CellFlags::REVERSE),
        }
    }
}

/// State-tracked presenter over any writer.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    current_style: Option<CellStyle>,
    cursor: Option<(u16, u16)>,
}

impl<W: Write> std::fmt::Debug for Presenter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("current_style", &self.current_style)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl<W: Write> Presenter<W> {
    /// Create a presenter writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            current_style: None,
            cursor: None,
        }
    }

    /// Emit the cells named by `diff` from `buffer`, then flush.
    pub fn present(&mut self, buffer: &Buffer, diff: &BufferDiff) -> io::Result<()> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("present", changes = diff.len()).entered();

        for run in diff.runs() {
            self.move_cursor_to(run.x0, run.y)?;
            for x in run.x0..=run.x1 {
                if let Some(cell) = buffer.get(x, run.y) {
                    self.emit_cell(cell)?;
                }
            }
        }
        queue!(self.writer, SetAttribute(Attribute::Reset))?;
        self.current_style = None;
        self.writer.flush()
    }

    /// Clear the terminal and redraw all of `buffer`.
    pub fn present_full(&mut self, buffer: &Buffer) -> io::Result<()> {
        queue!(self.writer, SetAttribute(Attribute::Reset), Clear(ClearType::All))?;
        self.reset();
        self.present(buffer, &BufferDiff::full(buffer))
    }

    fn emit_cell(&mut self, cell: &Cell) -> io::Result<()> {
        if cell.is_continuation() {
            return Ok(());
        }
        self.emit_style(cell)?;
        queue!(self.writer, Print(cell.ch))?;
        if let Some((x, y)) = self.cursor {
            self.cursor = Some((x.saturating_add(char_width(cell.ch).max(1) as u16), y));
        }
        Ok(())
    }

    fn emit_style(&mut self, cell: &Cell) -> io::Result<()> {
        let style = CellStyle::from_cell(cell);
        if self.current_style == Some(style) {
            return Ok(());
        }
        queue!(self.writer, SetAttribute(Attribute::Reset))?;
        let mut reverse = style.reverse;
        match style.color.terminal_colors() {
            Some((fg, bg)) => {
                if fg != CtColor::Reset || bg != CtColor::Reset {
                    queue!(self.writer, SetColors(Colors::new(fg, bg)))?;
                }
            }
            None => reverse = !reverse,
        }
        if style.bold {
            queue!(self.writer, SetAttribute(Attribute::Bold))?;
        }
        if reverse {
            queue!(self.writer, SetAttribute(Attribute::Reverse))?;
        }
        self.current_style = Some(style);
        Ok(())
    }

    fn move_cursor_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        if self.cursor == Some((x, y)) {
            return Ok(());
        }
        queue!(self.writer, MoveTo(x, y))?;
        self.cursor = Some((x, y));
        Ok(())
    }

    /// Forget tracked terminal state (after resize or external output).
    pub fn reset(&mut self) {
        self.current_style = None;
        self.cursor = None;
    }

    /// Flush buffered output.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// The inner writer. Everything presented so far has been flushed to it.
    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    /// Flush and return the inner writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| io::Error::other(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn output(presenter: Presenter<Vec<u8>>) -> String {
        String::from_utf8_lossy(&presenter.into_inner().unwrap()).into_owned()
    }

    #[test]
    fn empty_diff_emits_only_reset() {
        let mut presenter = Presenter::new(Vec::new());
        let buf = Buffer::new(5, 1);
        presenter.present(&buf, &BufferDiff::new()).unwrap();
        let out = output(presenter);
        assert!(!out.contains('H'));
        assert!(out.len() < 10);
    }

    #[test]
    fn single_run_positions_once() {
        let mut presenter = Presenter::new(Vec::new());
        let old = Buffer::new(10, 2);
        let mut new = Buffer::new(10, 2);
        new.print(2, 1, "abc", Color::Red.tag(), 10);
        presenter
            .present(&new, &BufferDiff::compute(&old, &new))
            .unwrap();
        let out = output(presenter);
        assert_eq!(out.matches("\x1b[2;3H").count(), 1);
        assert!(out.contains("abc"));
    }

    #[test]
    fn style_is_not_repeated_within_run() {
        let mut presenter = Presenter::new(Vec::new());
        let old = Buffer::new(10, 1);
        let mut new = Buffer::new(10, 1);
        new.print(0, 0, "aaaa", Color::Green.tag(), 10);
        presenter
            .present(&new, &BufferDiff::compute(&old, &new))
            .unwrap();
        let out = output(presenter);
        assert_eq!(out.matches("aaaa").count(), 1);
    }

    #[test]
    fn continuation_cells_are_skipped() {
        let mut presenter = Presenter::new(Vec::new());
        let mut buf = Buffer::new(4, 1);
        buf.print(0, 0, "日x", ColorTag::DEFAULT, 4);
        presenter.present(&buf, &BufferDiff::full(&buf)).unwrap();
        let out = output(presenter);
        assert!(out.contains("日x"));
    }

    #[test]
    fn full_redraw_clears_first() {
        let mut presenter = Presenter::new(Vec::new());
        let buf = Buffer::new(2, 1);
        presenter.present_full(&buf).unwrap();
        assert!(output(presenter).contains("\x1b[2J"));
    }
}
