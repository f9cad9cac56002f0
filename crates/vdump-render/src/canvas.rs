#![forbid(unsafe_code)]

//! Drawing surfaces for scrollable content.
//!
//! View-specific draw routines never address the terminal directly. They
//! move a pen over a *virtual* canvas (unbounded rows and columns) through
//! the [`Canvas`] trait, and the same routine runs against two surfaces:
//!
//! - [`LineAccumulator`] (measurement mode): records how many rows and columns
//!   the content occupies, optionally keeping the plain text of every row.
//! - [`PadCanvas`] (live mode): writes into a [`Buffer`] that covers a window
//!   of the virtual canvas, discarding everything outside it.
//!
//! Because the window is known up front, draw routines may call
//! [`Canvas::skip_rows`] for content entirely outside [`Canvas::window`]
//! instead of printing it.

use std::ops::Range;

use crate::buffer::Buffer;
use crate::cell::{Cell, CellFlags};
use crate::char_width;
use crate::color::ColorTag;

/// A pen-based drawing surface over a virtual canvas.
pub trait Canvas {
    /// Print `text` at the pen in `color` and advance the pen.
    ///
    /// A `'\n'` in `text` moves the pen to column 0 of the next row.
    fn print_segment(&mut self, text: &str, color: ColorTag);

    /// Terminate the current row and move the pen to column 0 of the next.
    fn new_line(&mut self);

    /// Advance the pen by `rows` rows without drawing, ending at column 0.
    fn skip_rows(&mut self, rows: usize);

    /// Current pen row.
    fn row(&self) -> usize;

    /// Current pen column (display columns).
    fn col(&self) -> usize;

    /// Rows that are actually stored by this surface.
    fn window(&self) -> Range<usize> {
        0..usize::MAX
    }

    /// Whether this is a measurement pass.
    fn is_measuring(&self) -> bool;

    /// Announce that subsequent output belongs to the element `element`.
    ///
    /// Surfaces that do not care about ownership ignore this.
    fn begin_element(&mut self, _element: usize) {}
}

/// Measurement-mode canvas.
///
/// Tracks the extent of everything drawn. With [`capturing`](Self::capturing)
/// it also keeps the plain text of every row, which the non-interactive
/// renderer uses as its output.
#[derive(Debug, Clone, Default)]
pub struct LineAccumulator {
    row: usize,
    col: usize,
    rows: usize,
    width: usize,
    capture: bool,
    lines: Vec<String>,
}

impl LineAccumulator {
    /// A measuring canvas that keeps no text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A measuring canvas that keeps the text of every row.
    #[must_use]
    pub fn capturing() -> Self {
        Self {
            capture: true,
            ..Self::default()
        }
    }

    /// Number of rows touched so far (a terminated empty row counts).
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows
    }

    /// Widest row so far, in columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Captured rows (empty unless created with [`capturing`](Self::capturing)).
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consume the canvas, returning captured rows.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    fn touch_row(&mut self) {
        self.rows = self.rows.max(self.row + 1);
        if self.capture {
            while self.lines.len() <= self.row {
                self.lines.push(String::new());
            }
        }
    }

    fn print_piece(&mut self, piece: &str) {
        self.touch_row();
        let mut added = 0;
        for ch in piece.chars() {
            added += char_width(ch);
        }
        if self.capture {
            let line = &mut self.lines[self.row];
            line.extend(piece.chars().filter(|c| char_width(*c) > 0));
        }
        self.col += added;
        self.width = self.width.max(self.col);
    }
}

impl Canvas for LineAccumulator {
    fn print_segment(&mut self, text: &str, _color: ColorTag) {
        for (i, piece) in text.split('\n').enumerate() {
            if i > 0 {
                self.new_line();
            }
            if !piece.is_empty() {
                self.print_piece(piece);
            }
        }
    }

    fn new_line(&mut self) {
        self.touch_row();
        self.row += 1;
        self.col = 0;
    }

    fn skip_rows(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        self.row += rows;
        self.col = 0;
        self.rows = self.rows.max(self.row);
        if self.capture {
            while self.lines.len() < self.row {
                self.lines.push(String::new());
            }
        }
    }

    fn row(&self) -> usize {
        self.row
    }

    fn col(&self) -> usize {
        self.col
    }

    fn is_measuring(&self) -> bool {
        true
    }
}

/// Live-mode canvas writing a window of the virtual canvas into a buffer.
///
/// Virtual cell `(row, col)` lands at buffer cell
/// `(col - origin_col, row - origin_row)` when it is inside the buffer.
#[derive(Debug)]
pub struct PadCanvas<'a> {
    buf: &'a mut Buffer,
    origin_row: usize,
    origin_col: usize,
    row: usize,
    col: usize,
    bold: bool,
}

impl<'a> PadCanvas<'a> {
    /// Create a canvas whose window starts at virtual `(origin_row, origin_col)`.
    pub fn new(buf: &'a mut Buffer, origin_row: usize, origin_col: usize) -> Self {
        Self {
            buf,
            origin_row,
            origin_col,
            row: 0,
            col: 0,
            bold: false,
        }
    }

    /// Draw subsequent text in bold.
    pub fn set_bold(&mut self, bold: bool) {
        self.bold = bold;
    }

    fn print_piece(&mut self, piece: &str, color: ColorTag) {
        let window = self.window();
        let visible_row = window.contains(&self.row);
        let width = self.buf.width() as usize;
        let flags = if self.bold {
            CellFlags::BOLD
        } else {
            CellFlags::empty()
        };
        for ch in piece.chars() {
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if visible_row && self.col >= self.origin_col && self.col + w <= self.origin_col + width
            {
                let x = (self.col - self.origin_col) as u16;
                let y = (self.row - self.origin_row) as u16;
                self.buf.set(
                    x,
                    y,
                    Cell::from_char(ch).with_color(color).with_flags(flags),
                );
                if w == 2 {
                    self.buf.set(x + 1, y, Cell::continuation(color));
                }
            }
            self.col += w;
        }
    }
}

impl Canvas for PadCanvas<'_> {
    fn print_segment(&mut self, text: &str, color: ColorTag) {
        for (i, piece) in text.split('\n').enumerate() {
            if i > 0 {
                self.new_line();
            }
            if !piece.is_empty() {
                self.print_piece(piece, color);
            }
        }
    }

    fn new_line(&mut self) {
        self.row += 1;
        self.col = 0;
    }

    fn skip_rows(&mut self, rows: usize) {
        if rows > 0 {
            self.row += rows;
            self.col = 0;
        }
    }

    fn row(&self) -> usize {
        self.row
    }

    fn col(&self) -> usize {
        self.col
    }

    fn window(&self) -> Range<usize> {
        self.origin_row..self.origin_row + self.buf.height() as usize
    }

    fn is_measuring(&self) -> bool {
        false
    }
}
