#![forbid(unsafe_code)]

//! Buffer grid storage.
//!
//! A `Buffer` is a 2D grid of [`Cell`]s. The screen frame is one buffer;
//! every scrollable view also owns one as its off-screen "pad", which is then
//! copied into the frame with [`Buffer::blit`].
//!
//! # Layout
//!
//! Cells are stored in row-major order: `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height are at least 1 and never change after creation
//! 3. A wide character is always followed by a continuation cell on the same row

use crate::cell::{Cell, CellFlags};
use crate::char_width;
use crate::color::ColorTag;
use vdump_core::geometry::Rect;

/// A 2D grid of terminal cells.
///
/// # Example
///
/// ```
/// use vdump_render::buffer::Buffer;
/// use vdump_render::color::ColorTag;
///
/// let mut buffer = Buffer::new(10, 2);
/// buffer.print(0, 0, "Hi", ColorTag::DEFAULT, 10);
/// assert_eq!(buffer.row_text(0), "Hi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a new blank buffer.
    ///
    /// Zero extents are clamped to 1 so a buffer is never empty.
    pub fn new(width: u16, height: u16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
        }
    }

    /// Buffer width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Bounding rect of the entire buffer.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Get a reference to the cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Get a mutable reference to the cell at (x, y).
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Set the cell at (x, y). Out-of-bounds writes are ignored.
    ///
    /// Overwriting either half of a wide character blanks the other half.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(idx) = self.index(x, y) else { return };
        let current = self.cells[idx];
        if current.is_continuation() && !cell.is_continuation() && x > 0 {
            self.cells[idx - 1] = Cell::BLANK;
        } else if !current.is_continuation()
            && char_width(current.ch) > 1
            && let Some(tail) = self.index(x + 1, y)
            && self.cells[tail].is_continuation()
        {
            self.cells[tail] = Cell::BLANK;
        }
        self.cells[idx] = cell;
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Fill a rectangle (clipped to the buffer) with `cell`.
    pub fn fill(&mut self, area: Rect, cell: Cell) {
        let area = area.intersection(&self.bounds());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Print `text` starting at (x, y), stopping before `max_x`.
    ///
    /// Returns the x position after the last written cell. A wide character
    /// that does not fit entirely is not written.
    pub fn print(&mut self, x: u16, y: u16, text: &str, color: ColorTag, max_x: u16) -> u16 {
        self.print_with_flags(x, y, text, color, CellFlags::empty(), max_x)
    }

    /// Like [`print`](Self::print) with explicit attribute flags.
    pub fn print_with_flags(
        &mut self,
        mut x: u16,
        y: u16,
        text: &str,
        color: ColorTag,
        flags: CellFlags,
        max_x: u16,
    ) -> u16 {
        let max_x = max_x.min(self.width);
        for ch in text.chars() {
            let w = char_width(ch) as u16;
            if w == 0 {
                continue;
            }
            if x.saturating_add(w) > max_x {
                break;
            }
            self.set(
                x,
                y,
                Cell::from_char(ch).with_color(color).with_flags(flags),
            );
            if w == 2 {
                self.set(x + 1, y, Cell::continuation(color));
            }
            x += w;
        }
        x
    }

    /// Add `flags` to every cell of row `y`.
    pub fn add_row_flags(&mut self, y: u16, flags: CellFlags) {
        if y >= self.height {
            return;
        }
        let start = y as usize * self.width as usize;
        for cell in &mut self.cells[start..start + self.width as usize] {
            cell.flags |= flags;
        }
    }

    /// Copy `src` into this buffer with its top-left corner at (`x`, `y`),
    /// clipped to `clip` and to the buffer bounds.
    pub fn blit(&mut self, src: &Buffer, x: u16, y: u16, clip: Rect) {
        let clip = clip.intersection(&self.bounds());
        for sy in 0..src.height {
            let dy = y.saturating_add(sy);
            if dy < clip.y || dy >= clip.bottom() {
                continue;
            }
            for sx in 0..src.width {
                let dx = x.saturating_add(sx);
                if dx < clip.x || dx >= clip.right() {
                    continue;
                }
                if let Some(cell) = src.get(sx, sy) {
                    self.set(dx, dy, *cell);
                }
            }
        }
    }

    /// The visible text of row `y`, with trailing blanks trimmed.
    ///
    /// Intended for tests and plain-text snapshots.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let mut out = String::with_capacity(self.width as usize);
        for x in 0..self.width {
            if let Some(cell) = self.get(x, y)
                && !cell.is_continuation()
            {
                out.push(cell.ch);
            }
        }
        out.truncate(out.trim_end().len());
        out
    }

    /// Row-major iterator over `(x, y, cell)`.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, &Cell)> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i % width) as u16, (i / width) as u16, cell))
    }
}
