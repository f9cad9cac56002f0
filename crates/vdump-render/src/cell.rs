#![forbid(unsafe_code)]

//! A single terminal cell.

use crate::color::ColorTag;

bitflags::bitflags! {
    /// Per-cell attribute flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        /// Bold text.
        const BOLD = 0b0001;
        /// Reverse video (used for the cursor row).
        const REVERSE = 0b0010;
        /// Trailing half of a wide character; never printed on its own.
        const CONTINUATION = 0b0100;
    }
}

/// One cell of a [`Buffer`](crate::buffer::Buffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The character shown in this cell.
    pub ch: char,
    /// Palette color.
    pub color: ColorTag,
    /// Attribute flags.
    pub flags: CellFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

impl Cell {
    /// An empty cell in the default color.
    pub const BLANK: Cell = Cell {
        ch: ' ',
        color: ColorTag::DEFAULT,
        flags: CellFlags::empty(),
    };

    /// Create a cell from a character in the default color.
    #[must_use]
    pub const fn from_char(ch: char) -> Self {
        Self {
            ch,
            color: ColorTag::DEFAULT,
            flags: CellFlags::empty(),
        }
    }

    /// Set the color.
    #[must_use]
    pub const fn with_color(mut self, color: ColorTag) -> Self {
        self.color = color;
        self
    }

    /// Set the attribute flags.
    #[must_use]
    pub const fn with_flags(mut self, flags: CellFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Continuation cell following a wide character.
    #[must_use]
    pub const fn continuation(color: ColorTag) -> Self {
        Self {
            ch: ' ',
            color,
            flags: CellFlags::CONTINUATION,
        }
    }

    /// Whether this cell is the trailing half of a wide character.
    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        self.flags.contains(CellFlags::CONTINUATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn default_is_blank() {
        assert_eq!(Cell::default(), Cell::BLANK);
        assert!(!Cell::BLANK.is_continuation());
    }

    #[test]
    fn builder_methods() {
        let cell = Cell::from_char('x')
            .with_color(Color::Red.tag())
            .with_flags(CellFlags::BOLD);
        assert_eq!(cell.ch, 'x');
        assert_eq!(cell.color, Color::Red.tag());
        assert!(cell.flags.contains(CellFlags::BOLD));
    }

    #[test]
    fn continuation_flag() {
        assert!(Cell::continuation(ColorTag::DEFAULT).is_continuation());
    }
}
