#![forbid(unsafe_code)]

//! The fixed inspector palette.
//!
//! Eight base colors, each with a "highlighted" variant selected by adding
//! [`HIGHLIGHT_OFFSET`] to the base index. Higher-level code only ever deals
//! in [`ColorTag`]s; escape sequences are produced by the presenter.

/// Offset added to a base color index to select its highlighted variant.
pub const HIGHLIGHT_OFFSET: u8 = 8;

/// Base palette colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Color {
    /// Terminal default foreground.
    #[default]
    Default = 0,
    /// Red.
    Red = 1,
    /// Green.
    Green = 2,
    /// Yellow.
    Yellow = 3,
    /// Blue.
    Blue = 4,
    /// Magenta.
    Magenta = 5,
    /// Cyan.
    Cyan = 6,
    /// White.
    White = 7,
}

impl Color {
    /// All base colors in index order.
    pub const ALL: [Color; 8] = [
        Color::Default,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
    ];

    /// Raw palette index (0-7).
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Plain tag for this color.
    #[must_use]
    pub const fn tag(self) -> ColorTag {
        ColorTag(self as u8)
    }

    /// Highlighted tag for this color.
    #[must_use]
    pub const fn highlighted(self) -> ColorTag {
        ColorTag(self as u8 + HIGHLIGHT_OFFSET)
    }

    fn to_crossterm(self) -> crossterm::style::Color {
        use crossterm::style::Color as Ct;
        match self {
            Color::Default => Ct::Reset,
            Color::Red => Ct::DarkRed,
            Color::Green => Ct::DarkGreen,
            Color::Yellow => Ct::DarkYellow,
            Color::Blue => Ct::DarkBlue,
            Color::Magenta => Ct::DarkMagenta,
            Color::Cyan => Ct::DarkCyan,
            Color::White => Ct::Grey,
        }
    }
}

/// An inline color marker carried by text segments and cells.
///
/// Values `0..8` are base colors, `8..16` their highlighted variants. Indices
/// outside the palette wrap into it, so a tag is always renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorTag(u8);

impl ColorTag {
    /// Terminal default color.
    pub const DEFAULT: ColorTag = Color::Default.tag();

    /// Color used for search matches.
    pub const MATCH: ColorTag = Color::Yellow.highlighted();

    /// Color used for the alias row after an alias jump.
    pub const ALIAS_SOURCE: ColorTag = Color::Magenta.highlighted();

    /// Color used for the original row after an alias jump.
    pub const ALIAS_TARGET: ColorTag = Color::Cyan.highlighted();

    /// Build a tag from a raw palette index.
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        Self(index % (HIGHLIGHT_OFFSET * 2))
    }

    /// Raw palette index (0-15).
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// The base color of this tag.
    #[must_use]
    pub const fn base(self) -> Color {
        Color::ALL[(self.0 % HIGHLIGHT_OFFSET) as usize]
    }

    /// Whether this is a highlighted variant.
    #[must_use]
    pub const fn is_highlighted(self) -> bool {
        self.0 >= HIGHLIGHT_OFFSET
    }

    /// The highlighted variant of this tag (idempotent).
    #[must_use]
    pub const fn highlight(self) -> Self {
        self.base().highlighted()
    }

    /// Foreground/background pair for this tag.
    ///
    /// Highlighted variants draw black text on the base color; the highlighted
    /// default color is plain reverse video and reports `None`.
    #[must_use]
    pub fn terminal_colors(self) -> Option<(crossterm::style::Color, crossterm::style::Color)> {
        let base = self.base();
        if !self.is_highlighted() {
            return Some((base.to_crossterm(), crossterm::style::Color::Reset));
        }
        match base {
            Color::Default => None,
            other => Some((crossterm::style::Color::Black, other.to_crossterm())),
        }
    }
}

impl From<Color> for ColorTag {
    fn from(color: Color) -> Self {
        color.tag()
    }
}
