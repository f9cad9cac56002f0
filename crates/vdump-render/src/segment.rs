#![forbid(unsafe_code)]

//! Colored text runs and lines.

use smallvec::SmallVec;

use crate::canvas::Canvas;
use crate::color::ColorTag;
use crate::display_width;

/// A run of text in one palette color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The color of the run.
    pub color: ColorTag,
    /// The text; never contains a newline.
    pub text: String,
}

impl Segment {
    /// Create a segment.
    #[must_use]
    pub fn new(color: impl Into<ColorTag>, text: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            text: text.into(),
        }
    }

    /// Display width in columns.
    #[must_use]
    pub fn width(&self) -> usize {
        display_width(&self.text)
    }
}

/// One rendered line made of colored segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    segments: SmallVec<[Segment; 4]>,
}

impl Line {
    /// An empty line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A line holding a single segment.
    #[must_use]
    pub fn from_segment(color: impl Into<ColorTag>, text: impl Into<String>) -> Self {
        let mut line = Self::new();
        line.push(color, text);
        line
    }

    /// Append a segment. Empty text is dropped.
    pub fn push(&mut self, color: impl Into<ColorTag>, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.segments.push(Segment::new(color, text));
        }
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, color: impl Into<ColorTag>, text: impl Into<String>) -> Self {
        self.push(color, text);
        self
    }

    /// The segments of this line.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Display width in columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.segments.iter().map(Segment::width).sum()
    }

    /// The uncolored text of this line.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Print every segment at the canvas pen (no trailing newline).
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for seg in &self.segments {
            canvas.print_segment(&seg.text, seg.color);
        }
    }

    /// Replace the color of every segment.
    #[must_use]
    pub fn recolored(&self, color: ColorTag) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .map(|s| Segment::new(color, s.text.clone()))
                .collect(),
        }
    }
}
