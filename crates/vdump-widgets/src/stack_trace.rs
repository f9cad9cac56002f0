#![forbid(unsafe_code)]

//! Call-stack listing.

use serde::{Deserialize, Serialize};
use vdump_core::event::KeyEvent;
use vdump_core::geometry::Rect;
use vdump_render::buffer::Buffer;
use vdump_render::segment::Line;

use crate::View;
use crate::format::{IDENT, KEY, NUMBER, PUNCT, STRING};
use crate::text_view::TextView;

/// One frame of a pre-captured call stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    /// Function or method name.
    pub function: String,
    /// Source file, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Source line, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl StackFrame {
    /// A frame with no location.
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            file: None,
            line: None,
        }
    }

    /// Attach a source location.
    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// `#index function at file:line`.
    #[must_use]
    pub fn to_line(&self, index: usize) -> Line {
        let mut out = Line::new()
            .with(IDENT, format!("#{index} "))
            .with(KEY, self.function.clone());
        if let Some(file) = &self.file {
            out.push(PUNCT, " at ");
            out.push(STRING, file.clone());
            if let Some(line) = self.line {
                out.push(PUNCT, ":");
                out.push(NUMBER, line.to_string());
            }
        }
        out
    }
}

/// The stack trace view: numbered frames, innermost first.
#[derive(Debug)]
pub struct StackTraceView {
    frames: Vec<StackFrame>,
    text: TextView,
}

impl StackTraceView {
    /// Create a view over `frames`.
    pub fn new(label: impl Into<String>, frames: Vec<StackFrame>) -> Self {
        let lines = frames
            .iter()
            .enumerate()
            .map(|(i, frame)| frame.to_line(i))
            .collect();
        Self {
            frames,
            text: TextView::new(label, lines),
        }
    }

    /// The frames shown.
    #[must_use]
    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }
}

impl View for StackTraceView {
    fn label(&self) -> &str {
        self.text.label()
    }

    fn is_showable(&self) -> bool {
        !self.frames.is_empty()
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
