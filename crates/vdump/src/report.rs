#![forbid(unsafe_code)]

//! Error reports.
//!
//! An [`ErrorReport`] carries everything needed to inspect a failure after
//! the fact: class name, message, origin, a pre-captured stack trace, the
//! chain of underlying causes and an optional snapshot of context values.
//! It serializes with serde so reports can be written by one process and
//! inspected by another.

use serde::{Deserialize, Serialize};
use vdump_render::color::Color;
use vdump_render::segment::Line;
use vdump_snapshot::{Inspect, Snapshot, snapshot};
use vdump_widgets::StackFrame;

use crate::session::DumpSession;

/// A captured error with its trace and context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error type name.
    pub class: String,
    /// Human-readable message.
    pub message: String,
    /// Source file the error was raised in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Source line the error was raised at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Call stack, innermost frame first.
    #[serde(default)]
    pub trace: Vec<StackFrame>,
    /// Messages of the underlying causes, outermost first.
    #[serde(default)]
    pub causes: Vec<String>,
    /// Values captured alongside the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Snapshot>,
}

impl ErrorReport {
    /// A report with a class and message and nothing else.
    pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            message: message.into(),
            file: None,
            line: None,
            trace: Vec::new(),
            causes: Vec::new(),
            context: None,
        }
    }

    /// Build a report from an error value and its `source()` chain.
    ///
    /// The class is the unqualified type name of `E`.
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        let full = std::any::type_name::<E>();
        let path = full.split('<').next().unwrap_or(full);
        let class = path.rsplit("::").next().unwrap_or(path);
        let mut report = Self::new(class, err.to_string());
        let mut source = err.source();
        while let Some(cause) = source {
            report.causes.push(cause.to_string());
            source = cause.source();
        }
        report
    }

    /// Record where the error was raised.
    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Attach a stack trace.
    #[must_use]
    pub fn with_trace(mut self, frames: Vec<StackFrame>) -> Self {
        self.trace = frames;
        self
    }

    /// Snapshot `value` as the report context.
    ///
    /// The snapshot is taken now; later changes to `value` are not seen.
    #[must_use]
    pub fn with_context<T: Inspect + ?Sized>(mut self, value: &T) -> Self {
        self.context = Some(snapshot(value));
        self
    }

    /// Class, message, origin and causes as colored lines.
    #[must_use]
    pub fn description(&self) -> Vec<Line> {
        let mut lines = vec![
            Line::from_segment(Color::Red, self.class.clone()),
            Line::new(),
        ];
        lines.extend(
            self.message
                .lines()
                .map(|text| Line::from_segment(Color::Default, text)),
        );
        if let Some(file) = &self.file {
            let mut origin = Line::new()
                .with(Color::Default, "in ")
                .with(Color::Yellow, file.clone());
            if let Some(line) = self.line {
                origin.push(Color::Default, ":");
                origin.push(Color::Blue, line.to_string());
            }
            lines.push(Line::new());
            lines.push(origin);
        }
        for cause in &self.causes {
            lines.push(
                Line::new()
                    .with(Color::Magenta, "caused by: ")
                    .with(Color::Default, cause.clone()),
            );
        }
        lines
    }

    /// A session showing the description, the context dump and the trace.
    #[must_use]
    pub fn into_session(self) -> DumpSession {
        let description = self.description();
        let mut session = match self.context {
            Some(context) => DumpSession::from_snapshot(context).context_label("Context"),
            None => DumpSession::without_value(),
        };
        session = session.name(self.class).description(description);
        session.stack_trace(self.trace)
    }
}
