#![forbid(unsafe_code)]

//! vdump public facade.
//!
//! Snapshot any [`Inspect`] value and browse it in a full-screen terminal
//! inspector:
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use vdump::prelude::*;
//!
//! let config: BTreeMap<&str, i64> = [("retries", 3), ("timeout", 30)].into();
//! DumpSession::new(&config).name("config").run()?;
//! # Ok::<(), vdump::Error>(())
//! ```
//!
//! When no terminal is attached, [`render_plain`] gives the same tree as
//! text with every node expanded.

pub mod plain;
pub mod report;
pub mod session;

use std::fmt;
use std::io;

// --- Core re-exports -------------------------------------------------------

pub use vdump_core::config::{ConfigError, InspectorConfig, KeyConfig};
pub use vdump_core::error::TerminalError;
pub use vdump_core::event::{Event, KeyCode, KeyEvent, Modifiers};
pub use vdump_core::geometry::Rect;

// --- Snapshot re-exports ---------------------------------------------------

pub use vdump_snapshot::{
    ContainerRef, Field, Inspect, Key, NodeIdentity, NodeKind, RecordRef, Snapshot,
    SnapshotBuilder, SnapshotNode, SnapshotStats, TypeLayer, Value, Visibility, snapshot,
};

// --- Render re-exports -----------------------------------------------------

pub use vdump_render::buffer::Buffer;

// --- Widget re-exports -----------------------------------------------------

pub use vdump_widgets::{
    ProfileRecord, StackFrame, StackTraceView, TableRow, TableView, TextView, Timing,
    VarDumpView, View, ViewOptions,
};

// --- Runtime re-exports ----------------------------------------------------

pub use vdump_runtime::{Program, Screen, ScreenAction};

// --- Facade ----------------------------------------------------------------

pub use plain::{dump_to_string, render_plain};
pub use report::ErrorReport;
pub use session::DumpSession;

/// Errors from starting or running an inspector session.
#[derive(Debug)]
pub enum Error {
    /// Plain I/O failure (log file, output writer).
    Io(io::Error),
    /// The terminal could not be used.
    Terminal(TerminalError),
    /// The configuration could not be loaded.
    Config(ConfigError),
}

impl Error {
    /// Whether the failure only means no terminal was attached.
    #[must_use]
    pub fn is_not_a_terminal(&self) -> bool {
        matches!(self, Self::Terminal(TerminalError::NotATerminal))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Terminal(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Terminal(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<TerminalError> for Error {
    fn from(err: TerminalError) -> Self {
        Self::Terminal(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for vdump APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything needed to snapshot and inspect a value.
pub mod prelude {
    pub use crate::{
        ContainerRef, DumpSession, Error, ErrorReport, Inspect, InspectorConfig, RecordRef,
        Result, StackFrame, Value, View, render_plain, snapshot,
    };

    pub use crate::{core, render, runtime, widgets};
}

pub use vdump_core as core;
pub use vdump_render as render;
pub use vdump_runtime as runtime;
pub use vdump_snapshot as snapshot_model;
pub use vdump_widgets as widgets;
