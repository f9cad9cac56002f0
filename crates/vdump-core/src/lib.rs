#![forbid(unsafe_code)]

//! Core: terminal lifecycle, key events, configuration and logging.

pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod terminal_session;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
