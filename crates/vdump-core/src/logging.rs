#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! This module re-exports the tracing macros when the `tracing` feature is
//! enabled. When the feature is disabled, no-op macros are provided so call
//! sites compile unchanged.
//!
//! The terminal is owned by the inspector while a session runs, so log output
//! never goes to stdout. [`init_file_logging`] routes events to a file instead.

#[cfg(feature = "tracing")]
pub use tracing::{debug, error, info, trace, warn};

#[cfg(feature = "tracing")]
use std::io;
#[cfg(feature = "tracing")]
use std::path::Path;

/// Environment variable consulted for the log filter (`RUST_LOG` syntax).
pub const LOG_ENV: &str = "VDUMP_LOG";

/// Install a global subscriber that appends to `path`.
///
/// The filter comes from [`LOG_ENV`] when set, otherwise `default_filter`.
/// With the `tracing-json` feature, each event is written as one JSON line.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a global subscriber is
/// already installed.
#[cfg(feature = "tracing")]
pub fn init_file_logging(path: &Path, default_filter: &str) -> io::Result<()> {
    use std::fs::OpenOptions;
    use std::sync::Mutex;
    use tracing_subscriber::EnvFilter;

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    #[cfg(feature = "tracing-json")]
    let result = builder.json().try_init();
    #[cfg(not(feature = "tracing-json"))]
    let result = builder.try_init();

    result.map_err(io::Error::other)
}

// When tracing is not enabled, provide no-op macros
#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op error macro when tracing is disabled.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    /// No-op info macro when tracing is disabled.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op warn macro when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

#[cfg(all(test, feature = "tracing"))]
mod tests {
    use super::*;

    #[test]
    fn init_file_logging_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("vdump.log");
        assert!(init_file_logging(&path, "info").is_err());
    }
}
