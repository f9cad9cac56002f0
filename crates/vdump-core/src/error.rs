#![forbid(unsafe_code)]

//! Terminal session errors.

use std::fmt;
use std::io;

/// Terminal session and capability errors.
///
/// These are the only failures allowed to prevent an inspector session from
/// starting. Callers are expected to fall back to a non-interactive renderer.
#[derive(Debug)]
pub enum TerminalError {
    /// I/O failure on the terminal.
    Io(io::Error),
    /// Stdin or stdout is not attached to an interactive terminal.
    NotATerminal,
    /// Terminal size query returned invalid dimensions.
    InvalidSize { width: u16, height: u16 },
}

impl fmt::Display for TerminalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "terminal I/O error: {err}"),
            Self::NotATerminal => write!(f, "stdin/stdout is not an interactive terminal"),
            Self::InvalidSize { width, height } => {
                write!(f, "invalid terminal size {width}x{height}")
            }
        }
    }
}

impl std::error::Error for TerminalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TerminalError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
