#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! RAII management of raw mode and the alternate screen, with cleanup on drop,
//! on panic, and on SIGINT/SIGTERM.
//!
//! # Lifecycle Guarantees
//!
//! 1. **Capability check first** - [`TerminalSession::new`] refuses to start
//!    when stdin/stdout are not interactive terminals, before touching any
//!    terminal state. Callers fall back to a non-interactive renderer.
//! 2. **Drop restores previous state** - enabled modes are disabled in reverse
//!    order when the session is dropped.
//! 3. **Panic safety** - a panic hook performs best-effort cleanup before the
//!    previous hook prints the panic message.
//!
//! # Cleanup Order
//!
//! 1. Show cursor (always)
//! 2. Leave alternate screen (if enabled)
//! 3. Exit raw mode (always)
//! 4. Flush stdout
//!
//! # Usage
//!
//! ```no_run
//! use vdump_core::terminal_session::{SessionOptions, TerminalSession};
//!
//! let session = TerminalSession::new(SessionOptions {
//!     alternate_screen: true,
//! })?;
//! let (width, height) = session.size()?;
//! // ... render, then block on session.read_event() ...
//! # Ok::<(), vdump_core::error::TerminalError>(())
//! ```

use std::io::{self, IsTerminal, Write};
use std::sync::OnceLock;

use crate::error::TerminalError;
use crate::event::{Event, KeyEventKind};

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Terminal session configuration options.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Enable alternate screen buffer (`CSI ? 1049 h`).
    ///
    /// The original screen and scrollback are restored on exit.
    pub alternate_screen: bool,
}

/// A terminal session that manages raw mode and cleanup.
///
/// # Contract
///
/// - **Exclusive ownership**: only one `TerminalSession` should exist at a time.
/// - **Raw mode entry**: creating a session enters raw/no-echo mode and hides
///   the cursor.
/// - **Cleanup guarantee**: dropping the session restores the terminal.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    alternate_screen_enabled: bool,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enter raw mode and optionally the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns [`TerminalError::NotATerminal`] when stdin or stdout is not a
    /// terminal, and an I/O error if raw mode cannot be enabled.
    pub fn new(options: SessionOptions) -> Result<Self, TerminalError> {
        if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
            #[cfg(feature = "tracing")]
            tracing::warn!("refusing to start terminal session: not a tty");
            return Err(TerminalError::NotATerminal);
        }

        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        #[cfg(feature = "tracing")]
        tracing::info!("terminal raw mode enabled");

        let mut session = Self {
            options: options.clone(),
            alternate_screen_enabled: false,
            #[cfg(unix)]
            signal_guard: None,
        };
        #[cfg(unix)]
        {
            session.signal_guard = Some(SignalGuard::new()?);
        }

        let mut stdout = io::stdout();
        if options.alternate_screen {
            crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
            session.alternate_screen_enabled = true;
            #[cfg(feature = "tracing")]
            tracing::info!("alternate screen enabled");
        }
        crossterm::execute!(stdout, crossterm::cursor::Hide)?;

        Ok(session)
    }

    /// Get the current terminal size (columns, rows).
    ///
    /// Zero extents are clamped to 1 so downstream buffers are never empty.
    pub fn size(&self) -> Result<(u16, u16), TerminalError> {
        let (width, height) = crossterm::terminal::size()?;
        Ok((width.max(1), height.max(1)))
    }

    /// Read the next event, blocking until one is available.
    ///
    /// Key releases and events the inspector ignores are skipped, so the
    /// returned event is always actionable.
    pub fn read_event(&self) -> Result<Event, TerminalError> {
        loop {
            let raw = crossterm::event::read()?;
            match Event::from_crossterm(raw) {
                Some(Event::Key(key)) if key.kind == KeyEventKind::Release => continue,
                Some(event) => return Ok(event),
                None => continue,
            }
        }
    }

    /// Get the session options.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    fn cleanup(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();

        let mut stdout = io::stdout();
        let _ = crossterm::execute!(stdout, crossterm::cursor::Show);

        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
            #[cfg(feature = "tracing")]
            tracing::info!("alternate screen disabled");
        }

        let _ = crossterm::terminal::disable_raw_mode();
        #[cfg(feature = "tracing")]
        tracing::info!("terminal raw mode disabled");

        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            if let Some(signal) = signals.forever().next() {
                #[cfg(feature = "tracing")]
                tracing::warn!(signal, "termination signal received, cleaning up");
                best_effort_cleanup();
                std::process::exit(128 + signal);
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_options_default_is_inline() {
        let opts = SessionOptions::default();
        assert!(!opts.alternate_screen);
    }

    // Sessions that actually enter raw mode are not exercised here: the test
    // runner's stdout is usually captured, which is exactly the NotATerminal
    // path below.
    #[test]
    fn refuses_without_tty() {
        if io::stdout().is_terminal() && io::stdin().is_terminal() {
            return;
        }
        let err = TerminalSession::new(SessionOptions::default()).unwrap_err();
        assert!(matches!(err, TerminalError::NotATerminal));
    }
}
