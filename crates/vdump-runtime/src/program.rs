#![forbid(unsafe_code)]

//! The blocking event loop.
//!
//! One iteration renders a full frame into a fresh [`Buffer`], writes only
//! the cells that differ from the previous frame, then blocks on a single
//! event read. Nothing runs between reads; there are no timers and no
//! background work.

use std::io::{self, Stdout, Write};

use tracing::{debug, info};
use vdump_core::error::TerminalError;
use vdump_core::event::Event;
use vdump_core::terminal_session::{SessionOptions, TerminalSession};
use vdump_render::buffer::Buffer;
use vdump_render::diff::BufferDiff;
use vdump_render::presenter::Presenter;

use crate::screen::{Screen, ScreenAction};

/// Frame loop over any writer.
#[derive(Debug)]
pub struct Program<W: Write> {
    presenter: Presenter<W>,
    previous: Option<Buffer>,
    frames: u64,
}

impl<W: Write> Program<W> {
    /// A program writing escape sequences to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            presenter: Presenter::new(writer),
            previous: None,
            frames: 0,
        }
    }

    /// Frames presented so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Render `screen` and present it.
    ///
    /// The first frame, and any frame after a size change, is written in
    /// full; later frames only write changed cells.
    pub fn frame(&mut self, screen: &mut Screen) -> io::Result<()> {
        let (width, height) = screen.size();
        let mut buffer = Buffer::new(width, height);
        screen.render(&mut buffer);
        match &self.previous {
            Some(previous)
                if previous.width() == buffer.width() && previous.height() == buffer.height() =>
            {
                let diff = BufferDiff::compute(previous, &buffer);
                self.presenter.present(&buffer, &diff)?;
            }
            _ => self.presenter.present_full(&buffer)?,
        }
        self.previous = Some(buffer);
        self.frames += 1;
        Ok(())
    }

    /// Run until the screen asks to quit or `next_event` fails.
    pub fn run_loop(
        &mut self,
        screen: &mut Screen,
        mut next_event: impl FnMut() -> Result<Event, TerminalError>,
    ) -> Result<(), TerminalError> {
        loop {
            self.frame(screen)?;
            let event = next_event()?;
            if let Event::Resize { width, height } = event {
                debug!(width, height, "terminal resized");
                self.previous = None;
            }
            if screen.handle_event(event) == ScreenAction::Quit {
                break;
            }
        }
        self.presenter.flush()?;
        Ok(())
    }

    /// Give back the writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.presenter.into_inner()
    }
}

/// Run `screen` interactively on the controlling terminal.
///
/// # Errors
///
/// Fails immediately with [`TerminalError::NotATerminal`] when stdin or stdout
/// is not a terminal, so callers can fall back to a plain renderer.
pub fn run(screen: &mut Screen, options: SessionOptions) -> Result<(), TerminalError> {
    let session = TerminalSession::new(options)?;
    let (width, height) = session.size()?;
    screen.resize(width, height);
    info!(width, height, views = screen.view_count(), "session started");
    let mut program: Program<Stdout> = Program::new(io::stdout());
    let result = program.run_loop(screen, || session.read_event());
    info!(frames = program.frames(), "session ended");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdump_core::event::{KeyCode, KeyEvent};
    use vdump_widgets::TextView;
    use vdump_render::color::ColorTag;

    fn screen() -> Screen {
        let mut screen = Screen::new("ctx")
            .with_view(Box::new(TextView::from_text("One", "first view", ColorTag::DEFAULT)))
            .with_view(Box::new(TextView::from_text("Two", "second view", ColorTag::DEFAULT)));
        screen.resize(40, 6);
        screen
    }

    fn scripted(events: Vec<Event>) -> impl FnMut() -> Result<Event, TerminalError> {
        let mut events = events.into_iter();
        move || {
            events
                .next()
                .ok_or_else(|| TerminalError::Io(io::Error::other("script exhausted")))
        }
    }

    #[test]
    fn loop_renders_until_quit() {
        let mut screen = screen();
        let mut program = Program::new(Vec::new());
        let events = vec![
            Event::Key(KeyEvent::new(KeyCode::Tab)),
            Event::Key(KeyEvent::new(KeyCode::Char('q'))),
        ];
        program.run_loop(&mut screen, scripted(events)).unwrap();
        assert_eq!(program.frames(), 2);
        assert_eq!(screen.current_label(), Some("Two"));
        let output = String::from_utf8(program.into_inner().unwrap()).unwrap();
        assert!(output.contains("first view"));
        assert!(output.contains("second view"));
    }

    #[test]
    fn unchanged_frame_writes_little() {
        let mut screen = screen();
        let mut program = Program::new(Vec::new());
        program.frame(&mut screen).unwrap();
        let first = program.into_inner().unwrap().len();

        let mut program = Program::new(Vec::new());
        program.frame(&mut screen).unwrap();
        program.presenter.flush().unwrap();
        let before = program.presenter.get_ref().len();
        program.frame(&mut screen).unwrap();
        let after = program.into_inner().unwrap().len();
        assert!(after - before < first);
    }

    #[test]
    fn resize_forces_full_redraw() {
        let mut screen = screen();
        let mut program = Program::new(Vec::new());
        let events = vec![
            Event::Resize {
                width: 30,
                height: 4,
            },
            Event::Key(KeyEvent::new(KeyCode::F(10))),
        ];
        program.run_loop(&mut screen, scripted(events)).unwrap();
        assert_eq!(screen.size(), (30, 4));
        let output = String::from_utf8(program.into_inner().unwrap()).unwrap();
        assert_eq!(output.matches("\x1b[2J").count(), 2);
    }

    #[test]
    fn event_errors_propagate() {
        let mut screen = screen();
        let mut program = Program::new(Vec::new());
        let result = program.run_loop(&mut screen, scripted(Vec::new()));
        assert!(matches!(result, Err(TerminalError::Io(_))));
    }
}
