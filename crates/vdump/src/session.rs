#![forbid(unsafe_code)]

//! Session builder.
//!
//! [`DumpSession`] snapshots a value when it is created and assembles the
//! views of one inspector session around it:
//!
//! - an optional description (error reports)
//! - the variable dump
//! - a stack trace, hidden when empty
//! - any extra views supplied by the caller
//!
//! [`run`](DumpSession::run) takes over the terminal until the user quits.

use std::io::Write;

use tracing::{debug, info};
use vdump_core::config::InspectorConfig;
use vdump_core::terminal_session::SessionOptions;
use vdump_render::segment::Line;
use vdump_runtime::Screen;
use vdump_snapshot::{Inspect, Snapshot, SnapshotNode, snapshot};
use vdump_widgets::{StackFrame, StackTraceView, TextView, VarDumpView, View, ViewOptions};

use crate::Result;
use crate::plain::{join_lines, render_plain};

const DEFAULT_CONTEXT: &str = "vdump";

/// Set once the first session of the process has installed its subscriber.
#[cfg(feature = "tracing")]
static LOGGING_INSTALLED: std::sync::OnceLock<()> = std::sync::OnceLock::new();

/// Builder for one inspector session.
pub struct DumpSession {
    name: Option<String>,
    description: Vec<Line>,
    root: Option<SnapshotNode>,
    root_label: String,
    frames: Vec<StackFrame>,
    views: Vec<Box<dyn View>>,
    config: InspectorConfig,
}

impl std::fmt::Debug for DumpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DumpSession")
            .field("name", &self.name)
            .field("root_label", &self.root_label)
            .field("frames", &self.frames.len())
            .field("views", &self.views.len())
            .finish_non_exhaustive()
    }
}

impl DumpSession {
    /// Snapshot `value` now and inspect the snapshot.
    pub fn new<T: Inspect + ?Sized>(value: &T) -> Self {
        Self::from_snapshot(snapshot(value))
    }

    /// Inspect an existing snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        debug!(
            nodes = snapshot.stats.nodes,
            aliases = snapshot.stats.aliases,
            "session snapshot"
        );
        Self {
            root: Some(snapshot.root),
            ..Self::without_value()
        }
    }

    pub(crate) fn without_value() -> Self {
        Self {
            name: None,
            description: Vec::new(),
            root: None,
            root_label: "Variables".to_string(),
            frames: Vec::new(),
            views: Vec::new(),
            config: InspectorConfig::default(),
        }
    }

    pub(crate) fn context_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    pub(crate) fn description(mut self, lines: Vec<Line>) -> Self {
        self.description = lines;
        self
    }

    /// Title bar context, e.g. the variable or error name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Show a pre-captured stack trace.
    #[must_use]
    pub fn stack_trace(mut self, frames: Vec<StackFrame>) -> Self {
        self.frames = frames;
        self
    }

    /// Append an extra view after the built-in ones.
    #[must_use]
    pub fn view(mut self, view: Box<dyn View>) -> Self {
        self.views.push(view);
        self
    }

    /// Replace the configuration.
    #[must_use]
    pub fn config(mut self, config: InspectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Assemble the screen without touching the terminal.
    #[must_use]
    pub fn into_screen(mut self) -> Screen {
        self.take_screen()
    }

    fn take_screen(&mut self) -> Screen {
        let context = self.name.clone().unwrap_or_else(|| DEFAULT_CONTEXT.to_string());
        let mut screen = Screen::new(context).with_keys(self.config.keys);
        if !self.description.is_empty() {
            screen.add_view(Box::new(TextView::new("Description", self.description.clone())));
        }
        if let Some(root) = &self.root {
            screen.add_view(Box::new(VarDumpView::new(
                self.root_label.clone(),
                root.clone(),
                ViewOptions::from(&self.config),
            )));
        }
        screen.add_view(Box::new(StackTraceView::new("Stack trace", self.frames.clone())));
        for view in self.views.drain(..) {
            screen.add_view(view);
        }
        screen
    }

    /// Everything the session shows, as plain text with every node expanded.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = join_lines(self.description.iter().map(Line::plain_text).collect());
        if let Some(root) = &self.root {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&render_plain(root, &self.config));
        }
        if !self.frames.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            let lines = self
                .frames
                .iter()
                .enumerate()
                .map(|(i, frame)| frame.to_line(i).plain_text())
                .collect();
            out.push_str(&join_lines(lines));
        }
        out
    }

    /// Run the session on the controlling terminal until the user quits.
    ///
    /// # Errors
    ///
    /// [`Error::Terminal`](crate::Error::Terminal) when the terminal cannot be
    /// used (see [`Error::is_not_a_terminal`](crate::Error::is_not_a_terminal)),
    /// [`Error::Io`](crate::Error::Io) when the configured log file cannot be
    /// opened.
    pub fn run(mut self) -> Result<()> {
        self.run_interactive()
    }

    /// Run interactively, or write [`plain_text`](Self::plain_text) to `out`
    /// when no terminal is attached.
    ///
    /// # Errors
    ///
    /// As [`run`](Self::run), except that a missing terminal is not an error.
    pub fn run_or_print(mut self, out: &mut impl Write) -> Result<()> {
        match self.run_interactive() {
            Err(err) if err.is_not_a_terminal() => {
                info!("no terminal attached, printing plain dump");
                out.write_all(self.plain_text().as_bytes())?;
                out.flush()?;
                Ok(())
            }
            other => other,
        }
    }

    fn run_interactive(&mut self) -> Result<()> {
        self.init_logging()?;
        let options = SessionOptions {
            alternate_screen: self.config.alternate_screen,
        };
        let mut screen = self.take_screen();
        vdump_runtime::run(&mut screen, options)?;
        Ok(())
    }

    #[cfg(feature = "tracing")]
    fn init_logging(&self) -> Result<()> {
        let Some(path) = &self.config.log_file else {
            return Ok(());
        };
        if LOGGING_INSTALLED.get().is_some() {
            debug!("file logging already installed");
            return Ok(());
        }
        vdump_core::logging::init_file_logging(path, &self.config.log_filter)?;
        let _ = LOGGING_INSTALLED.set(());
        Ok(())
    }

    #[cfg(not(feature = "tracing"))]
    fn init_logging(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdump_core::event::{KeyCode, KeyEvent};
    use vdump_render::buffer::Buffer;
    use vdump_render::color::ColorTag;
    use vdump_runtime::ScreenAction;

    #[test]
    fn default_views() {
        let screen = DumpSession::new(&vec![1, 2, 3]).into_screen();
        assert_eq!(screen.context(), "vdump");
        assert_eq!(screen.labels(), ["Variables", "Stack trace"]);
        assert_eq!(screen.current_label(), Some("Variables"));
    }

    #[test]
    fn empty_trace_is_skipped_in_rotation() {
        let mut screen = DumpSession::new(&1).name("answer").into_screen();
        screen.handle_key(KeyEvent::new(KeyCode::Tab));
        assert_eq!(screen.current_label(), Some("Variables"));
    }

    #[test]
    fn extra_views_follow_builtins() {
        let mut screen = DumpSession::new(&"x")
            .stack_trace(vec![StackFrame::new("main")])
            .view(Box::new(TextView::from_text("Notes", "n", ColorTag::DEFAULT)))
            .into_screen();
        assert_eq!(screen.labels(), ["Variables", "Stack trace", "Notes"]);
        screen.handle_key(KeyEvent::new(KeyCode::BackTab));
        assert_eq!(screen.current_label(), Some("Notes"));
    }

    #[test]
    fn config_keys_reach_the_screen() {
        let keys = vdump_core::config::KeyConfig {
            quit: 'x',
            ..Default::default()
        };
        let config = InspectorConfig::default().with_keys(keys);
        let mut screen = DumpSession::new(&1).config(config).into_screen();
        assert_eq!(
            screen.handle_key(KeyEvent::new(KeyCode::Char('q'))),
            ScreenAction::Continue
        );
        assert_eq!(
            screen.handle_key(KeyEvent::new(KeyCode::Char('x'))),
            ScreenAction::Quit
        );
    }

    #[test]
    fn renders_headless() {
        let data = vec![vec!["a".to_string()]];
        let mut screen = DumpSession::new(&data).name("data").into_screen();
        screen.resize(60, 5);
        let mut buf = Buffer::new(60, 5);
        screen.render(&mut buf);
        assert_eq!(buf.row_text(0), " data | Variables");
        assert_eq!(buf.row_text(1), "array(1) {");
        assert_eq!(buf.row_text(2), "  [0] => array(1) {...}");
    }

    #[test]
    fn plain_text_has_every_part() {
        let text = DumpSession::new(&vec![7])
            .stack_trace(vec![StackFrame::new("main").at("main.rs", 1)])
            .plain_text();
        assert_eq!(text, "array(1) {\n  [0] => int(7)\n}\n\n#0 main at main.rs:1\n");
    }

    #[test]
    fn print_fallback_without_terminal() {
        // Test runners capture stdout, so the session cannot start.
        if std::io::IsTerminal::is_terminal(&std::io::stdout())
            && std::io::IsTerminal::is_terminal(&std::io::stdin())
        {
            return;
        }
        let mut out = Vec::new();
        DumpSession::new(&true).run_or_print(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "bool(true)\n");
    }

    #[test]
    fn run_without_terminal_reports_it() {
        if std::io::IsTerminal::is_terminal(&std::io::stdout())
            && std::io::IsTerminal::is_terminal(&std::io::stdin())
        {
            return;
        }
        let err = DumpSession::new(&1).run().unwrap_err();
        assert!(err.is_not_a_terminal());
    }
}
