#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually. `VDUMP_DEMO_CONFIG` supplies a configuration file
//! when `--config` is not given.

use std::env;
use std::path::PathBuf;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
vdump-demo: browse a value in the terminal inspector

USAGE:
    vdump-demo [OPTIONS] [FILE]

    FILE is a JSON document to inspect. Without it a built-in sample with
    shared and cyclic references is shown.

OPTIONS:
    --report            Read FILE as a serialized error report
    --config=PATH       Load inspector settings from a TOML file
    --log=PATH          Append log events to PATH
    --plain             Print the fully expanded dump and exit
    --help, -h          Show this help message
    --version, -V       Show version

KEYBINDINGS:
    Up/Down PgUp/PgDn   Move the cursor
    Left/Right Home/End Scroll horizontally
    Enter / Space       Expand, collapse, or jump to an alias target
    /  n  N             Search, next match, previous match
    Tab / Shift-Tab     Cycle views
    v / F2              View list
    q / F10             Quit

ENVIRONMENT VARIABLES:
    VDUMP_DEMO_CONFIG   Default for --config
    VDUMP_LOG           Log filter (RUST_LOG syntax)";

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Inspect according to [`Opts`].
    Run(Opts),
    /// Print help and exit.
    Help,
    /// Print the version and exit.
    Version,
}

/// Parsed command-line options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Opts {
    /// JSON document to inspect.
    pub file: Option<PathBuf>,
    /// Treat `file` as an error report.
    pub report: bool,
    /// TOML configuration file.
    pub config: Option<PathBuf>,
    /// Log file override.
    pub log: Option<PathBuf>,
    /// Skip the interactive session.
    pub plain: bool,
}

impl Command {
    /// Parse the process arguments and environment.
    pub fn from_env() -> Result<Self, String> {
        let mut command = Self::parse(env::args().skip(1))?;
        if let Command::Run(opts) = &mut command
            && opts.config.is_none()
            && let Some(path) = env::var_os("VDUMP_DEMO_CONFIG")
        {
            opts.config = Some(PathBuf::from(path));
        }
        Ok(command)
    }

    /// Parse `args` (without the program name).
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut opts = Opts::default();
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--report" => opts.report = true,
                "--plain" => opts.plain = true,
                other => {
                    if let Some(val) = other.strip_prefix("--config=") {
                        opts.config = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--log=") {
                        opts.log = Some(PathBuf::from(val));
                    } else if other.starts_with('-') {
                        return Err(format!("Unknown argument: {other}"));
                    } else if opts.file.is_some() {
                        return Err(format!("Unexpected extra file: {other}"));
                    } else {
                        opts.file = Some(PathBuf::from(other));
                    }
                }
            }
        }
        if opts.report && opts.file.is_none() {
            return Err("--report needs a FILE".to_string());
        }
        Ok(Command::Run(opts))
    }
}
