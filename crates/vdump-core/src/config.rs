#![forbid(unsafe_code)]

//! Inspector configuration.
//!
//! [`InspectorConfig`] collects every tunable of an inspector session. It can
//! be loaded from TOML at startup and then adjusted with builder methods.
//!
//! ```toml
//! # vdump.toml
//! string_preview_len = 80
//! indent = 4
//! log_file = "/tmp/vdump.log"
//!
//! [keys]
//! quit = "x"
//! ```
//!
//! Every field has a default, so a partial file (or an empty one) is valid.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level configuration for an inspector session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Display length above which a string becomes expandable and is
    /// truncated in its collapsed form.
    pub string_preview_len: usize,
    /// Columns per tree depth level.
    pub indent: usize,
    /// Switch to the alternate screen while the session runs.
    pub alternate_screen: bool,
    /// Append log events to this file while the session runs.
    pub log_file: Option<PathBuf>,
    /// Default log filter when `VDUMP_LOG` is unset.
    pub log_filter: String,
    /// Remappable global keys.
    pub keys: KeyConfig,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            string_preview_len: 64,
            indent: 2,
            alternate_screen: true,
            log_file: None,
            log_filter: "info".to_string(),
            keys: KeyConfig::default(),
        }
    }
}

/// Character bindings for the global keys.
///
/// Function-key bindings (F2 view list, F5/F6 previous/next, F10 quit) are
/// fixed and always active alongside these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Leave the session.
    pub quit: char,
    /// Open the view list overlay.
    pub view_list: char,
    /// Start editing a search query in the inspector view.
    pub search: char,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            quit: 'q',
            view_list: 'v',
            search: '/',
        }
    }
}

impl InspectorConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Serialize to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::TomlSerialize)
    }

    /// Set the string preview threshold (minimum 1).
    #[must_use]
    pub fn with_string_preview_len(mut self, len: usize) -> Self {
        self.string_preview_len = len.max(1);
        self
    }

    /// Set the indentation width.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Enable or disable the alternate screen.
    #[must_use]
    pub fn with_alternate_screen(mut self, enabled: bool) -> Self {
        self.alternate_screen = enabled;
        self
    }

    /// Route log events to a file.
    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Replace the key bindings.
    #[must_use]
    pub fn with_keys(mut self, keys: KeyConfig) -> Self {
        self.keys = keys;
        self
    }
}

/// Errors from loading or saving configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io(io::Error),
    /// The TOML was malformed or had wrongly typed fields.
    Toml(toml::de::Error),
    /// Serializing to TOML failed.
    TomlSerialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config I/O error: {err}"),
            Self::Toml(err) => write!(f, "config parse error: {err}"),
            Self::TomlSerialize(err) => write!(f, "config serialize error: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Toml(err) => Some(err),
            Self::TomlSerialize(err) => Some(err),
        }
    }
}
