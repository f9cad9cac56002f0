#![forbid(unsafe_code)]

//! Rendering options shared by the views.

use vdump_core::config::InspectorConfig;

/// Options the views need from the inspector configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Display length above which a string becomes expandable.
    pub string_preview_len: usize,
    /// Columns per tree depth level.
    pub indent: usize,
    /// Key that starts a search.
    pub search_key: char,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self::from(&InspectorConfig::default())
    }
}

impl From<&InspectorConfig> for ViewOptions {
    fn from(config: &InspectorConfig) -> Self {
        Self {
            string_preview_len: config.string_preview_len.max(1),
            indent: config.indent,
            search_key: config.keys.search,
        }
    }
}
