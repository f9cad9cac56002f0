#![forbid(unsafe_code)]

//! Interface for externally recorded profiles.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A finished measurement produced by some profiler.
pub trait ProfileRecord {
    /// What was measured.
    fn label(&self) -> &str;

    /// Wall time spent.
    fn elapsed(&self) -> Duration;

    /// Free-form extra information (call counts, memory, ...).
    fn detail(&self) -> Option<String> {
        None
    }
}

/// A plain [`ProfileRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// What was measured.
    pub label: String,
    /// Wall time spent.
    pub elapsed: Duration,
    /// Extra information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Timing {
    /// A timing without detail.
    pub fn new(label: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            label: label.into(),
            elapsed,
            detail: None,
        }
    }

    /// Attach detail text.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl ProfileRecord for Timing {
    fn label(&self) -> &str {
        &self.label
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn detail(&self) -> Option<String> {
        self.detail.clone()
    }
}

/// `1.250 ms` style formatting used by profile tables.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.3} ms", elapsed.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_reads_from_json() {
        let timing: Timing = serde_json::from_str(
            r#"{"label": "snapshot", "elapsed": {"secs": 0, "nanos": 1250000}}"#,
        )
        .unwrap();
        assert_eq!(timing, Timing::new("snapshot", Duration::from_micros(1250)));
        assert_eq!(format_elapsed(timing.elapsed()), "1.250 ms");
        assert_eq!(ProfileRecord::detail(&timing), None);
    }

    #[test]
    fn detail_survives_json() {
        let timing = Timing::new("render", Duration::from_millis(3)).with_detail("42 calls");
        let json = serde_json::to_string(&timing).unwrap();
        assert!(json.contains(r#""detail":"42 calls""#));
        let back: Timing = serde_json::from_str(&json).unwrap();
        assert_eq!(back, timing);
        assert!(!serde_json::to_string(&Timing::new("x", Duration::ZERO)).unwrap().contains("detail"));
    }
}
