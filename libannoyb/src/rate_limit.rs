//! Rate-limit reporting
//!
//! Turns flattened rate-limit records into log lines and a report whose
//! severities callers can act on.

use chrono::{Local, TimeZone};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::tree::Flattened;

/// Marker field identifying a rate-limit record
pub const MARKER_FIELD: &str = "remaining";

/// At or below this many remaining calls a window counts as low
pub const API_LOW_LIMIT: u64 = 4;

/// A single `{remaining, limit, reset}` record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitWindow {
    pub remaining: u64,
    pub limit: u64,
    /// UNIX timestamp (seconds) at which the window resets
    pub reset: i64,
}

impl RateLimitWindow {
    /// Read a window from a record, `None` if any field is missing or not numeric
    pub fn from_record(record: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            remaining: record.get("remaining")?.as_u64()?,
            limit: record.get("limit")?.as_u64()?,
            reset: record.get("reset")?.as_i64()?,
        })
    }

    pub fn severity(&self) -> Severity {
        if self.remaining == 0 {
            Severity::Exhausted
        } else if self.remaining <= API_LOW_LIMIT {
            Severity::Low
        } else {
            Severity::Ok
        }
    }

    /// Reset time in local time, `%c` style
    pub fn reset_display(&self) -> String {
        match Local.timestamp_opt(self.reset, 0).single() {
            Some(time) => time.format("%c").to_string(),
            None => format!("@{}", self.reset),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Ok,
    Low,
    Exhausted,
}

/// One evaluated category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub name: String,
    pub window: RateLimitWindow,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitReport {
    /// Entries in sorted name order
    pub entries: Vec<RateLimitEntry>,
    /// Categories whose record could not be read
    pub skipped: Vec<String>,
}

impl RateLimitReport {
    /// Highest severity in the report, `Severity::Ok` when empty
    pub fn worst(&self) -> Severity {
        self.entries
            .iter()
            .map(|e| e.severity)
            .max()
            .unwrap_or(Severity::Ok)
    }

    pub fn exhausted(&self) -> impl Iterator<Item = &RateLimitEntry> {
        self.entries
            .iter()
            .filter(|e| e.severity == Severity::Exhausted)
    }
}

/// Evaluate and log every category
pub fn report(limits: &Flattened) -> RateLimitReport {
    let mut result = RateLimitReport::default();

    for (name, record) in limits {
        let Some(window) = RateLimitWindow::from_record(record) else {
            warn!(category = %name, "API {} limit record is malformed, skipping", name);
            result.skipped.push(name.clone());
            continue;
        };

        let severity = window.severity();
        match severity {
            Severity::Exhausted => error!(category = %name, "API {} limit hit", name),
            Severity::Low => warn!(category = %name, "API {} limit low", name),
            Severity::Ok => {}
        }

        info!(
            category = %name,
            remaining = window.remaining,
            limit = window.limit,
            "API {}: {} of {} remaining (reset at: {})",
            name,
            window.remaining,
            window.limit,
            window.reset_display()
        );

        result.entries.push(RateLimitEntry {
            name: name.clone(),
            window,
            severity,
        });
    }

    result
}
