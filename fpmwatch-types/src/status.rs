//! Parsing of the PHP-FPM status report.
//!
//! The FPM status page is a line-oriented `key: value` text document:
//!
//! ```text
//! pool:                 www
//! process manager:      dynamic
//! start time:           23/Jun/2019:12:13:50 +0200
//! accepted conn:        37211
//! idle processes:       6
//! ...
//! ```
//!
//! [`parse_status_text`] turns that into a map of normalized keys
//! (whitespace runs collapsed to `_`) to trimmed string values.
//! [`FpmStatus`] wraps the map as a read-only snapshot with presence
//! checks. No numeric or timestamp interpretation happens here - that is
//! the mapper's job, so a single bad field only affects its own metric.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Normalized field names produced by the status parser.
///
/// Which of these appear in a given report depends on the pool's process
/// manager configuration; `listen_queue` and friends are absent for pools
/// without a backlog-reporting listener.
pub mod fields {
    pub const POOL: &str = "pool";
    pub const PROCESS_MANAGER: &str = "process_manager";
    pub const START_TIME: &str = "start_time";
    pub const START_SINCE: &str = "start_since";
    pub const ACCEPTED_CONN: &str = "accepted_conn";
    pub const LISTEN_QUEUE: &str = "listen_queue";
    pub const MAX_LISTEN_QUEUE: &str = "max_listen_queue";
    pub const LISTEN_QUEUE_LEN: &str = "listen_queue_len";
    pub const IDLE_PROCESSES: &str = "idle_processes";
    pub const ACTIVE_PROCESSES: &str = "active_processes";
    pub const TOTAL_PROCESSES: &str = "total_processes";
    pub const MAX_ACTIVE_PROCESSES: &str = "max_active_processes";
    pub const MAX_CHILDREN_REACHED: &str = "max_children_reached";
    pub const SLOW_REQUESTS: &str = "slow_requests";
}

// Key starts and ends with a word character, may contain internal
// whitespace. Lines that don't fit the shape are skipped entirely.
// A line whose value is all whitespace still matches, with a residual
// whitespace value; FPM never emits such lines, and the mapper rejects
// the value as non-numeric anyway.
static STATUS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\w[\w\s]*\w)\s*:\s*(.+?)\s*$").expect("status line pattern"));

/// Parse a raw status report into normalized `key -> value` entries.
///
/// Line separators (`\n`, `\r\n`, `\r`) are normalized first. Malformed
/// lines contribute nothing; duplicate keys are last-write-wins. This is a
/// pure function: identical input always yields identical output.
pub fn parse_status_text(text: &str) -> BTreeMap<String, String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut entries = BTreeMap::new();
    for line in normalized.split('\n') {
        let Some(caps) = STATUS_LINE.captures(line) else {
            continue;
        };
        let key = caps[1].split_whitespace().collect::<Vec<_>>().join("_");
        entries.insert(key, caps[2].to_string());
    }
    entries
}

/// One fetched FPM status report, immutable after parsing.
///
/// Field presence mirrors the source text exactly: a field the pool did
/// not report is absent, never silently zero. Values stay in string form;
/// see [`crate::map_snapshot`] for typed interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FpmStatus {
    entries: BTreeMap<String, String>,
}

impl FpmStatus {
    /// Build a snapshot from raw status text.
    pub fn parse(text: &str) -> Self {
        Self {
            entries: parse_status_text(text),
        }
    }

    /// Look up a field by normalized name.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries.get(field).map(String::as_str)
    }

    /// Whether the field was present in the source text.
    ///
    /// Presence of the key, not value truthiness, is what gates the
    /// optional metric groups downstream.
    pub fn has(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    /// The pool name, if reported.
    pub fn pool(&self) -> Option<&str> {
        self.get(fields::POOL)
    }

    /// Number of parsed fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the report contained no parseable content at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all parsed fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
