//! Metric submission types.
//!
//! A [`MetricSubmission`] is one labeled value bound for the monitoring
//! backend, carrying its kind (gauge or cumulative) and the time interval
//! the backend expects for that kind.

use chrono::{DateTime, Utc};

/// The fixed catalogue of metric groups derived from one status report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MetricGroup {
    /// Idle / active / total / max-active process counts.
    Processes,
    /// Listen queue depths. Absent for pools that do not report a backlog.
    Queues,
    /// Accepted connections and slow requests, counted since pool start.
    Requests,
}

impl MetricGroup {
    /// All groups, in emission order.
    pub const ALL: [MetricGroup; 3] = [
        MetricGroup::Processes,
        MetricGroup::Queues,
        MetricGroup::Requests,
    ];

    /// Short group name as used in metric type paths and logs.
    pub fn name(self) -> &'static str {
        match self {
            MetricGroup::Processes => "processes",
            MetricGroup::Queues => "queues",
            MetricGroup::Requests => "requests",
        }
    }

    /// The metric kind every submission in this group carries.
    pub fn kind(self) -> MetricKind {
        match self {
            MetricGroup::Processes | MetricGroup::Queues => MetricKind::Gauge,
            MetricGroup::Requests => MetricKind::Cumulative,
        }
    }
}

impl std::fmt::Display for MetricGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How the backend should interpret a submitted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MetricKind {
    /// Instantaneous value; most recent write wins.
    Gauge,
    /// Monotonic counter accumulated over `[start, end]`.
    Cumulative,
}

/// The time interval attached to a point.
///
/// `start` is present if and only if the point belongs to a cumulative
/// metric; gauges are point-in-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeInterval {
    pub start: Option<DateTime<Utc>>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    /// Point-in-time interval for a gauge reading.
    pub fn point(end: DateTime<Utc>) -> Self {
        Self { start: None, end }
    }

    /// Accumulation window for a cumulative reading.
    pub fn cumulative(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end,
        }
    }
}

/// One labeled value bound for the monitoring backend.
///
/// Construct through [`MetricSubmission::gauge`] or
/// [`MetricSubmission::cumulative`] so the kind/interval invariant holds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MetricSubmission {
    /// Which metric group this value belongs to.
    pub group: MetricGroup,
    /// Value label distinguishing series within the group (`idle`, `listen`, ...).
    pub value_label: &'static str,
    /// The reading, as a base-10 signed 64-bit integer.
    pub value: i64,
    /// Gauge or cumulative.
    pub kind: MetricKind,
    /// Interval framing the reading.
    pub interval: TimeInterval,
}

impl MetricSubmission {
    /// A gauge reading taken at `now`.
    pub fn gauge(group: MetricGroup, value_label: &'static str, value: i64, now: DateTime<Utc>) -> Self {
        debug_assert_eq!(group.kind(), MetricKind::Gauge);
        Self {
            group,
            value_label,
            value,
            kind: MetricKind::Gauge,
            interval: TimeInterval::point(now),
        }
    }

    /// A cumulative reading accumulated since `start` (the pool's own
    /// recorded start time, not the current wall clock).
    pub fn cumulative(
        group: MetricGroup,
        value_label: &'static str,
        value: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        debug_assert_eq!(group.kind(), MetricKind::Cumulative);
        Self {
            group,
            value_label,
            value,
            kind: MetricKind::Cumulative,
            interval: TimeInterval::cumulative(start, end),
        }
    }
}
