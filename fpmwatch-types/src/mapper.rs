//! Mapping a parsed status snapshot to metric submissions.
//!
//! The three metric groups are evaluated independently: a missing or
//! unparsable field degrades only its own submission (or, for the
//! cumulative group's start time, its own group), never the whole run.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::status::{fields, FpmStatus};
use crate::submission::{MetricGroup, MetricSubmission};

/// Format of the FPM `start time` field, e.g. `23/Jun/2019:12:13:50 +0200`.
///
/// The offset is honored during parsing, then the timestamp is converted
/// to UTC for interval math and wire encoding.
pub const START_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// A per-submission or per-group mapping failure.
///
/// These are diagnostics, not run-fatal errors: the affected submission
/// or group is skipped and everything else proceeds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    /// A normally-numeric field held a non-numeric value.
    #[error("{group} metric '{value_label}': field '{field}' has non-numeric value '{value}'")]
    InvalidNumber {
        group: MetricGroup,
        value_label: &'static str,
        field: &'static str,
        value: String,
    },

    /// The report carried no `start_time`, so the cumulative group has no
    /// accumulation window.
    #[error("requests metrics skipped: field 'start_time' is missing")]
    MissingStartTime,

    /// `start_time` was present but did not match [`START_TIME_FORMAT`].
    #[error("requests metrics skipped: unparsable start time '{value}': {source}")]
    InvalidStartTime {
        value: String,
        source: chrono::format::ParseError,
    },
}

/// Result of mapping one snapshot: the submissions to publish plus any
/// scoped failures encountered along the way.
#[derive(Debug, Clone, Default)]
pub struct MappingOutcome {
    /// Submissions in stable group/label order.
    pub submissions: Vec<MetricSubmission>,
    /// Per-submission and per-group failures, in encounter order.
    pub errors: Vec<MappingError>,
}

const PROCESS_VALUES: [(&str, &str); 4] = [
    ("idle", fields::IDLE_PROCESSES),
    ("active", fields::ACTIVE_PROCESSES),
    ("total", fields::TOTAL_PROCESSES),
    ("max", fields::MAX_ACTIVE_PROCESSES),
];

const QUEUE_VALUES: [(&str, &str); 3] = [
    ("listen", fields::LISTEN_QUEUE),
    ("max", fields::MAX_LISTEN_QUEUE),
    ("len", fields::LISTEN_QUEUE_LEN),
];

const REQUEST_VALUES: [(&str, &str); 2] = [
    ("connections", fields::ACCEPTED_CONN),
    ("slow", fields::SLOW_REQUESTS),
];

/// Derive the full metric catalogue for one snapshot at wall-clock `now`.
///
/// Emission rules, per group:
///
/// - **processes** (gauge): emitted when at least one of the four process
///   count fields is present.
/// - **queues** (gauge): gated on presence of the `listen_queue` key.
///   Pools running a process manager that reports no backlog omit the
///   whole group; that is a normal, silent skip.
/// - **requests** (cumulative): interval runs from the pool's parsed
///   start time to `now`. A missing or unparsable start time fails this
///   group only.
///
/// Within each group, an absent field skips just that submission and a
/// non-numeric value records a [`MappingError`] for it.
pub fn map_snapshot(status: &FpmStatus, now: DateTime<Utc>) -> MappingOutcome {
    let mut outcome = MappingOutcome::default();

    if PROCESS_VALUES.iter().any(|(_, field)| status.has(field)) {
        for (value_label, field) in PROCESS_VALUES {
            push_gauge(&mut outcome, status, MetricGroup::Processes, value_label, field, now);
        }
    }

    // Presence of the key, not value truthiness, gates the queues group.
    if status.has(fields::LISTEN_QUEUE) {
        for (value_label, field) in QUEUE_VALUES {
            push_gauge(&mut outcome, status, MetricGroup::Queues, value_label, field, now);
        }
    }

    match pool_start_time(status) {
        Ok(start) => {
            for (value_label, field) in REQUEST_VALUES {
                let Some(raw) = status.get(field) else {
                    continue;
                };
                match parse_value(MetricGroup::Requests, value_label, field, raw) {
                    Ok(value) => outcome.submissions.push(MetricSubmission::cumulative(
                        MetricGroup::Requests,
                        value_label,
                        value,
                        start,
                        now,
                    )),
                    Err(err) => outcome.errors.push(err),
                }
            }
        }
        Err(err) => outcome.errors.push(err),
    }

    outcome
}

/// Parse the pool's `start_time` field, converting to UTC.
pub fn pool_start_time(status: &FpmStatus) -> Result<DateTime<Utc>, MappingError> {
    let raw = status
        .get(fields::START_TIME)
        .ok_or(MappingError::MissingStartTime)?;
    DateTime::parse_from_str(raw, START_TIME_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| MappingError::InvalidStartTime {
            value: raw.to_string(),
            source,
        })
}

fn push_gauge(
    outcome: &mut MappingOutcome,
    status: &FpmStatus,
    group: MetricGroup,
    value_label: &'static str,
    field: &'static str,
    now: DateTime<Utc>,
) {
    let Some(raw) = status.get(field) else {
        return;
    };
    match parse_value(group, value_label, field, raw) {
        Ok(value) => outcome
            .submissions
            .push(MetricSubmission::gauge(group, value_label, value, now)),
        Err(err) => outcome.errors.push(err),
    }
}

fn parse_value(
    group: MetricGroup,
    value_label: &'static str,
    field: &'static str,
    raw: &str,
) -> Result<i64, MappingError> {
    raw.parse::<i64>().map_err(|_| MappingError::InvalidNumber {
        group,
        value_label,
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::{MetricKind, TimeInterval};
    use chrono::TimeZone;

    const SAMPLE: &str = "\
pool:                 www
process manager:      dynamic
start time:           23/Jun/2019:12:13:50 +0200
start since:          577793
accepted conn:        37211
listen queue:         0
max listen queue:     0
listen queue len:     0
idle processes:       6
active processes:     1
total processes:      7
max active processes: 13
max children reached: 0
slow requests:        0
";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 6, 30, 12, 0, 0).unwrap()
    }

    /// `23/Jun/2019:12:13:50 +0200` is `10:13:50` UTC.
    fn sample_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 6, 23, 10, 13, 50).unwrap()
    }

    #[test]
    fn test_full_snapshot_yields_full_catalogue() {
        let status = FpmStatus::parse(SAMPLE);
        let outcome = map_snapshot(&status, now());

        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        assert_eq!(outcome.submissions.len(), 9);

        let expected = [
            (MetricGroup::Processes, "idle", 6),
            (MetricGroup::Processes, "active", 1),
            (MetricGroup::Processes, "total", 7),
            (MetricGroup::Processes, "max", 13),
            (MetricGroup::Queues, "listen", 0),
            (MetricGroup::Queues, "max", 0),
            (MetricGroup::Queues, "len", 0),
            (MetricGroup::Requests, "connections", 37211),
            (MetricGroup::Requests, "slow", 0),
        ];

        for (submission, (group, label, value)) in outcome.submissions.iter().zip(expected) {
            assert_eq!(submission.group, group);
            assert_eq!(submission.value_label, label);
            assert_eq!(submission.value, value);
            assert_eq!(submission.kind, group.kind());
            match submission.kind {
                MetricKind::Gauge => {
                    assert_eq!(submission.interval, TimeInterval::point(now()));
                }
                MetricKind::Cumulative => {
                    assert_eq!(
                        submission.interval,
                        TimeInterval::cumulative(sample_start(), now())
                    );
                }
            }
        }
    }

    #[test]
    fn test_missing_listen_queue_skips_queue_group_silently() {
        let status = FpmStatus::parse(
            "pool: www\nstart time: 23/Jun/2019:12:13:50 +0200\n\
             accepted conn: 37211\nidle processes: 6\nactive processes: 1\n\
             total processes: 7\nmax active processes: 13\nslow requests: 0\n",
        );
        let outcome = map_snapshot(&status, now());

        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        assert!(outcome
            .submissions
            .iter()
            .all(|s| s.group != MetricGroup::Queues));
        assert_eq!(outcome.submissions.len(), 6);
    }

    #[test]
    fn test_listen_queue_presence_gates_by_key_not_value() {
        // Zero is a perfectly good queue depth; only key absence skips.
        let status = FpmStatus::parse(
            "start time: 23/Jun/2019:12:13:50 +0200\nlisten queue: 0\n\
             max listen queue: 0\nlisten queue len: 0\n",
        );
        let outcome = map_snapshot(&status, now());
        let queues: Vec<_> = outcome
            .submissions
            .iter()
            .filter(|s| s.group == MetricGroup::Queues)
            .collect();
        assert_eq!(queues.len(), 3);
    }

    #[test]
    fn test_no_process_fields_skips_process_group() {
        let status = FpmStatus::parse("pool: www\nstart time: 23/Jun/2019:12:13:50 +0200\n");
        let outcome = map_snapshot(&status, now());
        assert!(outcome
            .submissions
            .iter()
            .all(|s| s.group != MetricGroup::Processes));
    }

    #[test]
    fn test_partial_process_fields_emit_partial_group() {
        let status = FpmStatus::parse("idle processes: 6\nactive processes: 1\n");
        let outcome = map_snapshot(&status, now());
        let labels: Vec<_> = outcome
            .submissions
            .iter()
            .filter(|s| s.group == MetricGroup::Processes)
            .map(|s| s.value_label)
            .collect();
        assert_eq!(labels, ["idle", "active"]);
    }

    #[test]
    fn test_non_numeric_field_degrades_single_submission() {
        let status = FpmStatus::parse(
            "start time: 23/Jun/2019:12:13:50 +0200\n\
             accepted conn: not-a-number\nslow requests: 0\n",
        );
        let outcome = map_snapshot(&status, now());

        let requests: Vec<_> = outcome
            .submissions
            .iter()
            .filter(|s| s.group == MetricGroup::Requests)
            .collect();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].value_label, "slow");

        assert_eq!(
            outcome.errors,
            vec![MappingError::InvalidNumber {
                group: MetricGroup::Requests,
                value_label: "connections",
                field: fields::ACCEPTED_CONN,
                value: "not-a-number".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_start_time_fails_requests_group_only() {
        let status = FpmStatus::parse("idle processes: 6\naccepted conn: 37211\n");
        let outcome = map_snapshot(&status, now());

        assert!(outcome
            .submissions
            .iter()
            .all(|s| s.group != MetricGroup::Requests));
        assert_eq!(outcome.errors, vec![MappingError::MissingStartTime]);
        // Processes still made it out.
        assert!(outcome
            .submissions
            .iter()
            .any(|s| s.group == MetricGroup::Processes));
    }

    #[test]
    fn test_unparsable_start_time_fails_requests_group_only() {
        let status =
            FpmStatus::parse("start time: last tuesday\naccepted conn: 37211\nidle processes: 6\n");
        let outcome = map_snapshot(&status, now());

        assert!(outcome
            .submissions
            .iter()
            .all(|s| s.group != MetricGroup::Requests));
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(
            outcome.errors[0],
            MappingError::InvalidStartTime { .. }
        ));
    }

    #[test]
    fn test_start_time_offset_converted_to_utc() {
        let status = FpmStatus::parse("start time: 23/Jun/2019:12:13:50 +0200\n");
        assert_eq!(pool_start_time(&status).unwrap(), sample_start());
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let status = FpmStatus::parse(SAMPLE);
        let a = map_snapshot(&status, now());
        let b = map_snapshot(&status, now());
        assert_eq!(a.submissions, b.submissions);
        assert_eq!(a.errors, b.errors);
    }
}
