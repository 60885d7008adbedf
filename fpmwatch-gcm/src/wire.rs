//! Request body models for the Cloud Monitoring v3 REST API.
//!
//! Shapes follow the JSON mapping of the v3 protos: camelCase field
//! names, RFC 3339 timestamps, and `Int64Value` encoded as a string.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// `google.api.MetricDescriptor`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDescriptor {
    #[serde(rename = "type")]
    pub metric_type: String,
    pub display_name: String,
    pub description: String,
    pub metric_kind: String,
    pub value_type: String,
    pub unit: String,
    pub labels: Vec<LabelDescriptor>,
}

/// `google.api.LabelDescriptor`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDescriptor {
    pub key: String,
    pub value_type: String,
    pub description: String,
}

/// Body of `projects.timeSeries.create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeSeriesRequest {
    pub time_series: Vec<TimeSeries>,
}

/// `google.monitoring.v3.TimeSeries`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub metric: Metric,
    pub resource: MonitoredResource,
    pub points: Vec<Point>,
}

/// `google.api.Metric`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    #[serde(rename = "type")]
    pub metric_type: String,
    pub labels: BTreeMap<String, String>,
}

/// `google.api.MonitoredResource`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoredResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub labels: BTreeMap<String, String>,
}

/// `google.monitoring.v3.Point`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub interval: TimeInterval,
    pub value: TypedValue,
}

/// `google.monitoring.v3.TimeInterval`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    pub end_time: String,
}

/// `google.monitoring.v3.TypedValue`, INT64 flavor only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedValue {
    /// Encoded as a decimal string, per the proto3 JSON mapping of int64.
    pub int64_value: String,
}

/// Render a timestamp the way the API expects.
pub fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rfc3339_utc() {
        let ts = Utc.with_ymd_and_hms(2019, 6, 23, 10, 13, 50).unwrap();
        assert_eq!(rfc3339(ts), "2019-06-23T10:13:50Z");
    }

    #[test]
    fn test_interval_start_omitted_when_absent() {
        let interval = TimeInterval {
            start_time: None,
            end_time: "2019-06-30T12:00:00Z".to_string(),
        };
        let json = serde_json::to_value(&interval).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"endTime": "2019-06-30T12:00:00Z"})
        );
    }

    #[test]
    fn test_point_wire_shape() {
        let point = Point {
            interval: TimeInterval {
                start_time: Some("2019-06-23T10:13:50Z".to_string()),
                end_time: "2019-06-30T12:00:00Z".to_string(),
            },
            value: TypedValue {
                int64_value: "37211".to_string(),
            },
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "interval": {
                    "startTime": "2019-06-23T10:13:50Z",
                    "endTime": "2019-06-30T12:00:00Z"
                },
                "value": {"int64Value": "37211"}
            })
        );
    }
}
