//! The fixed metric descriptor catalogue.
//!
//! One custom metric type per group, registered once during setup. The
//! series within a group are distinguished by the `value_type` label
//! (`idle`, `listen`, `connections`, ...), not by separate metric types.

use fpmwatch_types::{MetricGroup, MetricKind};

use crate::wire::{LabelDescriptor, MetricDescriptor};

/// Backend-specific metric type path for a group.
///
/// Custom metrics appear under `Metric Explorer > Global > Custom Metrics`
/// in the Cloud Console.
pub fn metric_type(group: MetricGroup) -> &'static str {
    match group {
        MetricGroup::Processes => "custom.googleapis.com/php_fpm/processes",
        MetricGroup::Queues => "custom.googleapis.com/php_fpm/queues",
        MetricGroup::Requests => "custom.googleapis.com/php_fpm/requests",
    }
}

fn metric_kind(kind: MetricKind) -> &'static str {
    match kind {
        MetricKind::Gauge => "GAUGE",
        MetricKind::Cumulative => "CUMULATIVE",
    }
}

/// Build the descriptor registered for `group`, mentioning the pool the
/// metrics describe.
pub fn descriptor_for(group: MetricGroup, pool: &str) -> MetricDescriptor {
    MetricDescriptor {
        metric_type: metric_type(group).to_string(),
        display_name: format!("php fpm {}", group.name()),
        description: format!("php-fpm {} for {pool}.", group.name()),
        metric_kind: metric_kind(group.kind()).to_string(),
        value_type: "INT64".to_string(),
        unit: "{Procs}".to_string(),
        labels: vec![LabelDescriptor {
            key: "value_type".to_string(),
            value_type: "STRING".to_string(),
            description: "The type of value.".to_string(),
        }],
    }
}
