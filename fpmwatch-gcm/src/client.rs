//! REST client for the Cloud Monitoring v3 API.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use fpmwatch_types::{MetricGroup, MetricSubmission};

use crate::descriptor::{descriptor_for, metric_type};
use crate::wire::{
    rfc3339, CreateTimeSeriesRequest, Metric, MonitoredResource, Point, TimeInterval, TimeSeries,
    TypedValue,
};
use crate::PublisherError;

/// Base URL of the Monitoring v3 REST API.
pub const DEFAULT_ENDPOINT: &str = "https://monitoring.googleapis.com/v3";

/// Environment variable carrying a pre-issued OAuth2 bearer token.
///
/// Token minting is delegated to external tooling; in a cron setup
/// `GOOGLE_OAUTH_ACCESS_TOKEN=$(gcloud auth print-access-token)` works.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The monitoring backend boundary.
///
/// The rest of fpmwatch only talks to this trait; tests substitute a
/// recording fake for [`GcmClient`].
#[async_trait]
pub trait MetricPublisher {
    /// Register the descriptor for every metric group.
    ///
    /// Idempotent: a descriptor that already exists is left alone.
    async fn create_metric_descriptors(&self, pool: &str) -> Result<(), PublisherError>;

    /// Delete the registered descriptors. Missing descriptors are ignored
    /// so a repeated `--delete` converges instead of failing.
    async fn delete_metric_descriptors(&self) -> Result<(), PublisherError>;

    /// Publish one batch of submissions, one `timeSeries.create` call per
    /// metric group present in the batch.
    async fn publish(&self, submissions: &[MetricSubmission]) -> Result<(), PublisherError>;
}

/// Publisher backed by the Cloud Monitoring REST API.
#[derive(Debug, Clone)]
pub struct GcmClient {
    client: Client,
    endpoint: String,
    project_id: String,
    access_token: String,
}

impl GcmClient {
    /// Create a builder for a project, with a bearer token for the
    /// Monitoring API.
    pub fn builder(
        project_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> GcmClientBuilder {
        GcmClientBuilder {
            project_id: project_id.into(),
            access_token: access_token.into(),
            endpoint: None,
            timeout: None,
        }
    }

    /// The project the client publishes under.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn project_url(&self) -> String {
        format!("{}/projects/{}", self.endpoint, self.project_id)
    }

    async fn check(response: reqwest::Response) -> Result<(), PublisherError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response.text().await.unwrap_or_default();
        Err(PublisherError::Api { status, message })
    }
}

#[async_trait]
impl MetricPublisher for GcmClient {
    async fn create_metric_descriptors(&self, pool: &str) -> Result<(), PublisherError> {
        let url = format!("{}/metricDescriptors", self.project_url());

        for group in MetricGroup::ALL {
            let descriptor = descriptor_for(group, pool);
            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.access_token)
                .json(&descriptor)
                .send()
                .await?;

            // Re-registering an existing descriptor is a normal setup path.
            if response.status() == StatusCode::CONFLICT {
                debug!(group = %group, "metric descriptor already exists");
                continue;
            }
            Self::check(response).await?;
            debug!(group = %group, "created metric descriptor");
        }
        Ok(())
    }

    async fn delete_metric_descriptors(&self) -> Result<(), PublisherError> {
        for group in MetricGroup::ALL {
            let url = format!(
                "{}/metricDescriptors/{}",
                self.project_url(),
                metric_type(group)
            );
            let response = self
                .client
                .delete(&url)
                .bearer_auth(&self.access_token)
                .send()
                .await?;

            if response.status() == StatusCode::NOT_FOUND {
                debug!(group = %group, "metric descriptor already absent");
                continue;
            }
            Self::check(response).await?;
            debug!(group = %group, "deleted metric descriptor");
        }
        Ok(())
    }

    async fn publish(&self, submissions: &[MetricSubmission]) -> Result<(), PublisherError> {
        let url = format!("{}/timeSeries", self.project_url());

        for group in MetricGroup::ALL {
            let series: Vec<TimeSeries> = submissions
                .iter()
                .filter(|s| s.group == group)
                .map(|s| to_time_series(&self.project_id, s))
                .collect();
            if series.is_empty() {
                continue;
            }

            let count = series.len();
            let body = CreateTimeSeriesRequest { time_series: series };
            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.access_token)
                .json(&body)
                .send()
                .await?;
            Self::check(response).await?;
            debug!(group = %group, count, "wrote time series");
        }
        Ok(())
    }
}

/// Convert one submission to its wire form, tagged with the `global`
/// monitored resource scoped by project.
fn to_time_series(project_id: &str, submission: &MetricSubmission) -> TimeSeries {
    TimeSeries {
        metric: Metric {
            metric_type: metric_type(submission.group).to_string(),
            labels: BTreeMap::from([(
                "value_type".to_string(),
                submission.value_label.to_string(),
            )]),
        },
        resource: MonitoredResource {
            resource_type: "global".to_string(),
            labels: BTreeMap::from([("project_id".to_string(), project_id.to_string())]),
        },
        points: vec![Point {
            interval: TimeInterval {
                start_time: submission.interval.start.map(rfc3339),
                end_time: rfc3339(submission.interval.end),
            },
            value: TypedValue {
                int64_value: submission.value.to_string(),
            },
        }],
    }
}

/// Builder for [`GcmClient`].
#[derive(Debug)]
pub struct GcmClientBuilder {
    project_id: String,
    access_token: String,
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl GcmClientBuilder {
    /// Override the API endpoint (for testing against a stub server).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> GcmClient {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        GcmClient {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            project_id: self.project_id,
            access_token: self.access_token,
        }
    }
}
