//! # fpmwatch-gcm
//!
//! Google Cloud Monitoring publisher for fpmwatch.
//!
//! Registers the three custom metric descriptors (`processes`, `queues`,
//! `requests`) and writes time series batches against the Monitoring v3
//! REST API. Authentication is a pre-issued OAuth2 bearer token; minting
//! tokens from a service account key is deliberately out of scope.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use fpmwatch_gcm::{GcmClient, MetricPublisher, ServiceAccountKey, ACCESS_TOKEN_ENV};
//! use fpmwatch_types::{MetricGroup, MetricSubmission};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let key = ServiceAccountKey::from_env()?;
//!     let token = std::env::var(ACCESS_TOKEN_ENV)?;
//!     let publisher = GcmClient::builder(key.project_id, token).build();
//!
//!     publisher.create_metric_descriptors("www").await?;
//!     let batch = vec![MetricSubmission::gauge(
//!         MetricGroup::Processes,
//!         "idle",
//!         6,
//!         Utc::now(),
//!     )];
//!     publisher.publish(&batch).await?;
//!     Ok(())
//! }
//! ```

mod client;
mod credentials;
mod descriptor;
mod error;
mod wire;

pub use client::{GcmClient, GcmClientBuilder, MetricPublisher, ACCESS_TOKEN_ENV, DEFAULT_ENDPOINT};
pub use credentials::{ServiceAccountKey, CREDENTIALS_ENV};
pub use descriptor::{descriptor_for, metric_type};
pub use error::{CredentialsError, PublisherError};
pub use wire::MetricDescriptor;
