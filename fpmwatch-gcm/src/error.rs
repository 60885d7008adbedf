//! Error types for the monitoring publisher.

use thiserror::Error;

/// Errors surfaced by the Cloud Monitoring publisher.
///
/// There is no internal retry; callers decide whether a failed publish
/// run is worth repeating on the next schedule tick.
#[derive(Debug, Error)]
pub enum PublisherError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Connection to the Monitoring API failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for the Monitoring API.
    #[error("request timed out")]
    Timeout,

    /// The API rejected the request.
    #[error("Monitoring API returned {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for PublisherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PublisherError::Timeout
        } else if err.is_connect() {
            PublisherError::Connection(err.to_string())
        } else {
            PublisherError::Http(err.to_string())
        }
    }
}

/// Errors resolving the service account credentials at startup.
///
/// All of these are startup-fatal: without a project identity there is
/// nowhere to publish.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// The environment variable naming the credentials file is not set.
    #[error("env {0} is not set")]
    MissingEnv(&'static str),

    /// The credentials file could not be read.
    #[error("cannot read credentials file '{path}': {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    /// The credentials file is not valid service account JSON.
    #[error("invalid credentials file '{path}': {source}")]
    Invalid {
        path: String,
        source: serde_json::Error,
    },
}
