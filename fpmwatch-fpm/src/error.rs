//! Error type for status endpoint fetches.

use thiserror::Error;

/// Errors that can occur while fetching the FPM status report.
///
/// Any of these is fatal to the current run; there is no cached or
/// partial fallback for a failed fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Connection to the status endpoint failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for the status endpoint.
    #[error("request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status code.
    #[error("status endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The endpoint answered with an empty (or whitespace-only) body.
    #[error("status endpoint returned an empty body")]
    EmptyBody,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}
