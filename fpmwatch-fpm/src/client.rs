//! HTTP client for the PHP-FPM status page.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use fpmwatch_types::FpmStatus;

use crate::FetchError;

const DEFAULT_STATUS_URL: &str = "http://localhost/php-fpm-status";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for fetching a pool's status report.
///
/// The status page is served by FPM itself (via the `pm.status_path`
/// directive) and requires no authentication.
#[derive(Debug, Clone)]
pub struct FpmStatusClient {
    client: Client,
    status_url: String,
}

impl FpmStatusClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> FpmStatusClientBuilder {
        FpmStatusClientBuilder::default()
    }

    /// The configured status URL.
    pub fn status_url(&self) -> &str {
        &self.status_url
    }

    /// Fetch the raw status report text.
    ///
    /// Fails on transport errors, non-success status codes, and empty
    /// bodies. An empty body means FPM is misconfigured (wrong path, or
    /// the status page disabled), which must not pass silently.
    pub async fn fetch(&self) -> Result<String, FetchError> {
        debug!(url = %self.status_url, "fetching pool status");

        let response = self.client.get(&self.status_url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }

        Ok(body)
    }

    /// Fetch and parse the status report into a snapshot.
    pub async fn collect(&self) -> Result<FpmStatus, FetchError> {
        let body = self.fetch().await?;
        let status = FpmStatus::parse(&body);
        debug!(fields = status.len(), "parsed pool status");
        Ok(status)
    }
}

/// Builder for [`FpmStatusClient`].
#[derive(Debug, Default)]
pub struct FpmStatusClientBuilder {
    status_url: Option<String>,
    timeout: Option<Duration>,
}

impl FpmStatusClientBuilder {
    /// Set the status page URL (e.g. `http://localhost/php-fpm-status`).
    pub fn status_url(mut self, url: impl Into<String>) -> Self {
        self.status_url = Some(url.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> FpmStatusClient {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        FpmStatusClient {
            client,
            status_url: self
                .status_url
                .unwrap_or_else(|| DEFAULT_STATUS_URL.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// Serve a single canned HTTP response, returning the status URL.
    fn stub_server(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/php-fpm-status")
    }

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn test_builder_defaults() {
        let client = FpmStatusClient::builder().build();
        assert_eq!(client.status_url(), "http://localhost/php-fpm-status");
    }

    #[test]
    fn test_builder_custom() {
        let client = FpmStatusClient::builder()
            .status_url("http://10.0.0.4/fpm-status")
            .timeout(Duration::from_secs(3))
            .build();
        assert_eq!(client.status_url(), "http://10.0.0.4/fpm-status");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let url = stub_server(http_response("500 Internal Server Error", ""));
        let client = FpmStatusClient::builder().status_url(url).build();

        match client.fetch().await.unwrap_err() {
            FetchError::Status(status) => assert_eq!(status.as_u16(), 500),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_empty_body() {
        // A 200 with nothing in it means the status page is misconfigured.
        let url = stub_server(http_response("200 OK", ""));
        let client = FpmStatusClient::builder().status_url(url).build();

        assert!(matches!(
            client.fetch().await.unwrap_err(),
            FetchError::EmptyBody
        ));
    }

    #[tokio::test]
    async fn test_fetch_whitespace_only_body() {
        let url = stub_server(http_response("200 OK", " \n \n"));
        let client = FpmStatusClient::builder().status_url(url).build();

        assert!(matches!(
            client.fetch().await.unwrap_err(),
            FetchError::EmptyBody
        ));
    }

    #[tokio::test]
    async fn test_collect_parses_fetched_report() {
        let url = stub_server(http_response("200 OK", "pool: www\nidle processes: 6\n"));
        let client = FpmStatusClient::builder().status_url(url).build();

        let status = client.collect().await.unwrap();
        assert_eq!(status.pool(), Some("www"));
        assert_eq!(status.get("idle_processes"), Some("6"));
    }
}
