//! # fpmwatch-fpm
//!
//! HTTP client for the PHP-FPM status endpoint.
//!
//! Fetches the plain-text status report served by FPM's `pm.status_path`
//! and parses it into an [`FpmStatus`] snapshot.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fpmwatch_fpm::FpmStatusClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FpmStatusClient::builder()
//!         .status_url("http://localhost/php-fpm-status")
//!         .build();
//!
//!     let status = client.collect().await?;
//!     println!("pool {:?} has {} fields", status.pool(), status.len());
//!     Ok(())
//! }
//! ```

mod client;
mod error;

pub use client::{FpmStatusClient, FpmStatusClientBuilder};
pub use error::FetchError;

// Re-export the snapshot type for convenience
pub use fpmwatch_types::FpmStatus;
