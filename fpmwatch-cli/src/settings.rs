//! Settings file handling.
//!
//! fpmwatch reads a small TOML file naming the pool's status endpoint:
//!
//! ```toml
//! [pool]
//! status_url = "http://localhost/php-fpm-status"
//! timeout_secs = 10   # optional
//! ```

use std::path::Path;

use config::{Config, ConfigError};
use serde::Deserialize;

/// Top-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub pool: PoolSettings,
}

/// Settings for the monitored pool.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolSettings {
    /// URL of the FPM status page.
    pub status_url: String,

    /// HTTP timeout for the status fetch, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()
    }
}
