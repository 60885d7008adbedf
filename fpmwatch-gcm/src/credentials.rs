//! Service account credential resolution.
//!
//! Only the project identity is taken from the credentials file; minting
//! OAuth tokens from the private key is delegated to external tooling
//! (e.g. `gcloud auth print-access-token`), not reimplemented here.

use std::path::Path;

use serde::Deserialize;

use crate::CredentialsError;

/// Environment variable naming the service account JSON file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// The subset of a Google service account key file that fpmwatch needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Project the custom metrics are published under.
    pub project_id: String,

    /// Service account email, if present. Informational only.
    #[serde(default)]
    pub client_email: Option<String>,
}

impl ServiceAccountKey {
    /// Load the key file named by [`CREDENTIALS_ENV`].
    pub fn from_env() -> Result<Self, CredentialsError> {
        let path = std::env::var(CREDENTIALS_ENV)
            .map_err(|_| CredentialsError::MissingEnv(CREDENTIALS_ENV))?;
        Self::from_file(Path::new(&path))
    }

    /// Load a key file from an explicit path.
    pub fn from_file(path: &Path) -> Result<Self, CredentialsError> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            CredentialsError::Unreadable {
                path: path.display().to_string(),
                source,
            }
        })?;
        serde_json::from_str(&contents).map_err(|source| CredentialsError::Invalid {
            path: path.display().to_string(),
            source,
        })
    }
}
