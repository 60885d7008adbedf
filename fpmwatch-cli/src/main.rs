//! fpmwatch - publish PHP-FPM pool status metrics to Google Cloud Monitoring.
//!
//! Intended to run unattended from cron or a systemd timer, e.g. every
//! five minutes:
//!
//! ```bash
//! GOOGLE_APPLICATION_CREDENTIALS=/etc/fpmwatch/service-account.json \
//! GOOGLE_OAUTH_ACCESS_TOKEN=$(gcloud auth print-access-token) \
//!     fpmwatch --config /etc/fpmwatch/fpmwatch.toml
//! ```
//!
//! Each invocation fetches the status page once, maps it to the fixed
//! metric catalogue, and writes one batch of time series. With `--delete`
//! it removes the registered metric descriptors instead. There is no
//! retry or backoff; a failed run exits nonzero and the next timer tick
//! tries again.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fpmwatch_fpm::FpmStatusClient;
use fpmwatch_gcm::{GcmClient, MetricPublisher, ServiceAccountKey, ACCESS_TOKEN_ENV};
use fpmwatch_types::{map_snapshot, FpmStatus};

mod settings;

use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "fpmwatch")]
#[command(about = "Publish PHP-FPM pool status metrics to Google Cloud Monitoring")]
struct Args {
    /// Path to the settings file
    #[arg(short, long, default_value = "fpmwatch.toml")]
    config: PathBuf,

    /// Delete the registered metric descriptors instead of publishing
    #[arg(long)]
    delete: bool,

    /// Print the parsed status snapshot to stdout
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let settings = Settings::load(&args.config)
        .with_context(|| format!("loading settings from '{}'", args.config.display()))?;
    let key = ServiceAccountKey::from_env().context("resolving service account credentials")?;
    let token =
        std::env::var(ACCESS_TOKEN_ENV).map_err(|_| anyhow!("env {ACCESS_TOKEN_ENV} is not set"))?;

    let publisher = GcmClient::builder(key.project_id, token).build();

    if args.delete {
        publisher
            .delete_metric_descriptors()
            .await
            .context("deleting metric descriptors")?;
        info!("deleted metric descriptors");
        return Ok(());
    }

    let fpm = FpmStatusClient::builder()
        .status_url(&settings.pool.status_url)
        .timeout(Duration::from_secs(settings.pool.timeout_secs))
        .build();
    let status = fpm.collect().await.context("fetching pool status")?;

    if args.debug {
        print_snapshot(&status);
    }

    report(&publisher, &status).await
}

/// Register descriptors (idempotent) and write one batch of time series.
///
/// Mapping failures are scoped: each one is logged and the remaining
/// submissions still go out.
async fn report(publisher: &impl MetricPublisher, status: &FpmStatus) -> Result<()> {
    let pool = status.pool().unwrap_or("unknown");

    publisher
        .create_metric_descriptors(pool)
        .await
        .context("registering metric descriptors")?;

    let outcome = map_snapshot(status, Utc::now());
    for err in &outcome.errors {
        warn!("{err}");
    }
    if outcome.submissions.is_empty() {
        warn!(pool = %pool, "status report produced no publishable metrics");
        return Ok(());
    }

    publisher
        .publish(&outcome.submissions)
        .await
        .context("writing time series")?;
    info!(pool = %pool, count = outcome.submissions.len(), "published pool metrics");
    Ok(())
}

fn print_snapshot(status: &FpmStatus) {
    for (key, value) in status.iter() {
        println!("{key}: {value}");
    }
}
