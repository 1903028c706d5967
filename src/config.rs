//! Service configuration.
//!
//! One explicit [`ServiceConfig`] is constructed at startup (from the
//! environment or programmatically) and passed by reference into the
//! pipeline. No module reads ambient environment state after construction.

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::error::{MergeError, Result};

/// Default scratch root when `DOC_STORAGE_PATH` is unset.
pub const DEFAULT_SCRATCH_DIR: &str = "/tmp/doc-merge";
/// Default target bucket when `STORAGE_BUCKET` is unset.
pub const DEFAULT_BUCKET: &str = "doc-output";
/// Default output-path prefix when `OUTPUT_PREFIX` is unset.
pub const DEFAULT_OUTPUT_PREFIX: &str = "manuals";
/// Default per-request network timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Everything the pipeline needs to run one or more merge jobs.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Root directory for per-job scratch arenas. Created if absent.
    pub scratch_dir: PathBuf,
    /// Base URL of the object store (up to, not including, `/object/...`).
    pub store_url: String,
    /// Service credential sent as both bearer token and api key.
    pub service_key: String,
    /// Target bucket for published documents.
    pub bucket: String,
    /// Prefix for default output paths (`<prefix>/<job_id>.docx`).
    pub output_prefix: String,
    /// Bounded timeout applied to each network operation.
    pub fetch_timeout: Duration,
}

impl ServiceConfig {
    /// Build the configuration from environment variables, loading `.env`
    /// first if present.
    ///
    /// `OBJECT_STORE_URL` and `OBJECT_STORE_SERVICE_KEY` are required; their
    /// absence is a configuration error, not a retryable condition. The
    /// remaining keys fall back to defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let store_url = require_env("OBJECT_STORE_URL")?;
        let service_key = require_env("OBJECT_STORE_SERVICE_KEY")?;

        let scratch_dir = std::env::var("DOC_STORAGE_PATH")
            .unwrap_or_else(|_| DEFAULT_SCRATCH_DIR.to_string())
            .into();
        let bucket =
            std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string());
        let output_prefix =
            std::env::var("OUTPUT_PREFIX").unwrap_or_else(|_| DEFAULT_OUTPUT_PREFIX.to_string());
        let fetch_timeout_secs = match std::env::var("FETCH_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                MergeError::configuration(format!("FETCH_TIMEOUT_SECS is not an integer: {e}"))
            })?,
            Err(_) => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        Ok(ServiceConfig {
            scratch_dir,
            store_url,
            service_key,
            bucket,
            output_prefix,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
        })
    }

    /// Emit a structured event describing the loaded configuration.
    /// The service credential is never logged.
    pub fn trace_loaded(&self) {
        info!(
            scratch_dir = %self.scratch_dir.display(),
            store_url = %self.store_url,
            bucket = %self.bucket,
            output_prefix = %self.output_prefix,
            fetch_timeout_secs = self.fetch_timeout.as_secs(),
            "Loaded ServiceConfig"
        );
    }
}

fn require_env(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(MergeError::configuration(format!("{key} is required"))),
    }
}
