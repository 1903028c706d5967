//! HTTP implementation of [`DocumentSource`].

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::contract::DocumentSource;
use crate::error::{MergeError, Result};

/// User-Agent string for outbound document fetches.
const USER_AGENT: &str = concat!("doc-merge/", env!("CARGO_PKG_VERSION"));

/// Fetches remote documents over plain HTTP(S) GET and writes the body
/// verbatim to scratch storage.
///
/// The client carries a bounded request timeout and a limited redirect
/// policy; a hung remote can never block a job indefinitely.
pub struct HttpDocumentSource {
    client: Client,
}

impl HttpDocumentSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(timeout)
            .build()
            .map_err(|e| {
                MergeError::configuration(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(HttpDocumentSource { client })
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        debug!(url, dest = %dest.display(), "Fetching document");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MergeError::fetch(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MergeError::fetch(url, format!("HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| MergeError::fetch(url, format!("body read failed: {e}")))?;

        tokio::fs::write(dest, &body)
            .await
            .map_err(|e| MergeError::io(dest, e))?;

        info!(url, bytes = body.len(), "Fetched document to scratch");
        Ok(())
    }
}
