//! HTTP implementation of [`ObjectStore`].

use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};

use crate::config::ServiceConfig;
use crate::contract::{ObjectStore, StorageObject};
use crate::docx::DOCX_CONTENT_TYPE;
use crate::error::{MergeError, Result};

/// Publishes merged documents with a single create-or-replace POST to
/// `<store-base>/object/<bucket>/<path>?upsert=true`, authenticated with the
/// service credential as both bearer token and api key.
#[derive(Debug)]
pub struct HttpObjectStore {
    client: Client,
    store_url: String,
    bucket: String,
    service_key: String,
}

impl HttpObjectStore {
    /// Build a store client from the service configuration.
    ///
    /// Missing credentials fail here, before any network attempt is made.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        if config.store_url.trim().is_empty() {
            return Err(MergeError::configuration("object store URL is required"));
        }
        if config.service_key.trim().is_empty() {
            return Err(MergeError::configuration(
                "object store service key is required",
            ));
        }
        if config.bucket.trim().is_empty() {
            return Err(MergeError::configuration("storage bucket is required"));
        }

        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| {
                MergeError::configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(HttpObjectStore {
            client,
            store_url: config.store_url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            service_key: config.service_key.clone(),
        })
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put_object(&self, path: &str, bytes: &[u8]) -> Result<StorageObject> {
        let object_path = path.trim_start_matches('/');
        let url = format!(
            "{}/object/{}/{}?upsert=true",
            self.store_url, self.bucket, object_path
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header(reqwest::header::CONTENT_TYPE, DOCX_CONTENT_TYPE)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| MergeError::publish(object_path, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to decode response body>"));
            error!(path = object_path, %status, body = %body, "Object store rejected write");
            return Err(MergeError::publish(
                object_path,
                format!("store returned HTTP {status}"),
            ));
        }

        info!(
            bucket = %self.bucket,
            path = object_path,
            size_bytes = bytes.len(),
            "Published merged document"
        );

        Ok(StorageObject {
            bucket: self.bucket.clone(),
            path: object_path.to_string(),
            content_type: DOCX_CONTENT_TYPE.to_string(),
            size_bytes: bytes.len() as u64,
        })
    }
}
