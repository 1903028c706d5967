//! # contract: data model and capability seams for the merge pipeline
//!
//! This module defines the payload types exchanged with callers and the two
//! async traits the orchestrator depends on for network I/O:
//!
//! - [`DocumentSource`] retrieves a remote document into scratch storage.
//! - [`ObjectStore`] durably stores merged bytes at a bucket path.
//!
//! ## Interface & Extensibility
//! - Implement [`DocumentSource`] / [`ObjectStore`] to add transports; the
//!   shipped implementations live in `fetch` and `publish`.
//! - All methods are async and return the crate's typed [`MergeError`].
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall`, so the test suite can drive the
//!   orchestrator with deterministic mocks and assert call counts (e.g. that
//!   a rejected request performs no network I/O at all).

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::Result;

/// A request to merge one template with an ordered list of module documents.
///
/// `module_urls` order defines the concatenation order and is preserved
/// end-to-end. An empty list is rejected during validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Opaque caller-supplied identifier, echoed back in the result and used
    /// for the default output path.
    pub job_id: String,
    /// URL of the template (host) document.
    pub template_url: String,
    /// URLs of the module documents, in merge order.
    pub module_urls: Vec<String>,
    /// Destination path override; defaults to `<prefix>/<job_id>.docx`.
    #[serde(default)]
    pub output_path: Option<String>,
}

/// Describes the durable artifact written by a publish.
///
/// Immutable once returned. A later merge to the same path overwrites it
/// (upsert semantics, last-writer-wins, no versioning).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageObject {
    pub bucket: String,
    pub path: String,
    pub content_type: String,
    /// Exact byte length sent, for caller-side verification.
    pub size_bytes: u64,
}

/// Terminal result of one merge job. Not persisted by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub job_id: String,
    pub output: StorageObject,
}

/// Fixed payload returned by the liveness check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

/// Trait for retrieving a remote document into local scratch storage.
///
/// Implementors write the response body verbatim to `dest`, whatever content
/// type the remote serves. A non-success transfer, timeout, or unreachable
/// URL is a [`MergeError::Fetch`]. No retry is performed: a single failed
/// fetch fails the whole job.
///
/// [`MergeError::Fetch`]: crate::error::MergeError::Fetch
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch `url` and write its body to the scratch file at `dest`.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Trait for durably storing merged document bytes in the object store.
///
/// One idempotent create-or-replace write per call; the whole buffer is sent
/// in a single request, no multipart semantics.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upsert `bytes` at `path` within the configured bucket and return the
    /// resulting [`StorageObject`].
    async fn put_object(&self, path: &str, bytes: &[u8]) -> Result<StorageObject>;
}
