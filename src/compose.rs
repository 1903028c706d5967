//! Composer engine: merges module documents onto a template, in order.
//!
//! The binary document format itself stays out of scope here: all container
//! manipulation happens behind [`DocumentEngine`] (load / append / serialize),
//! so tests can substitute an in-memory fake and the shipped `docx` engine
//! owns the real format internals.

use tracing::{debug, info};

use crate::error::{MergeError, Result};

/// Error raised by a document engine. Carries no source attribution; the
/// composer attaches the offending source URL when it propagates.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(msg: impl Into<String>) -> Self {
        EngineError(msg.into())
    }
}

/// Capability seam for the external document library.
///
/// `append` must be equivalent to pasting the module's whole body content at
/// the end of the host document: the host's styles, headers/footers and
/// section properties remain authoritative.
pub trait DocumentEngine: Send + Sync {
    /// In-memory document handle.
    type Doc: Send;

    /// Parse raw bytes into a document handle.
    fn load(&self, bytes: &[u8]) -> std::result::Result<Self::Doc, EngineError>;

    /// Append `module`'s body content onto the end of `host`.
    fn append(&self, host: &mut Self::Doc, module: Self::Doc)
        -> std::result::Result<(), EngineError>;

    /// Serialize a document handle back to bytes.
    fn serialize(&self, doc: Self::Doc) -> std::result::Result<Vec<u8>, EngineError>;
}

/// Source label attached to failures of the final serialize step.
pub const MERGED_DOCUMENT_SOURCE: &str = "merged document";

/// One fetched input: where it came from and its raw bytes.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub source_url: String,
    pub bytes: Vec<u8>,
}

/// The merged output buffer plus the number of modules merged into it.
/// The count is diagnostic only, not part of the contract.
#[derive(Debug, Clone)]
pub struct Composed {
    pub bytes: Vec<u8>,
    pub modules_merged: usize,
}

/// Merge `modules` onto `template` in the given order and serialize once.
///
/// With zero modules the template bytes are returned unchanged, without an
/// engine round-trip: validation upstream rejects empty module lists, but the
/// composer itself must tolerate them. Any load or append failure aborts the
/// merge naming the offending source; partial merges are never returned.
pub fn compose<E: DocumentEngine>(
    engine: &E,
    template: &SourceDocument,
    modules: &[SourceDocument],
) -> Result<Composed> {
    if modules.is_empty() {
        debug!(template = %template.source_url, "No modules; returning template unchanged");
        return Ok(Composed {
            bytes: template.bytes.clone(),
            modules_merged: 0,
        });
    }

    let mut host = engine
        .load(&template.bytes)
        .map_err(|e| MergeError::compose(&template.source_url, e.to_string()))?;

    for module in modules {
        let doc = engine
            .load(&module.bytes)
            .map_err(|e| MergeError::compose(&module.source_url, e.to_string()))?;
        engine
            .append(&mut host, doc)
            .map_err(|e| MergeError::compose(&module.source_url, e.to_string()))?;
        debug!(module = %module.source_url, "Appended module onto host document");
    }

    // At this point the host carries every module's content, so a serialize
    // failure cannot be pinned on any single input.
    let bytes = engine
        .serialize(host)
        .map_err(|e| MergeError::compose(MERGED_DOCUMENT_SOURCE, e.to_string()))?;

    info!(
        modules_merged = modules.len(),
        output_bytes = bytes.len(),
        "Composed merged document"
    );
    Ok(Composed {
        bytes,
        modules_merged: modules.len(),
    })
}
