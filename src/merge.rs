//! High-level pipeline: orchestrates fetch → compose → publish for one job.
//!
//! Each job is a single pass through the stages Validating, FetchingTemplate,
//! FetchingModules, Composing, Publishing; the first failure aborts the
//! pipeline immediately and nothing partial is ever published (publishing is
//! the last step). No state survives across jobs or restarts.
//!
//! Module fetches run concurrently but result ordering is fixed by URL index,
//! so concatenation order always matches the request. The per-job scratch
//! arena is dropped on every exit path, failures included.

use std::path::PathBuf;

use futures::future::try_join_all;
use tracing::{error, info};

use crate::compose::{compose, DocumentEngine, SourceDocument};
use crate::config::ServiceConfig;
use crate::contract::{DocumentSource, Health, JobResult, MergeRequest, ObjectStore};
use crate::docx::DOCX_EXTENSION;
use crate::error::{MergeError, Result};
use crate::scratch::ScratchArena;

/// Liveness check: a fixed healthy status, no dependencies touched.
pub fn health() -> Health {
    Health {
        status: "ok".to_string(),
    }
}

/// Run one merge job end to end and return its [`JobResult`].
pub async fn merge<S, O, E>(
    config: &ServiceConfig,
    source: &S,
    store: &O,
    engine: &E,
    request: &MergeRequest,
) -> Result<JobResult>
where
    S: DocumentSource,
    O: ObjectStore,
    E: DocumentEngine,
{
    info!(
        job_id = %request.job_id,
        modules = request.module_urls.len(),
        "[MERGE] Starting merge job"
    );

    // --- Validating ---
    if request.module_urls.is_empty() {
        error!(job_id = %request.job_id, "[MERGE][ERROR] Request has no module URLs");
        return Err(MergeError::validation("module_urls is required"));
    }
    let output_path = effective_output_path(config, request);

    let arena = ScratchArena::create(&config.scratch_dir, &request.job_id)?;

    // --- FetchingTemplate ---
    info!(job_id = %request.job_id, url = %request.template_url, "[MERGE] Fetching template");
    let template_path = arena.unique_file("template", DOCX_EXTENSION);
    source.fetch(&request.template_url, &template_path).await?;

    // --- FetchingModules ---
    // Concurrent fetches into distinct scratch files; ordering is fixed by
    // URL index, not fetch-completion order. Fail-fast on the first error.
    info!(job_id = %request.job_id, "[MERGE] Fetching module documents");
    let module_paths: Vec<PathBuf> = (0..request.module_urls.len())
        .map(|i| arena.unique_file(&format!("module_{i:03}"), DOCX_EXTENSION))
        .collect();
    let fetches = request
        .module_urls
        .iter()
        .zip(&module_paths)
        .map(|(url, path)| source.fetch(url, path));
    try_join_all(fetches).await?;

    // --- Composing ---
    let template = SourceDocument {
        source_url: request.template_url.clone(),
        bytes: read_scratch(&template_path).await?,
    };
    let mut modules = Vec::with_capacity(request.module_urls.len());
    for (url, path) in request.module_urls.iter().zip(&module_paths) {
        modules.push(SourceDocument {
            source_url: url.clone(),
            bytes: read_scratch(path).await?,
        });
    }
    let composed = compose(engine, &template, &modules)?;
    info!(
        job_id = %request.job_id,
        modules_merged = composed.modules_merged,
        "[MERGE] Compose succeeded"
    );

    // --- Publishing ---
    info!(job_id = %request.job_id, path = %output_path, "[MERGE] Publishing merged document");
    let output = store.put_object(&output_path, &composed.bytes).await?;

    info!(
        job_id = %request.job_id,
        bucket = %output.bucket,
        path = %output.path,
        size_bytes = output.size_bytes,
        "[MERGE] Job succeeded"
    );
    Ok(JobResult {
        job_id: request.job_id.clone(),
        output,
    })
}

/// Explicit override, or `<prefix>/<job_id>.docx` derived from configuration.
fn effective_output_path(config: &ServiceConfig, request: &MergeRequest) -> String {
    match &request.output_path {
        Some(path) => path.clone(),
        None => format!(
            "{}/{}.{}",
            config.output_prefix, request.job_id, DOCX_EXTENSION
        ),
    }
}

async fn read_scratch(path: &std::path::Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| MergeError::io(path, e))
}
