pub mod compose;
pub mod config;
pub mod contract;
pub mod docx;
pub mod error;
pub mod fetch;
pub mod merge;
pub mod publish;
pub mod scratch;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::ServiceConfig;
use crate::contract::MergeRequest;
use crate::docx::DocxEngine;
use crate::fetch::HttpDocumentSource;
use crate::publish::HttpObjectStore;

/// CLI for doc-merge: fetch, compose, and publish document bundles.
#[derive(Parser)]
#[clap(
    name = "doc-merge",
    version,
    about = "Merge a template document with ordered module documents and publish the result to the object store"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one merge job described by a JSON request file
    Merge {
        /// Path to a JSON file holding the merge request
        #[clap(long)]
        request: PathBuf,
    },
    /// Print the liveness status
    Health,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Merge { request } => {
            let raw = std::fs::read_to_string(&request)
                .with_context(|| format!("failed to read request file {request:?}"))?;
            let merge_request: MergeRequest = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse merge request {request:?}"))?;

            let config = ServiceConfig::from_env()?;
            config.trace_loaded();

            let source = HttpDocumentSource::new(config.fetch_timeout)?;
            let store = HttpObjectStore::new(&config)?;

            println!("Merge starting...");
            match merge::merge(&config, &source, &store, &DocxEngine, &merge_request).await {
                Ok(result) => {
                    println!("Merge complete.\nResult:");
                    println!("{}", serde_json::to_string_pretty(&result)?);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Merge failed: {e}");
                    Err(e.into())
                }
            }
        }
        Commands::Health => {
            println!("{}", serde_json::to_string(&merge::health())?);
            Ok(())
        }
    }
}
