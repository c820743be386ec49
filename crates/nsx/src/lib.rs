//! 📰 nsx — one-shot loader: a JSON file of news articles goes in, an
//! Elasticsearch index comes out.
//!
//! The whole run, in order: build the client, make sure the index exists
//! (create it with the proper mapping if not), load the articles, bulk
//! them in batches, report the damage. Then exit. No daemon. No loop.
//! The most underrated feature of this tool is that it stops running.

pub mod app_config;
mod articles;
mod dates;
mod mapping;
mod pipeline;
mod progress;
mod report;
mod store;

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::app_config::AppConfig;
pub use crate::report::IngestSummary;

/// 🚀 The run. Everything fatal bubbles out of here as an error; the one
/// deliberate exception is index creation, which is logged and shrugged
/// off so ingestion can try its luck regardless.
pub async fn run(config: AppConfig) -> Result<IngestSummary> {
    let AppConfig { elasticsearch, ingest } = config;

    let store = store::ElasticsearchStore::new(elasticsearch)
        .context("💀 Could not construct the Elasticsearch client. Nothing else can happen.")?;

    // 🗺️ Provision the schema before any document moves. A creation failure
    // is logged, not fatal — the run continues against whatever index the
    // cluster auto-conjures. Asymmetric on purpose; DESIGN.md has the receipts.
    if let Err(err) = mapping::ensure(&store, &ingest.index).await {
        error!("⚠️ could not provision index '{}': {err:#} — continuing anyway", ingest.index);
    }

    let started = Instant::now();

    let articles = articles::load_articles(&ingest.file_name)
        .await
        .context("💀 Could not load the article feed. The run ends before it began.")?;
    info!("📂 loaded {} articles from '{}'", articles.len(), ingest.file_name);

    let progress = progress::IngestProgress::new(articles.len() as u64);
    let indexed = pipeline::ingest(&store, &ingest.index, ingest.batch_size, &articles, &progress)
        .await
        .context("💀 Bulk ingestion failed. Batches flushed before the failure stay written.")?;
    progress.finish();

    let summary = IngestSummary {
        articles_indexed: indexed,
        elapsed: started.elapsed(),
    };
    info!(
        "✅ indexed {} articles in {} ms",
        summary.articles_indexed,
        summary.elapsed.as_millis()
    );
    Ok(summary)
}
