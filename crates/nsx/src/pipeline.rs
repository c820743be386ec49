//! 🚚 The bulk ingestion pipeline — the part of this tool that earns its keep.
//!
//! 🎬 COLD OPEN — INT. TERMINAL — A BATCH JOB, RUNNING
//!
//! 497... 498... 499... 500. The batch is full. The payload ships. The
//! counter resets. Somewhere in the file there are 700 more articles, and
//! every single one of them believes it is front-page material.
//!
//! 🧠 Knowledge graph:
//! - **Lifecycle**: accumulate → flush at the batch threshold → accumulate →
//!   ... → drain the remainder at end of input → done. The drain is guarded:
//!   an exact multiple of the batch size leaves an empty batch behind, and
//!   an empty batch is never submitted.
//! - **Append step**: validate the id, normalize the publication date
//!   (fatal on mismatch — no per-record skipping), render the action line
//!   and the document line, grow the NDJSON payload.
//! - **Flush step**: one `/_bulk` POST, strictly sequential — batch N+1 is
//!   not built-and-sent until batch N's response is digested, because later
//!   records may overwrite earlier ids and overwrite order is sacred.
//! - **Verdict**: a response with `errors: true` fails the whole run on the
//!   first item that carries a structured error. Documents flushed before
//!   the failure stay written — the store's own per-document semantics,
//!   not ours to undo.
//!
//! Ancient proverb: "He who retries a bulk request without idempotent ids,
//! greps for duplicates at dawn." Our ids are explicit. We still don't retry.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::articles::Article;
use crate::dates;
use crate::progress::IngestProgress;
use crate::store::NewsStore;

/// 🗺️ The derived geo field: latitude/longitude folded into the shape the
/// `geo_point` mapping wants.
#[derive(Debug, Serialize)]
struct GeoPoint {
    lat: f64,
    lon: f64,
}

/// 📄 The document as stored — every article field plus the derived
/// `location`, with the publication date already normalized. Borrows from
/// the article; nothing is cloned that doesn't have to be.
#[derive(Debug, Serialize)]
struct NewsDocument<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
    url: &'a str,
    publication_date: String,
    source_name: &'a str,
    category: &'a [String],
    relevance_score: f64,
    latitude: f64,
    longitude: f64,
    location: GeoPoint,
    /// 📄 Omitted when absent — the strict mapping knows the field, but an
    /// article without a summary stores no summary, not a null.
    #[serde(skip_serializing_if = "Option::is_none")]
    llm_summary: Option<&'a str>,
}

/// 📦 One bulk request under construction: an NDJSON payload plus a count
/// of the documents in it. Created empty, grows by append, flushed and
/// reset at the threshold or at end of input.
struct BulkBatch {
    payload: String,
    pending_docs: usize,
}

impl BulkBatch {
    fn new() -> Self {
        Self {
            payload: String::new(),
            pending_docs: 0,
        }
    }

    /// ✍️ Renders one article into the sacred two-line bulk format and
    /// appends it: action metadata addressed to (index, id), then the
    /// document body. Fails on an empty id or an unparseable date — and a
    /// failure here fails the run, by policy.
    fn append(&mut self, index: &str, article: &Article) -> Result<()> {
        if article.id.is_empty() {
            bail!(
                "💀 An article arrived with an empty id. The id is the document \
                 key and the whole idempotency story — there is no sensible way \
                 to index an anonymous article, so the run stops here."
            );
        }

        let publication_date = dates::normalize_publication_date(&article.publication_date)
            .with_context(|| {
                format!("💀 Article '{}' has an unusable publication_date.", article.id)
            })?;

        let action = json!({ "index": { "_index": index, "_id": article.id } });
        let document = NewsDocument {
            id: &article.id,
            title: &article.title,
            description: &article.description,
            url: &article.url,
            publication_date,
            source_name: &article.source_name,
            category: &article.category,
            relevance_score: article.relevance_score,
            latitude: article.latitude,
            longitude: article.longitude,
            location: GeoPoint {
                lat: article.latitude,
                lon: article.longitude,
            },
            llm_summary: article.llm_summary.as_deref(),
        };

        // 🔗 Two lines per document. Newline-delimited. The bulk API is
        // watching. Always watching.
        self.payload.push_str(&action.to_string());
        self.payload.push('\n');
        self.payload.push_str(&serde_json::to_string(&document).with_context(|| {
            format!("💀 Article '{}' refused to serialize. That should be impossible.", article.id)
        })?);
        self.payload.push('\n');
        self.pending_docs += 1;
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.pending_docs == 0
    }

    fn len(&self) -> usize {
        self.pending_docs
    }

    /// 🗑️ Hands over the payload and resets the batch to empty in one move.
    fn take_payload(&mut self) -> String {
        self.pending_docs = 0;
        std::mem::take(&mut self.payload)
    }
}

/// 🚚 Ingest every article, in order, in batches of `batch_size`.
///
/// Returns the number of records submitted — which on success is all of
/// them, because there is no partial-success mode. Any failure anywhere
/// (bad date, empty id, transport, per-item rejection) aborts the rest.
pub(crate) async fn ingest<S: NewsStore>(
    store: &S,
    index: &str,
    batch_size: usize,
    articles: &[Article],
    progress: &IngestProgress,
) -> Result<usize> {
    let mut batch = BulkBatch::new();

    for article in articles {
        batch.append(index, article)?;
        // 🔄 Threshold reached → flush before touching the next record.
        if batch.len() >= batch_size {
            flush(store, &mut batch, progress).await?;
        }
    }

    // 🏁 Drain the remainder. A no-op when the input length was an exact
    // multiple of the batch size — the guard lives in flush().
    flush(store, &mut batch, progress).await?;

    Ok(articles.len())
}

/// 📡 Submit the current batch, digest the verdict, clear the state.
///
/// An empty batch succeeds trivially. Otherwise: one POST, one parsed
/// response, and if `errors` is set, the first item with a structured
/// error sinks the run — no tally of how many others failed (first-error
/// policy; DESIGN.md holds the open question).
async fn flush<S: NewsStore>(
    store: &S,
    batch: &mut BulkBatch,
    progress: &IngestProgress,
) -> Result<()> {
    if batch.is_empty() {
        return Ok(());
    }

    let docs = batch.len();
    let response = store
        .bulk(batch.take_payload())
        .await
        .context("💀 A bulk flush failed in transit. Everything before it is durably written; nothing after it was attempted.")?;

    if response.errors {
        if let Some(failure) = response.first_failure() {
            let detail = failure
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            bail!(
                "💀 The cluster accepted the bulk request but rejected a document \
                 (status {}): {}. One bad apple stops the shipment.",
                failure.status,
                detail
            );
        }
        // ⚠️ errors=true with no item detail shouldn't happen per the wire
        // contract; if it does, believing the flag is the safe reading.
        bail!("💀 The bulk response flagged errors but itemized none. Distrust and abort.");
    }

    debug!("✅ flushed {} documents to /_bulk", docs);
    progress.batch_flushed(docs);
    Ok(())
}
