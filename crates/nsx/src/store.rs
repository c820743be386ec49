//! 📡 Store — the three conversations we ever have with Elasticsearch.
//!
//! 🎬 *[INT. CLUSTER — PORT 9200 — MOMENTS BEFORE A BULK REQUEST]*
//! *[the payload is rendered. the auth header is set. somewhere, a shard waits.]*
//!
//! 🧠 Knowledge graph:
//! - **Trait**: `NewsStore` — existence check, index create, bulk write. That's
//!   the entire protocol surface this tool consumes. Nothing else.
//! - **Impl**: `ElasticsearchStore` — reqwest with connect/read timeouts,
//!   basic auth on every request, optional self-signed-cert tolerance.
//! - **Wire**: `/_bulk` takes NDJSON (`application/x-ndjson` — the `x-` means
//!   "we made this up but we're committing to it") and answers with
//!   `{errors: bool, items: [...]}`. `BulkResponse` models exactly that.
//! - **No retries.** A failed request is a failed run. The tool is re-runnable
//!   by design — every document carries its own id, so re-running overwrites.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::app_config::ElasticsearchConfig;

/// 📜 The destination store, reduced to the three operations ingestion needs.
///
/// A trait so the pipeline can be exercised against a recording double in
/// tests instead of a live cluster. The seam sits exactly at the network
/// boundary — everything on this side is deterministic.
#[async_trait]
pub(crate) trait NewsStore {
    /// 🔎 Does the index exist? `Ok(true)` / `Ok(false)` when the cluster
    /// answered, `Err` when we couldn't even ask.
    async fn index_exists(&self, index: &str) -> Result<bool>;
    /// 🏗️ Create the index with the given settings-and-mappings body.
    async fn create_index(&self, index: &str, body: &Value) -> Result<()>;
    /// 📡 Submit one rendered NDJSON payload to `/_bulk` and parse the answer.
    async fn bulk(&self, payload: String) -> Result<BulkResponse>;
}

/// 📦 What `/_bulk` says back: a top-level "did anything fail" flag and one
/// entry per submitted item, keyed by action name (`"index"` for us).
#[derive(Debug, Deserialize)]
pub(crate) struct BulkResponse {
    #[serde(default)]
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<HashMap<String, BulkItemDetail>>,
}

/// 📄 Per-item verdict. `error` is present only when the store rejected
/// that document — absent, not null, on success.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BulkItemDetail {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub error: Option<Value>,
}

impl BulkResponse {
    /// 🔎 Scans the items in order and returns the first one carrying a
    /// structured error, if any. First failure only — the caller fails the
    /// run on it and never reads the rest.
    pub(crate) fn first_failure(&self) -> Option<&BulkItemDetail> {
        self.items
            .iter()
            .flat_map(|item| item.values())
            .find(|detail| detail.error.is_some())
    }
}

/// 📡 The real thing: HTTP against a live cluster.
///
/// Holds one `reqwest::Client` (connection pool included) and the connection
/// config. Every request re-applies basic auth — stateless, boring, correct.
#[derive(Debug)]
pub(crate) struct ElasticsearchStore {
    client: reqwest::Client,
    config: ElasticsearchConfig,
}

impl ElasticsearchStore {
    /// 🚀 Build the HTTP client. 10 second connect timeout because if the
    /// cluster can't handshake in 10 seconds, it's not having a good time
    /// and neither are we. 30 second request timeout because bulk bodies
    /// can be meaty and we're not monsters.
    ///
    /// ⚠️ `insecure_skip_tls_verify` maps straight onto
    /// `danger_accept_invalid_certs`. The method name starts with "danger"
    /// for a reason. The config field defaults to false for the same reason.
    pub(crate) fn new(config: ElasticsearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(config.insecure_skip_tls_verify)
            .build()
            .context(
                "💀 The HTTP client refused to be born. Probably a missing TLS \
                 cert store or a cursed system OpenSSL. Either way: tragic, and \
                 fatal — there is no ingesting without a client.",
            )?;
        Ok(Self { client, config })
    }

    // 🔧 "/" hygiene: without the trim, `https://host//news`. One slash of
    // difference. Infinite suffering of difference.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.url.trim_end_matches('/'), path)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.config.username, Some(&self.config.password))
    }
}

#[async_trait]
impl NewsStore for ElasticsearchStore {
    /// 🔎 HEAD `/{index}` — the cheapest question you can ask a cluster.
    /// 2xx means it's there. 404 means it isn't. Anything in between is
    /// still "isn't" as far as this check is concerned.
    async fn index_exists(&self, index: &str) -> Result<bool> {
        let response = self
            .authed(self.client.head(self.endpoint(index)))
            .send()
            .await
            .with_context(|| {
                format!(
                    "💀 Reached out to ask whether index '{index}' exists. Got \
                     ghosted. The network is giving us the silent treatment, or \
                     the cluster is simply not home."
                )
            })?;
        let exists = response.status().is_success();
        debug!("🔎 index '{}' exists: {}", index, exists);
        Ok(exists)
    }

    /// 🏗️ PUT `/{index}` with the declarative settings-and-mappings body.
    async fn create_index(&self, index: &str, body: &Value) -> Result<()> {
        let response = self
            .authed(self.client.put(self.endpoint(index)))
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .with_context(|| format!("💀 The create request for index '{index}' never arrived."))?;

        let status = response.status();
        if !status.is_success() {
            // 💀 The cluster answered, and the answer was a lecture. The body
            // usually names the exact mapping line it disapproves of.
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "💀 Creating index '{index}' came back {status}. The cluster said: '{detail}'."
            );
        }
        Ok(())
    }

    /// 📡 POST `/_bulk` with a rendered NDJSON payload.
    ///
    /// ⚠️ Content-Type: application/x-ndjson — not application/json. VERY
    /// important. The cluster will return a 406 or silently misbehave
    /// without this header.
    ///
    /// A non-2xx here is transport-level failure and fails the run. A 2xx
    /// with `errors: true` inside is the *caller's* problem — per-item
    /// verdicts are pipeline policy, not I/O policy.
    async fn bulk(&self, payload: String) -> Result<BulkResponse> {
        trace!("📡 sending {} bytes to /_bulk", payload.len());
        let response = self
            .authed(self.client.post(self.endpoint("_bulk")))
            .header("Content-Type", "application/x-ndjson")
            .body(payload)
            .send()
            .await
            .context(
                "💀 The bulk request never made it to the cluster. We launched \
                 the payload into the network and the network responded with \
                 what can only be described as 'not vibing with it'.",
            )?;

        let status = response.status();
        let body = response.text().await.context(
            "💀 The bulk response started arriving and then... stopped. A \
             half-received answer is no answer.",
        )?;
        if !status.is_success() {
            anyhow::bail!(
                "💀 The bulk request arrived, but the cluster looked at our \
                 documents and said '{status}'. The body read: '{body}'."
            );
        }

        serde_json::from_str(&body).context(
            "💀 The cluster said 200 and then sent something that is not a \
             bulk response. We have questions. It has no answers.",
        )
    }
}
