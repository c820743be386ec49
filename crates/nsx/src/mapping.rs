//! 🗺️ Mapping — the index schema, declared once, provisioned idempotently.
//!
//! The body below is the whole contract between the articles and the
//! analyzers. Strict dynamic mapping, so a typo'd field name is a loud
//! per-item rejection instead of a silently polluted index.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::store::NewsStore;

/// 📜 Settings and mappings for the news index.
///
/// - `news_text`: standard tokenizer + lowercase + stop + english stemmer,
///   shared by every full-text field so "elections" finds "election".
/// - `keyword_lowercase`: a normalizer so keyword sub-fields compare
///   case-insensitively (source names arrive in every capitalization
///   known to journalism).
/// - `location`: a geo_point derived from latitude/longitude at write
///   time. The raw floats are also kept as separate fields.
pub(crate) fn settings_and_mappings() -> Value {
    json!({
        "settings": {
            "analysis": {
                "analyzer": {
                    "news_text": {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", "stop", "english_stemmer"]
                    }
                },
                "filter": {
                    "english_stemmer": {
                        "type": "stemmer",
                        "language": "english"
                    }
                },
                "normalizer": {
                    "keyword_lowercase": {
                        "type": "custom",
                        "filter": ["lowercase"]
                    }
                }
            }
        },
        "mappings": {
            "dynamic": "strict",
            "properties": {
                "id": { "type": "keyword" },
                "url": { "type": "keyword", "ignore_above": 2048 },
                "title": {
                    "type": "text",
                    "analyzer": "news_text",
                    "fields": {
                        "keyword": { "type": "keyword", "ignore_above": 256 }
                    }
                },
                "description": { "type": "text", "analyzer": "news_text" },
                "llm_summary": { "type": "text", "analyzer": "news_text" },
                "source_name": {
                    "type": "text",
                    "analyzer": "news_text",
                    "fields": {
                        "keyword": { "type": "keyword", "normalizer": "keyword_lowercase" }
                    }
                },
                "category": {
                    "type": "text",
                    "analyzer": "news_text",
                    "fields": {
                        "keyword": { "type": "keyword", "normalizer": "keyword_lowercase" }
                    }
                },
                "publication_date": { "type": "date" },
                "location": { "type": "geo_point" },
                "relevance_score": { "type": "float" },
                "latitude": { "type": "float" },
                "longitude": { "type": "float" }
            }
        }
    })
}

/// 🏗️ Make sure the index exists before any document heads its way.
///
/// Idempotent: an index that already exists is a success and a no-op.
///
/// ⚠️ Deliberate asymmetry, inherited with eyes open (see DESIGN.md):
/// - A *failed existence check* is swallowed with a warning — we proceed
///   to the create attempt, which will render its own verdict.
/// - A *failed create* is returned as an error; the driver logs it and
///   keeps going, letting ingestion try its luck against whatever index
///   the cluster conjures up.
pub(crate) async fn ensure<S: NewsStore>(store: &S, index: &str) -> Result<()> {
    match store.index_exists(index).await {
        Ok(true) => {
            debug!("✅ index '{}' already exists — nothing to provision", index);
            return Ok(());
        }
        Ok(false) => {}
        Err(err) => {
            // ⚠️ Couldn't even ask. Try the create anyway and let it speak.
            warn!(
                "⚠️ existence check for index '{}' failed ({err:#}) — attempting create regardless",
                index
            );
        }
    }

    store
        .create_index(index, &settings_and_mappings())
        .await
        .with_context(|| format!("💀 Could not create index '{index}' with its mapping."))?;

    info!("✅ index '{}' created with settings and mappings", index);
    Ok(())
}
