//! 📰 Articles — the record source. One JSON array on disk, fully
//! materialized into memory before anyone talks to the cluster.
//!
//! 🧠 Knowledge graph:
//! - **Shape**: a single JSON array of article objects, field names below
//! - **Policy**: read once, parse once, hand the whole `Vec` to the pipeline
//! - **Failure modes**: missing file (the path is named in the error) and
//!   malformed content (serde tells you where it lost faith)
//! - The id is the document key downstream — the pipeline enforces non-empty

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::fs;

/// 📦 One news article, exactly as the feed file spells it.
///
/// Every field except `llm_summary` defaults to its zero value when absent,
/// because feeds are assembled by people and people forget fields. The
/// pipeline decides which absences are fatal (an empty `id` is; an empty
/// `title` is just a sad article).
#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    /// ⏱️ Source-format timestamp. Normalized by `dates` before it ever
    /// touches the index — the raw string never ships.
    #[serde(default)]
    pub publication_date: String,
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub relevance_score: f64,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// 📄 Optional machine-written summary. Absent means absent — it is
    /// omitted from the stored document rather than indexed as null.
    #[serde(default)]
    pub llm_summary: Option<String>,
}

/// 📂 Reads the whole article file and parses it as a JSON array.
///
/// No streaming, no partial reads. The batch tool loads the batch.
/// "He who streams a 40 MB file one token at a time, ships next sprint."
pub async fn load_articles(path: impl AsRef<Path>) -> Result<Vec<Article>> {
    let path = path.as_ref();
    let bytes = fs::read(path).await.with_context(|| {
        format!(
            "💀 The article file '{}' would not open. We knocked. We checked \
             the path twice. Either it does not exist or the permissions have \
             opinions about us.",
            path.display()
        )
    })?;

    let articles: Vec<Article> = serde_json::from_slice(&bytes).with_context(|| {
        format!(
            "💀 '{}' exists but is not a JSON array of articles. serde got \
             partway in, saw something it cannot unsee, and left.",
            path.display()
        )
    })?;

    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("💀 temp file refused to exist. the OS is having a day.");
        file.write_all(contents.as_bytes())
            .expect("💀 failed to write the fixture. the disk said no.");
        file
    }

    #[tokio::test]
    async fn the_one_where_a_valid_feed_file_becomes_articles() {
        let file = write_fixture(
            r#"[
                {
                    "id": "art-1",
                    "title": "Local Crab Elected Mayor",
                    "description": "Voters cite strong exoskeleton policy.",
                    "url": "https://news.example/crab",
                    "publication_date": "2024-01-15T10:30:00",
                    "source_name": "The Daily Molt",
                    "category": ["politics", "wildlife"],
                    "relevance_score": 0.93,
                    "latitude": 12.97,
                    "longitude": 77.59,
                    "llm_summary": "A crab won."
                },
                {
                    "id": "art-2",
                    "publication_date": "2024-01-16T08:00:00"
                }
            ]"#,
        );

        let articles = load_articles(file.path()).await.expect("fixture should parse");
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].id, "art-1");
        assert_eq!(articles[0].category, vec!["politics", "wildlife"]);
        assert_eq!(articles[0].llm_summary.as_deref(), Some("A crab won."));
        // 🧪 Sparse article: defaults fill in, summary stays None.
        assert_eq!(articles[1].title, "");
        assert!(articles[1].llm_summary.is_none());
    }

    #[tokio::test]
    async fn the_one_where_the_file_is_simply_not_there() {
        let err = load_articles("/definitely/not/here/news_data.json")
            .await
            .expect_err("a missing file must be an error");
        // 🧪 The path shows up in the message — 3am debugging is path-driven.
        assert!(format!("{err:#}").contains("news_data.json"));
    }

    #[tokio::test]
    async fn the_one_where_the_file_holds_an_object_instead_of_an_array() {
        let file = write_fixture(r#"{"id": "not-an-array"}"#);
        assert!(load_articles(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn the_one_where_the_file_holds_garbage() {
        let file = write_fixture("this is not json, it is a cry for help");
        assert!(load_articles(file.path()).await.is_err());
    }
}
