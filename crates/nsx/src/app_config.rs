//! 🔧 App Configuration — the sacred TOML-to-struct pipeline.
//!
//! 🏗️ Powered by Figment, because manually parsing env vars is a form of
//! self-harm that even the borrow checker wouldn't approve of.
//!
//! 🔒 Credentials are REQUIRED fields. There is no fallback username, no
//! fallback password, no "eh, it's just dev" default baked into the binary.
//! If the credentials are missing, extraction fails before a single byte
//! leaves the process. This is the hill. We die on it happily.

use std::path::Path;

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use tracing::info;

/// 📦 The AppConfig: one struct to rule them all, one struct to find them,
/// one struct to bring them all, and in the Figment bind them.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// 📡 Where the cluster lives and how we introduce ourselves to it.
    pub elasticsearch: ElasticsearchConfig,
    /// 📰 What to load, where to put it, and how many at a time.
    pub ingest: IngestConfig,
}

/// 📡 Connection settings for the destination cluster.
#[derive(Debug, Deserialize, Clone)]
pub struct ElasticsearchConfig {
    /// 📡 Scheme + host + port. Yes, all of it. No, `localhost` alone is
    /// not a URL. Yes, I know it worked in dev. Yes, I know.
    pub url: String,
    /// 🔒 Username. Required. The bouncer wants a name.
    pub username: String,
    /// 🔒 Password. Required. If it's "password123", that's between you
    /// and your security team.
    pub password: String,
    /// ⚠️ Skip TLS certificate verification. Default false. Flip this for
    /// a cluster wearing a self-signed cert and nowhere else.
    #[serde(default)]
    pub insecure_skip_tls_verify: bool,
}

/// 📰 Ingestion knobs — the one parameterized entry point.
#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    /// 📂 Path to the JSON array of articles.
    pub file_name: String,
    /// 📦 Target index name.
    #[serde(default = "default_index_name")]
    pub index: String,
    /// 🔢 Documents per bulk request. 500 is the number handed down by
    /// those who came before. It has survived every load test so far.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_index_name() -> String {
    "news".to_string()
}

fn default_batch_size() -> usize {
    500
}

/// 🚀 Load the config — from a file, from env vars, or from the sheer power of hoping.
///
/// 🔧 Merges environment variables (NSX_*, nested keys via `__`) with an
/// optional TOML file. TOML wins on conflicts.
///
/// 📐 DESIGN NOTE:
///   - `config_file_name` is None  → env vars only. No file. No assumptions.
///   - `config_file_name` is Some  → env vars + TOML file, merged.
///
/// 💀 Returns an error if anything required is missing — including the
/// credentials. Failing here, loudly, beats failing 900 documents in with
/// a 401 that reads like a shrug.
pub fn load_config(config_file_name: Option<&Path>) -> anyhow::Result<AppConfig> {
    info!(
        "🔧 Loading configuration: {:#?}",
        config_file_name.unwrap_or(Path::new(""))
    );

    // 🏗️ Env vars are the base layer — like a good sourdough starter.
    let config = Figment::new().merge(Env::prefixed("NSX_").split("__"));

    // 🎯 Conditionally layer in TOML only if a file was actually provided.
    let config = match config_file_name {
        Some(file_name) => config.merge(Toml::file(file_name)),
        None => config,
    };

    let context_msg = match config_file_name {
        Some(path) => format!(
            "💀 Failed to assemble configuration from '{}' plus NSX_* environment \
             variables. Check for missing required fields — url, username, password, \
             and ingest.file_name are not optional, and never will be.",
            path.display()
        ),
        None => "💀 Failed to assemble configuration from NSX_* environment variables \
                 alone. No file was provided — this one's all on the environment. \
                 The required fields (url, username, password, ingest.file_name) \
                 do not have defaults on purpose."
            .to_string(),
    };

    config.extract().context(context_msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_test_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("💀 temp config file refused to exist");
        file.write_all(contents.as_bytes())
            .expect("💀 failed to write test config. the filesystem said 'new phone who dis'.");
        file
    }

    #[test]
    fn the_one_where_a_full_config_parses_and_defaults_fill_the_gaps() {
        let file = write_test_config(
            r#"
            [elasticsearch]
            url = "https://localhost:9200"
            username = "elastic"
            password = "hunter2"

            [ingest]
            file_name = "resources/news_data.json"
            "#,
        );

        let config = load_config(Some(file.path()))
            .expect("💀 a complete config should parse. figment owes us an apology otherwise.");

        assert_eq!(config.elasticsearch.url, "https://localhost:9200");
        assert!(!config.elasticsearch.insecure_skip_tls_verify);
        // 🧪 Defaults show up uninvited but helpful.
        assert_eq!(config.ingest.index, "news");
        assert_eq!(config.ingest.batch_size, 500);
    }

    #[test]
    fn the_one_where_every_knob_is_turned_away_from_its_default() {
        let file = write_test_config(
            r#"
            [elasticsearch]
            url = "https://es.internal:9200"
            username = "loader"
            password = "s3cret"
            insecure_skip_tls_verify = true

            [ingest]
            file_name = "/data/feed.json"
            index = "news-2024"
            batch_size = 250
            "#,
        );

        let config = load_config(Some(file.path())).expect("overrides should parse");
        assert!(config.elasticsearch.insecure_skip_tls_verify);
        assert_eq!(config.ingest.index, "news-2024");
        assert_eq!(config.ingest.batch_size, 250);
    }

    #[test]
    fn the_one_where_missing_credentials_fail_fast_and_proud() {
        // 🧪 No password. No fallback. No mercy. This is the redesign working.
        let file = write_test_config(
            r#"
            [elasticsearch]
            url = "https://localhost:9200"
            username = "elastic"

            [ingest]
            file_name = "resources/news_data.json"
            "#,
        );

        assert!(
            load_config(Some(file.path())).is_err(),
            "a config without a password must not extract"
        );
    }

    #[test]
    fn the_one_where_no_file_and_no_env_means_no_config() {
        // 🧪 Nothing to merge, nothing required present → error, not a
        // half-initialized struct quietly full of empty strings.
        assert!(load_config(None).is_err());
    }
}
