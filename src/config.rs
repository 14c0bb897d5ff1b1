use std::env;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file is
/// loaded automatically at startup via dotenvy. Run-shaping knobs (cluster
/// count, seed, sample cap, paths) are CLI flags, not env vars — they
/// change per run, the provider setup doesn't.
pub struct Config {
    /// API key for the embedding and labeling providers.
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API (defaults to api.openai.com/v1).
    /// Point this at a gateway or local server to swap providers wholesale.
    pub api_base_url: String,
    /// Embedding model name.
    pub embedding_model: String,
    /// Chat model used for cluster labeling.
    pub label_model: String,
    /// Max phrases per embedding request; the vocabulary is chunked above this.
    pub embed_batch_limit: usize,
}

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_LABEL_MODEL: &str = "gpt-4o-mini";
const DEFAULT_EMBED_BATCH: usize = 512;

impl Config {
    /// Load configuration from environment variables. Everything has a
    /// default except the API key, which is validated lazily via
    /// `require_api_key` so offline commands (`vocab`) work without it.
    pub fn load() -> Result<Self> {
        let embed_batch_limit = match env::var("QUILT_EMBED_BATCH") {
            Ok(raw) => raw.parse().map_err(|_| {
                anyhow::anyhow!("QUILT_EMBED_BATCH must be a positive integer, got {raw:?}")
            })?,
            Err(_) => DEFAULT_EMBED_BATCH,
        };
        if embed_batch_limit == 0 {
            anyhow::bail!("QUILT_EMBED_BATCH must be at least 1");
        }

        Ok(Self {
            api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            api_base_url: env::var("QUILT_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            embedding_model: env::var("QUILT_EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
            label_model: env::var("QUILT_LABEL_MODEL")
                .unwrap_or_else(|_| DEFAULT_LABEL_MODEL.to_string()),
            embed_batch_limit,
        })
    }

    /// Check that the provider API key is configured. Call this before any
    /// command that embeds or labels.
    pub fn require_api_key(&self) -> Result<()> {
        if self.api_key.is_empty() {
            anyhow::bail!(
                "OPENAI_API_KEY not set. Add it to your .env file.\n\
                 The `run` command needs it for embedding and labeling calls."
            );
        }
        Ok(())
    }
}
