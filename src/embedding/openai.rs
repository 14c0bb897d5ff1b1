// OpenAI-compatible embeddings client.
//
// Talks to any endpoint implementing the /v1/embeddings shape (OpenAI,
// Azure OpenAI, local gateways). The response carries an index per entry;
// the index is authoritative for ordering, not the array position.
//
// API docs: https://platform.openai.com/docs/api-reference/embeddings

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::EmbeddingProvider;
use crate::config::Config;

/// Embedding provider backed by an OpenAI-compatible HTTP API.
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    batch_limit: usize,
}

impl OpenAiEmbedder {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.embedding_model.clone(),
            batch_limit: config.embed_batch_limit,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, phrases: &[String]) -> Result<Vec<Vec<f64>>> {
        let url = format!("{}/embeddings", self.base_url);

        let request = EmbeddingsRequest {
            model: &self.model,
            input: phrases,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call embeddings API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Embeddings API returned {}: {}", status, body);
        }

        let result: EmbeddingsResponse = response
            .json()
            .await
            .context("Failed to parse embeddings API response")?;

        if result.data.len() != phrases.len() {
            anyhow::bail!(
                "Embeddings API returned {} vectors for {} phrases",
                result.data.len(),
                phrases.len()
            );
        }

        // Reassemble by the index field — some gateways reorder entries.
        let mut vectors: Vec<Vec<f64>> = vec![Vec::new(); phrases.len()];
        for item in result.data {
            if item.index >= vectors.len() {
                anyhow::bail!("Embeddings API returned out-of-range index {}", item.index);
            }
            vectors[item.index] = item.embedding;
        }
        if let Some(missing) = vectors.iter().position(|v| v.is_empty()) {
            anyhow::bail!("Embeddings API returned no vector for input {missing}");
        }

        debug!(
            batch = phrases.len(),
            dim = vectors[0].len(),
            model = %self.model,
            "Embedded phrase batch"
        );

        Ok(vectors)
    }

    fn batch_limit(&self) -> usize {
        self.batch_limit
    }
}

// --- Embeddings API request/response types ---

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingObject>,
}

#[derive(Deserialize)]
struct EmbeddingObject {
    index: usize,
    embedding: Vec<f64>,
}
