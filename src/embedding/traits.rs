use anyhow::Result;
use async_trait::async_trait;

/// Trait for mapping phrases to fixed-dimension numeric vectors.
/// Implementations must be async because providers are HTTP APIs.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of phrases. The result has the same length and order
    /// as the input — one vector per phrase.
    async fn embed(&self, phrases: &[String]) -> Result<Vec<Vec<f64>>>;

    /// The largest batch a single `embed` call may carry. Callers chunk
    /// the vocabulary above this limit.
    fn batch_limit(&self) -> usize {
        512
    }
}
