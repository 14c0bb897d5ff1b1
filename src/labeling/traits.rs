use async_trait::async_trait;
use thiserror::Error;

/// Why a single labeling call failed. The stage maps these onto the
/// pipeline taxonomy with the cluster id attached.
#[derive(Debug, Error)]
pub enum LabelError {
    /// The provider call itself failed (HTTP error, timeout).
    #[error("provider call failed: {0}")]
    Provider(anyhow::Error),
    /// The provider answered, but the content was not a usable label.
    #[error("unusable response: {0}")]
    Parse(String),
}

/// Trait for naming a cluster of semantically similar topic phrases.
///
/// Contract: given a sample of phrases that all belong to the same cluster,
/// return one short noun-phrase label (2-5 words) generalizing across the
/// sample. Label text is generative and not byte-stable across runs — only
/// the cluster assignment is deterministic.
#[async_trait]
pub trait ThemeLabeler: Send + Sync {
    async fn label_cluster(&self, sample: &[String]) -> Result<String, LabelError>;
}
