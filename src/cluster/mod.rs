// Semantic clustering stage: embed the unique vocabulary, then partition it.
//
// Embeddings are fetched once per unique topic, never per response. The
// vocabulary is chunked at the provider's batch limit and chunks may be in
// flight concurrently, but results are reassembled by chunk index before
// clustering — completion order never leaks into cluster ids.

pub mod kmeans;

use std::collections::{BTreeMap, HashMap};

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::embedding::EmbeddingProvider;
use crate::error::{PipelineError, Result};
use kmeans::KMeansParams;

/// The outcome of the clustering stage: every topic mapped to exactly one
/// cluster id in [0, k).
#[derive(Debug, Clone, Default)]
pub struct ClusterAssignments {
    /// Topic phrase -> cluster id.
    pub by_topic: HashMap<String, usize>,
    /// Cluster id -> member phrases in vocabulary order. Empty clusters
    /// (k chosen larger than needed) carry no entry here.
    pub members: BTreeMap<usize, Vec<String>>,
    /// The configured cluster count.
    pub k: usize,
}

/// Embed the vocabulary and partition it into `k` clusters.
///
/// An empty vocabulary short-circuits to an empty assignment — nothing to
/// cluster is not an error. `k` outside 1..=V is a configuration error.
pub async fn assign_clusters(
    vocabulary: &[String],
    provider: &dyn EmbeddingProvider,
    k: usize,
    seed: u64,
    concurrency: usize,
) -> Result<ClusterAssignments> {
    if vocabulary.is_empty() {
        debug!("Empty vocabulary, skipping clustering");
        return Ok(ClusterAssignments::default());
    }
    if k == 0 || k > vocabulary.len() {
        return Err(PipelineError::InvalidClusterCount {
            k,
            vocabulary: vocabulary.len(),
        });
    }

    let embeddings = embed_vocabulary(vocabulary, provider, concurrency).await?;
    let assignment = kmeans::partition(&embeddings, &KMeansParams::new(k, seed));

    let mut by_topic = HashMap::with_capacity(vocabulary.len());
    let mut members: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (topic, &cluster) in vocabulary.iter().zip(assignment.iter()) {
        by_topic.insert(topic.clone(), cluster);
        members.entry(cluster).or_default().push(topic.clone());
    }

    info!(
        topics = vocabulary.len(),
        k,
        populated = members.len(),
        "Clustered topic vocabulary"
    );

    Ok(ClusterAssignments {
        by_topic,
        members,
        k,
    })
}

/// Fetch one embedding per vocabulary entry, chunked at the provider's
/// batch limit. Any chunk failure fails the whole stage — a partially
/// embedded vocabulary must never reach the clusterer.
async fn embed_vocabulary(
    vocabulary: &[String],
    provider: &dyn EmbeddingProvider,
    concurrency: usize,
) -> Result<Vec<Vec<f64>>> {
    let limit = provider.batch_limit().max(1);
    let chunks: Vec<(usize, &[String])> = vocabulary.chunks(limit).enumerate().collect();
    let chunk_count = chunks.len();

    debug!(
        topics = vocabulary.len(),
        chunks = chunk_count,
        limit,
        "Embedding vocabulary"
    );

    let results: Vec<Result<(usize, Vec<Vec<f64>>)>> =
        stream::iter(chunks.into_iter().map(|(idx, chunk)| async move {
            let vectors = provider
                .embed(chunk)
                .await
                .map_err(|reason| PipelineError::EmbeddingProvider { chunk: idx, reason })?;
            if vectors.len() != chunk.len() {
                return Err(PipelineError::EmbeddingProvider {
                    chunk: idx,
                    reason: anyhow::anyhow!(
                        "provider returned {} vectors for {} phrases",
                        vectors.len(),
                        chunk.len()
                    ),
                });
            }
            Ok((idx, vectors))
        }))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    // Reassemble in chunk order regardless of completion order.
    let mut slots: Vec<Option<Vec<Vec<f64>>>> = vec![None; chunk_count];
    for result in results {
        let (idx, vectors) = result?;
        slots[idx] = Some(vectors);
    }

    let mut embeddings = Vec::with_capacity(vocabulary.len());
    for (idx, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(vectors) => embeddings.extend(vectors),
            None => {
                return Err(PipelineError::EmbeddingProvider {
                    chunk: idx,
                    reason: anyhow::anyhow!("chunk produced no result"),
                })
            }
        }
    }

    // Ragged dimensions would silently corrupt the distance math.
    if let Some(first) = embeddings.first() {
        let dim = first.len();
        if let Some(bad) = embeddings.iter().position(|v| v.len() != dim) {
            return Err(PipelineError::EmbeddingProvider {
                chunk: bad / limit,
                reason: anyhow::anyhow!(
                    "inconsistent embedding dimensions: expected {dim}, got {}",
                    embeddings[bad].len()
                ),
            });
        }
    }

    Ok(embeddings)
}
