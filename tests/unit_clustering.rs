// Clustering stage tests — mock embedding provider, no network.
//
// The provider here is deterministic and cheap, which lets these tests pin
// down the stage contracts: chunking at the batch limit, whole-stage failure
// on any chunk, deterministic assignment for a fixed seed, and the V=0 /
// invalid-k edge cases.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use quilt::cluster::assign_clusters;
use quilt::embedding::EmbeddingProvider;
use quilt::error::PipelineError;

/// Deterministic toy embedding: a few numeric features of the phrase.
fn embed_phrase(phrase: &str) -> Vec<f64> {
    let byte_sum: f64 = phrase.bytes().map(f64::from).sum();
    vec![
        phrase.len() as f64,
        f64::from(*phrase.as_bytes().first().unwrap_or(&0)),
        byte_sum / 100.0,
    ]
}

/// Records the size of every batch it is asked to embed.
struct StubEmbedder {
    batch_limit: usize,
    batches: Mutex<Vec<usize>>,
}

impl StubEmbedder {
    fn new(batch_limit: usize) -> Self {
        Self {
            batch_limit,
            batches: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, phrases: &[String]) -> Result<Vec<Vec<f64>>> {
        self.batches.lock().unwrap().push(phrases.len());
        Ok(phrases.iter().map(|p| embed_phrase(p)).collect())
    }

    fn batch_limit(&self) -> usize {
        self.batch_limit
    }
}

/// Fails on any batch containing the marker phrase.
struct FailingEmbedder {
    marker: String,
}

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, phrases: &[String]) -> Result<Vec<Vec<f64>>> {
        if phrases.iter().any(|p| p == &self.marker) {
            anyhow::bail!("provider exploded");
        }
        Ok(phrases.iter().map(|p| embed_phrase(p)).collect())
    }

    fn batch_limit(&self) -> usize {
        2
    }
}

fn vocab(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_string()).collect()
}

#[tokio::test]
async fn empty_vocabulary_short_circuits_without_provider_calls() {
    let embedder = StubEmbedder::new(8);
    let assignments = assign_clusters(&[], &embedder, 12, 0, 4)
        .await
        .expect("empty vocabulary is not an error");
    assert!(assignments.by_topic.is_empty());
    assert!(assignments.members.is_empty());
    assert!(embedder.batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn k_larger_than_vocabulary_is_a_config_error() {
    let embedder = StubEmbedder::new(8);
    let err = assign_clusters(&vocab(&["a", "b"]), &embedder, 5, 0, 4)
        .await
        .unwrap_err();
    match err {
        PipelineError::InvalidClusterCount { k, vocabulary } => {
            assert_eq!(k, 5);
            assert_eq!(vocabulary, 2);
        }
        other => panic!("expected InvalidClusterCount, got {other:?}"),
    }
    // Validation happens before any embedding call.
    assert!(embedder.batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn k_zero_is_a_config_error() {
    let embedder = StubEmbedder::new(8);
    let err = assign_clusters(&vocab(&["a"]), &embedder, 0, 0, 4)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidClusterCount { .. }));
}

#[tokio::test]
async fn vocabulary_is_chunked_at_the_batch_limit() {
    let embedder = StubEmbedder::new(3);
    let phrases = vocab(&[
        "billing confusion",
        "slow claims",
        "rude agents",
        "app crashes",
        "long hold times",
        "unclear policy terms",
        "premium increases",
    ]);

    assign_clusters(&phrases, &embedder, 2, 0, 4)
        .await
        .expect("clustering succeeds");

    let mut batches = embedder.batches.lock().unwrap().clone();
    batches.sort_unstable();
    assert_eq!(batches, vec![1, 3, 3]);
}

#[tokio::test]
async fn every_topic_gets_exactly_one_in_range_cluster() {
    let embedder = StubEmbedder::new(8);
    // Sorted, as the corpus builder delivers it.
    let phrases = vocab(&["aa", "ab", "m", "zzzzzzzy", "zzzzzzzz"]);
    let k = 2;

    let assignments = assign_clusters(&phrases, &embedder, k, 0, 4)
        .await
        .expect("clustering succeeds");

    assert_eq!(assignments.by_topic.len(), phrases.len());
    for phrase in &phrases {
        let cluster = assignments.by_topic[phrase];
        assert!(cluster < k, "cluster id {cluster} out of range");
    }

    // Members partition the vocabulary, in vocabulary order per cluster.
    let total: usize = assignments.members.values().map(Vec::len).sum();
    assert_eq!(total, phrases.len());
    for members in assignments.members.values() {
        let mut sorted = members.clone();
        sorted.sort();
        // vocabulary order here is insertion order of the (sorted) input
        assert_eq!(&sorted, members);
    }
}

#[tokio::test]
async fn same_seed_yields_identical_assignment() {
    let phrases = vocab(&[
        "billing confusion",
        "billing errors",
        "slow claims",
        "claim delays",
        "app crashes",
        "app login issues",
    ]);

    let embedder = StubEmbedder::new(8);
    let first = assign_clusters(&phrases, &embedder, 3, 42, 4).await.unwrap();
    let second = assign_clusters(&phrases, &embedder, 3, 42, 4).await.unwrap();

    assert_eq!(first.by_topic, second.by_topic);
    assert_eq!(first.members, second.members);
}

#[tokio::test]
async fn any_failed_chunk_fails_the_whole_stage() {
    let embedder = FailingEmbedder {
        marker: "poison".to_string(),
    };
    // batch_limit 2: chunk 1 = [c, poison]
    let phrases = vocab(&["a", "b", "c", "poison", "e"]);

    let err = assign_clusters(&phrases, &embedder, 2, 0, 4).await.unwrap_err();
    match err {
        PipelineError::EmbeddingProvider { chunk, .. } => assert_eq!(chunk, 1),
        other => panic!("expected EmbeddingProvider, got {other:?}"),
    }
}

#[tokio::test]
async fn k_equal_to_vocabulary_size_is_valid() {
    let embedder = StubEmbedder::new(8);
    let phrases = vocab(&["aa", "bb", "cc"]);
    let assignments = assign_clusters(&phrases, &embedder, 3, 0, 4)
        .await
        .expect("k == V is allowed");
    assert_eq!(assignments.by_topic.len(), 3);
}
