// Pipeline error taxonomy.
//
// Every stage failure aborts the run — no stage proceeds with partial or
// default data, and no cluster is ever silently unlabeled. Each variant
// carries the failing key (data row, cluster id, vocabulary chunk) so a
// failed run reports exactly where it died.

use thiserror::Error;

/// Errors raised by the topic-to-theme pipeline stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The topic-list cell of a row did not hold a JSON array of strings.
    #[error("row {row}: malformed topic list in column `{column}`: {detail}")]
    MalformedTopics {
        row: usize,
        column: String,
        detail: String,
    },

    /// The input file has no topic-list column with the expected name.
    #[error("input dataset has no `{column}` column")]
    MissingTopicsColumn { column: String },

    /// Requested more clusters than there are unique topics (or zero).
    #[error("invalid cluster count: k={k} but the vocabulary has {vocabulary} unique topics")]
    InvalidClusterCount { k: usize, vocabulary: usize },

    /// The embedding provider failed on a vocabulary chunk. A failure on any
    /// chunk fails the whole stage — partial vocabulary clustering would make
    /// cluster ids meaningless.
    #[error("embedding provider failed on vocabulary chunk {chunk}: {reason}")]
    EmbeddingProvider { chunk: usize, reason: anyhow::Error },

    /// The labeling provider call itself failed (HTTP error, timeout).
    #[error("label provider failed on cluster {cluster}: {reason}")]
    LabelProvider { cluster: usize, reason: anyhow::Error },

    /// The labeling provider answered, but not with a usable label string.
    #[error("cluster {cluster}: unusable label response: {detail}")]
    LabelParse { cluster: usize, detail: String },

    /// A topic phrase had no cluster assignment (or its cluster had no label)
    /// at explode time. Internal consistency violation — indicates a pipeline
    /// bug, never a data problem. Always fatal; the exploder must not
    /// fabricate a label.
    #[error("row {row}: topic {phrase:?} has no resolved theme label")]
    UnresolvedTopic { row: usize, phrase: String },

    /// CSV read/write failure.
    #[error("dataset error: {0}")]
    Dataset(#[from] csv::Error),

    /// Filesystem failure while persisting the output dataset.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
