// Dataset shapes and tabular I/O.
//
// The input file is one row per survey response: a topic-list column
// (JSON array of short phrases, produced by the upstream extraction step)
// plus arbitrary passthrough columns we never interpret — product, channel,
// date, sentiment, whatever the survey carries. The output file is one row
// per (response, topic) pair with two added columns.

pub mod reader;
pub mod writer;

/// Name of the output column holding the individual topic phrase.
pub const TOPIC_COLUMN: &str = "topic_discussed";

/// Name of the output column holding the cluster's theme label.
pub const THEME_COLUMN: &str = "general_topic_l1";

/// One survey response: its passthrough values plus the parsed topic list.
#[derive(Debug, Clone)]
pub struct SurveyRow {
    /// 1-based data row number (header excluded). Stable identity for
    /// error reporting.
    pub row: usize,
    /// Values of every passthrough column, aligned with
    /// [`Dataset::passthrough_columns`].
    pub fields: Vec<String>,
    /// Normalized topic phrases in original order, deduplicated within the
    /// row. May be empty — a response with no extracted topics contributes
    /// zero exploded rows.
    pub topics: Vec<String>,
}

/// The loaded input dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Header names of every column except the topic-list column.
    pub passthrough_columns: Vec<String>,
    pub rows: Vec<SurveyRow>,
}

impl Dataset {
    /// Total number of (response, topic) pairs this dataset will explode to.
    pub fn topic_count(&self) -> usize {
        self.rows.iter().map(|r| r.topics.len()).sum()
    }
}

/// One output row: a single (response, topic) pair carrying the response's
/// original attributes, the topic phrase, and its cluster's theme label.
/// Derived once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplodedRecord {
    pub fields: Vec<String>,
    pub topic_discussed: String,
    pub general_topic_l1: String,
}
