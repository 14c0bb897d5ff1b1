// Topic corpus builder — normalization and the unique vocabulary.
//
// Topic identity is case/whitespace-normalized string equality: "Slow Claims"
// and "slow  claims" are one vocabulary entry with one embedding and one
// cluster assignment. Embedding cost therefore scales with vocabulary size,
// not response count.

use std::collections::BTreeMap;

use crate::dataset::SurveyRow;
use crate::error::PipelineError;

/// Normalize a topic phrase: trim, collapse runs of whitespace, lowercase.
pub fn normalize_topic(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parse one topic-list cell into normalized, deduplicated topic phrases.
///
/// The cell must hold a JSON array of strings. Anything else — a plain
/// string, a number, an array with non-string entries — is a
/// `MalformedTopics` error naming the row; the pipeline never coerces.
/// Entries that normalize to the empty string are dropped, and duplicates
/// within the row keep their first position (the upstream extractor already
/// promises both; this re-enforces the invariant).
pub fn parse_topics_cell(cell: &str, row: usize, column: &str) -> Result<Vec<String>, PipelineError> {
    let malformed = |detail: String| PipelineError::MalformedTopics {
        row,
        column: column.to_string(),
        detail,
    };

    let value: serde_json::Value = serde_json::from_str(cell)
        .map_err(|e| malformed(format!("not valid JSON ({e})")))?;

    let entries = value
        .as_array()
        .ok_or_else(|| malformed("not a JSON array".to_string()))?;

    let mut topics: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        let phrase = entry
            .as_str()
            .ok_or_else(|| malformed(format!("non-string entry: {entry}")))?;
        let normalized = normalize_topic(phrase);
        if normalized.is_empty() {
            continue;
        }
        if !topics.contains(&normalized) {
            topics.push(normalized);
        }
    }
    Ok(topics)
}

/// Build the deduplicated vocabulary: the set union of all rows' topics,
/// in lexicographic order.
///
/// The ordering is part of the contract — downstream cluster ids are only
/// reproducible across runs if the vocabulary order is stable.
pub fn build_vocabulary(rows: &[SurveyRow]) -> Vec<String> {
    let mut vocabulary: Vec<String> = rows
        .iter()
        .flat_map(|r| r.topics.iter().cloned())
        .collect();
    vocabulary.sort();
    vocabulary.dedup();
    vocabulary
}

/// Occurrence count per unique topic across all rows, in vocabulary order.
pub fn topic_frequencies(rows: &[SurveyRow]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows {
        for topic in &row.topics {
            *counts.entry(topic.clone()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_case_and_whitespace() {
        assert_eq!(normalize_topic("  Slow   Claims "), "slow claims");
        assert_eq!(normalize_topic("slow claims"), "slow claims");
        assert_eq!(normalize_topic("\tConfusing\nForms"), "confusing forms");
    }

    #[test]
    fn normalize_empty_and_whitespace_only() {
        assert_eq!(normalize_topic(""), "");
        assert_eq!(normalize_topic("   "), "");
    }

    #[test]
    fn parse_valid_cell() {
        let topics = parse_topics_cell(r#"["Slow claims", "Confusing forms"]"#, 1, "topics")
            .expect("valid cell");
        assert_eq!(topics, vec!["slow claims", "confusing forms"]);
    }

    #[test]
    fn parse_dedupes_within_row_preserving_order() {
        let topics =
            parse_topics_cell(r#"["Slow claims", "slow  CLAIMS", "billing"]"#, 1, "topics")
                .expect("valid cell");
        assert_eq!(topics, vec!["slow claims", "billing"]);
    }

    #[test]
    fn parse_drops_empty_entries() {
        let topics = parse_topics_cell(r#"["", "  ", "billing"]"#, 1, "topics").expect("valid");
        assert_eq!(topics, vec!["billing"]);
    }

    #[test]
    fn parse_rejects_plain_string_cell() {
        let err = parse_topics_cell("slow claims", 7, "topics").unwrap_err();
        match err {
            PipelineError::MalformedTopics { row, .. } => assert_eq!(row, 7),
            other => panic!("expected MalformedTopics, got {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_non_array_json() {
        let err = parse_topics_cell(r#"{"topics": []}"#, 3, "topics").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedTopics { row: 3, .. }));
    }

    #[test]
    fn parse_rejects_non_string_entries() {
        let err = parse_topics_cell(r#"["billing", 42]"#, 5, "topics").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedTopics { row: 5, .. }));
    }

    fn row(n: usize, topics: &[&str]) -> SurveyRow {
        SurveyRow {
            row: n,
            fields: Vec::new(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn vocabulary_is_sorted_and_unique() {
        let rows = vec![
            row(1, &["slow claims", "confusing forms"]),
            row(2, &["slow claims"]),
            row(3, &[]),
        ];
        let vocab = build_vocabulary(&rows);
        assert_eq!(vocab, vec!["confusing forms", "slow claims"]);
    }

    #[test]
    fn vocabulary_is_deterministic() {
        let rows = vec![
            row(1, &["b", "a", "c"]),
            row(2, &["c", "d"]),
        ];
        assert_eq!(build_vocabulary(&rows), build_vocabulary(&rows));
    }

    #[test]
    fn frequencies_count_across_rows() {
        let rows = vec![
            row(1, &["slow claims", "confusing forms"]),
            row(2, &["slow claims"]),
        ];
        let freq = topic_frequencies(&rows);
        assert_eq!(freq["slow claims"], 2);
        assert_eq!(freq["confusing forms"], 1);
    }
}
