// Input dataset loader.
//
// Reads the survey CSV row by row, parsing the topic-list column strictly
// and keeping every other column as an opaque passthrough value. A malformed
// topic-list cell is a hard error naming the row — never a skip.

use std::path::Path;

use tracing::debug;

use crate::corpus;
use crate::dataset::{Dataset, SurveyRow};
use crate::error::{PipelineError, Result};

/// Load the input dataset, validating the topic-list column as we go.
pub fn load(path: &Path, topics_column: &str) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let topics_idx = headers
        .iter()
        .position(|h| h == topics_column)
        .ok_or_else(|| PipelineError::MissingTopicsColumn {
            column: topics_column.to_string(),
        })?;

    let passthrough_columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != topics_idx)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;

        let cell = record.get(topics_idx).unwrap_or("");
        let topics = corpus::parse_topics_cell(cell, row, topics_column)?;

        let fields: Vec<String> = record
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != topics_idx)
            .map(|(_, v)| v.to_string())
            .collect();

        rows.push(SurveyRow { row, fields, topics });
    }

    debug!(
        rows = rows.len(),
        columns = passthrough_columns.len(),
        "Loaded input dataset"
    );

    Ok(Dataset {
        passthrough_columns,
        rows,
    })
}
