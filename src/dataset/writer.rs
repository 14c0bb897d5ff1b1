// Output dataset writer.
//
// The output file is only created once every stage has succeeded — the
// pipeline builds the full exploded record set in memory first, so a failed
// run never leaves a partial dataset behind.

use std::path::Path;

use tracing::debug;

use crate::dataset::{ExplodedRecord, THEME_COLUMN, TOPIC_COLUMN};
use crate::error::Result;

/// Write the exploded dataset: all passthrough columns in input order,
/// then `topic_discussed` and `general_topic_l1`.
pub fn write(path: &Path, passthrough_columns: &[String], records: &[ExplodedRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<&str> = passthrough_columns.iter().map(String::as_str).collect();
    header.push(TOPIC_COLUMN);
    header.push(THEME_COLUMN);
    writer.write_record(&header)?;

    for record in records {
        let mut row: Vec<&str> = record.fields.iter().map(String::as_str).collect();
        row.push(&record.topic_discussed);
        row.push(&record.general_topic_l1);
        writer.write_record(&row)?;
    }

    writer.flush()?;
    debug!(rows = records.len(), path = %path.display(), "Wrote exploded dataset");
    Ok(())
}
