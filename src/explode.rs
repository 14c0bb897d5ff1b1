// Response exploder — the final shape transformation.
//
// One output record per (response, topic) pair, in original response order
// and original topic order within each response. Downstream aggregation and
// display depend on that ordering being stable for identical input.

use std::collections::BTreeMap;

use tracing::debug;

use crate::cluster::ClusterAssignments;
use crate::dataset::{Dataset, ExplodedRecord};
use crate::error::{PipelineError, Result};

/// Derive the exploded record sequence.
///
/// A topic with no cluster assignment, or a cluster with no label, is an
/// internal consistency violation — the corpus, clusterer, and labeler all
/// ran over the same vocabulary, so this can only mean a pipeline bug. The
/// exploder fails rather than fabricate a label.
pub fn explode(
    dataset: &Dataset,
    clusters: &ClusterAssignments,
    labels: &BTreeMap<usize, String>,
) -> Result<Vec<ExplodedRecord>> {
    let mut records = Vec::with_capacity(dataset.topic_count());

    for row in &dataset.rows {
        for topic in &row.topics {
            let unresolved = || PipelineError::UnresolvedTopic {
                row: row.row,
                phrase: topic.clone(),
            };
            let cluster = clusters.by_topic.get(topic).ok_or_else(unresolved)?;
            let label = labels.get(cluster).ok_or_else(unresolved)?;

            records.push(ExplodedRecord {
                fields: row.fields.clone(),
                topic_discussed: topic.clone(),
                general_topic_l1: label.clone(),
            });
        }
    }

    debug!(
        responses = dataset.rows.len(),
        records = records.len(),
        "Exploded responses"
    );

    Ok(records)
}
