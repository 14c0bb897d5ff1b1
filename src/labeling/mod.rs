// Cluster labeling stage.
//
// One labeling request per non-empty cluster, carrying a bounded sample of
// that cluster's member phrases. Requests may run concurrently; results are
// collected keyed by cluster id so output never depends on completion order.
// There is no auto-retry and no default label — a cluster that cannot be
// labeled fails the stage.

pub mod openai;
pub mod traits;

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use tracing::info;

pub use traits::{LabelError, ThemeLabeler};

use crate::error::{PipelineError, Result};

/// Take a bounded, order-preserving sample of a cluster's member phrases.
/// Members arrive from the vocabulary, so they are already unique; the cap
/// bounds the size of the labeling request.
pub fn sample_phrases(members: &[String], cap: usize) -> Vec<String> {
    members.iter().take(cap.max(1)).cloned().collect()
}

/// Request one theme label per non-empty cluster.
///
/// Empty clusters (k chosen larger than needed) never appear in `members`
/// and are silently skipped — no label request, no error.
pub async fn label_clusters(
    members: &BTreeMap<usize, Vec<String>>,
    labeler: &dyn ThemeLabeler,
    sample_cap: usize,
    concurrency: usize,
) -> Result<BTreeMap<usize, String>> {
    let requests: Vec<(usize, Vec<String>)> = members
        .iter()
        .filter(|(_, phrases)| !phrases.is_empty())
        .map(|(&cluster, phrases)| (cluster, sample_phrases(phrases, sample_cap)))
        .collect();

    let results: Vec<Result<(usize, String)>> =
        stream::iter(requests.into_iter().map(|(cluster, sample)| async move {
            let label = labeler
                .label_cluster(&sample)
                .await
                .map_err(|e| match e {
                    LabelError::Provider(reason) => {
                        PipelineError::LabelProvider { cluster, reason }
                    }
                    LabelError::Parse(detail) => PipelineError::LabelParse { cluster, detail },
                })?;
            let label = label.trim().to_string();
            if label.is_empty() {
                return Err(PipelineError::LabelParse {
                    cluster,
                    detail: "empty label".to_string(),
                });
            }
            Ok((cluster, label))
        }))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut labels = BTreeMap::new();
    for result in results {
        let (cluster, label) = result?;
        labels.insert(cluster, label);
    }

    info!(clusters = labels.len(), "Labeled topic clusters");
    Ok(labels)
}
