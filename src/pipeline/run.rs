// The full topic-to-theme run: load -> corpus -> cluster -> label -> explode -> write.
//
// Stages run strictly in sequence; each stage's output is the next stage's
// entire input. Any stage failure aborts the run before the output file is
// created, so a failed run never leaves a partial dataset behind. The only
// concurrency lives inside the embedding and labeling stages, and both
// reassemble results by stable keys, so the output is byte-identical across
// runs with the same input, seed, and embeddings (label text aside — that
// is generative and allowed to vary).

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::cluster;
use crate::corpus;
use crate::dataset::{reader, writer};
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::explode;
use crate::labeling::{self, ThemeLabeler};

/// Everything that shapes one run, beyond the provider clients.
#[derive(Debug, Clone)]
pub struct RunParams {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Name of the input column holding the JSON topic list.
    pub topics_column: String,
    /// Target cluster count (k). Validated against the vocabulary size.
    pub clusters: usize,
    /// k-means seed.
    pub seed: u64,
    /// Max member phrases sent in one labeling request.
    pub sample_cap: usize,
    /// Bounded parallelism for provider calls.
    pub concurrency: usize,
}

/// What a successful run produced, for terminal reporting.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub responses: usize,
    pub unique_topics: usize,
    pub clusters_labeled: usize,
    pub records: usize,
    pub output: PathBuf,
}

/// Execute the whole pipeline.
pub async fn run(
    params: &RunParams,
    embedder: &dyn EmbeddingProvider,
    labeler: &dyn ThemeLabeler,
) -> Result<RunSummary> {
    let dataset = reader::load(&params.input, &params.topics_column)?;
    info!(
        responses = dataset.rows.len(),
        topics = dataset.topic_count(),
        "Loaded responses"
    );

    let vocabulary = corpus::build_vocabulary(&dataset.rows);

    // No topics anywhere: a valid (if empty) run. Write the schema so
    // downstream consumers still get a well-formed file.
    if vocabulary.is_empty() {
        writer::write(&params.output, &dataset.passthrough_columns, &[])?;
        return Ok(RunSummary {
            responses: dataset.rows.len(),
            unique_topics: 0,
            clusters_labeled: 0,
            records: 0,
            output: params.output.clone(),
        });
    }

    let pb = stage_spinner(format!(
        "Embedding {} unique topics and clustering into {}...",
        vocabulary.len(),
        params.clusters
    ));
    let assignments = cluster::assign_clusters(
        &vocabulary,
        embedder,
        params.clusters,
        params.seed,
        params.concurrency,
    )
    .await;
    pb.finish_and_clear();
    let assignments = assignments?;

    let pb = stage_spinner(format!(
        "Labeling {} clusters...",
        assignments.members.len()
    ));
    let labels = labeling::label_clusters(
        &assignments.members,
        labeler,
        params.sample_cap,
        params.concurrency,
    )
    .await;
    pb.finish_and_clear();
    let labels = labels?;

    let records = explode::explode(&dataset, &assignments, &labels)?;
    writer::write(&params.output, &dataset.passthrough_columns, &records)?;

    Ok(RunSummary {
        responses: dataset.rows.len(),
        unique_topics: vocabulary.len(),
        clusters_labeled: labels.len(),
        records: records.len(),
        output: params.output.clone(),
    })
}

/// Inspect a dataset without touching any provider: parse, validate, and
/// return the vocabulary. Backs the `vocab` command.
pub fn inspect_vocabulary(
    input: &Path,
    topics_column: &str,
) -> Result<(usize, std::collections::BTreeMap<String, usize>)> {
    let dataset = reader::load(input, topics_column)?;
    let frequencies = corpus::topic_frequencies(&dataset.rows);
    Ok((dataset.rows.len(), frequencies))
}

fn stage_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    pb
}
