use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use quilt::config::Config;
use quilt::embedding::openai::OpenAiEmbedder;
use quilt::labeling::openai::OpenAiLabeler;
use quilt::output::terminal;
use quilt::pipeline::{self, RunParams};

/// Quilt: theme consolidation for free-text survey responses.
///
/// Takes a survey dataset enriched with per-response topic phrases, groups
/// the phrases into semantic clusters, names each cluster, and writes one
/// row per (response, topic) pair with its theme label.
#[derive(Parser)]
#[command(name = "quilt", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: cluster topics, label clusters, explode rows
    Run {
        /// Input CSV with a topic-list column
        #[arg(long)]
        input: PathBuf,

        /// Output CSV path (written only if the whole run succeeds)
        #[arg(long)]
        output: PathBuf,

        /// Name of the topic-list column
        #[arg(long, default_value = "all_topics_discussed")]
        topics_column: String,

        /// Number of theme clusters (k)
        #[arg(long, default_value = "12")]
        clusters: usize,

        /// Random seed for clustering
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Max member phrases per labeling request
        #[arg(long, default_value = "12")]
        sample_cap: usize,

        /// Number of provider calls in flight at once (default: 8)
        #[arg(long, default_value = "8")]
        concurrency: usize,
    },

    /// Inspect the topic vocabulary of an input dataset (no API calls)
    Vocab {
        /// Input CSV with a topic-list column
        #[arg(long)]
        input: PathBuf,

        /// Name of the topic-list column
        #[arg(long, default_value = "all_topics_discussed")]
        topics_column: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quilt=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output,
            topics_column,
            clusters,
            seed,
            sample_cap,
            concurrency,
        } => {
            let config = Config::load()?;
            config.require_api_key()?;

            let embedder = OpenAiEmbedder::new(&config);
            let labeler = OpenAiLabeler::new(&config);

            let params = RunParams {
                input,
                output,
                topics_column,
                clusters,
                seed,
                sample_cap,
                concurrency,
            };

            info!(
                clusters = params.clusters,
                seed = params.seed,
                "Starting pipeline run"
            );
            let summary = pipeline::run(&params, &embedder, &labeler).await?;
            terminal::display_run_summary(&summary);
        }

        Commands::Vocab {
            input,
            topics_column,
        } => {
            let (responses, frequencies) =
                pipeline::run::inspect_vocabulary(&input, &topics_column)?;
            terminal::display_vocabulary(responses, &frequencies);
        }
    }

    Ok(())
}
