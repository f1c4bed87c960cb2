//! dimcluster CLI: load a word2vec embedding, cluster every dimension, emit JSON.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use env_logger::Env;
use log::{error, info};
use thiserror::Error;

use dimcluster::builder::{ClusteringParams, DimensionClusterBuilder};
use dimcluster::errors::{BuildError, EmbeddingError};
use dimcluster::parsing::read_word2vec;

#[derive(Parser, Debug)]
#[command(name = "dimcluster")]
#[command(version)]
#[command(about = "Discover per-dimension entity clusters in an embedding")]
struct Cli {
    /// Path to the embeddings file (word2vec text format)
    #[arg(long)]
    embeddings: PathBuf,

    /// Number of workers; defaults to available parallelism
    #[arg(long)]
    workers: Option<usize>,

    /// Override the minimum cluster size derived from the embedding shape
    #[arg(long)]
    min_cluster_size: Option<usize>,

    /// Write clusters as JSON here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to load embedding: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("clustering run failed: {0}")]
    Build(#[from] BuildError),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialise clusters: {0}")]
    Json(#[from] serde_json::Error),
}

fn run(cli: Cli) -> Result<(), CliError> {
    let space = Arc::new(read_word2vec(&cli.embeddings)?);

    let mut params = ClusteringParams::default();
    if let Some(workers) = cli.workers {
        params.workers = workers;
    }
    params.min_cluster_size = cli.min_cluster_size;

    let report = DimensionClusterBuilder::new(space)
        .with_params(params)
        .run_detailed()?;

    if !report.faults.is_empty() {
        info!(
            "{} dimensions skipped: {:?}",
            report.faults.len(),
            report
                .faults
                .iter()
                .map(|f| f.dimension)
                .collect::<Vec<_>>()
        );
    }
    for cluster in &report.clusters {
        info!("{}", cluster);
    }

    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, &report.clusters)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init_from_env(Env::default().filter_or("RUST_LOG", "info"));

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
