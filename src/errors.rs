//! Error taxonomy for loading, extracting and building clusters.
//!
//! - `EmbeddingError`: fatal, raised before any worker starts.
//! - `ExtractionError`: scoped to a single dimension, recovered by the owning worker.
//! - `BuildError`: run-level failures surfaced by the orchestrator.

use thiserror::Error;

/// Malformed or unreadable embedding input. Aborts the run.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding is empty: {nitems} items x {nfeatures} features")]
    Empty { nitems: usize, nfeatures: usize },

    #[error("label count mismatch: {labels} labels for {rows} rows")]
    LabelCountMismatch { labels: usize, rows: usize },

    #[error("row {row} has {actual} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate label {label:?} at row {row}")]
    DuplicateLabel { label: String, row: usize },

    #[error("invalid header: {0:?}")]
    InvalidHeader(String),

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EmbeddingError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Fault while extracting one dimension. The dimension yields no cluster.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExtractionError {
    #[error("non-finite value {value} at row {row} on dimension {dimension}")]
    NonFinite {
        dimension: usize,
        row: usize,
        value: f64,
    },

    #[error("dimension {dimension} out of range (space has {nfeatures})")]
    DimensionOutOfRange { dimension: usize, nfeatures: usize },
}

/// Run-level failure. Partial results are discarded.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("worker count must be positive, got {0}")]
    InvalidWorkers(usize),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("worker {worker} terminated abnormally: {message}")]
    WorkerPanicked { worker: usize, message: String },
}
