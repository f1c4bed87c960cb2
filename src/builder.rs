use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, info, trace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;
use crate::core::EmbeddingSpace;
use crate::errors::BuildError;
use crate::extractor::ClusterExtractor;
use crate::worker::{DimensionClusterWorker, DimensionFault, WorkerOutcome};

/// Produces the full cluster collection for an embedding.
pub trait ClusterBuilder {
    fn run(&self) -> Result<Vec<Cluster>, BuildError>;
}

/// Run configuration.
///
/// - `workers`: number of isolated workers, must be positive. The pool gets at most
///   one thread per dimension; surplus workers have empty queues.
/// - `min_cluster_size`: overrides `EmbeddingSpace::min_cluster_size` when set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusteringParams {
    pub workers: usize,
    pub min_cluster_size: Option<usize>,
}

impl Default for ClusteringParams {
    fn default() -> Self {
        Self {
            workers: rayon::current_num_threads().max(1),
            min_cluster_size: None,
        }
    }
}

/// Clusters plus per-dimension bookkeeping of a finished run.
#[derive(Clone, Debug, Default)]
pub struct BuildReport {
    /// Worker 0's clusters first, then worker 1's, and so on.
    pub clusters: Vec<Cluster>,
    pub faults: Vec<DimensionFault>,
    /// Dimensions each worker drained, indexed by worker id.
    pub partitions: Vec<Vec<usize>>,
}

impl BuildReport {
    fn from_outcomes(outcomes: Vec<WorkerOutcome>) -> Self {
        let mut report = BuildReport::default();
        for outcome in outcomes {
            report.clusters.extend(outcome.clusters);
            report.faults.extend(outcome.faults);
            report.partitions.push(outcome.processed);
        }
        report
    }

    /// Every processed dimension, ascending.
    pub fn processed_dimensions(&self) -> Vec<usize> {
        let mut all: Vec<usize> = self.partitions.iter().flatten().copied().collect();
        all.sort_unstable();
        all
    }
}

/// Deals dimensions round robin: dimension `d` goes to worker `d % workers`.
///
/// # Panics
/// Panics if `workers == 0`.
pub fn partition(nfeatures: usize, workers: usize) -> Vec<VecDeque<usize>> {
    assert!(workers > 0, "workers must be positive");
    let mut queues = vec![VecDeque::with_capacity(nfeatures / workers + 1); workers];
    for dimension in 0..nfeatures {
        queues[dimension % workers].push_back(dimension);
    }
    queues
}

/// Runs one worker body, turning a panic into a run-level error.
pub(crate) fn run_guarded<F>(worker: usize, body: F) -> Result<WorkerOutcome, BuildError>
where
    F: FnOnce() -> WorkerOutcome,
{
    panic::catch_unwind(AssertUnwindSafe(body)).map_err(|payload| BuildError::WorkerPanicked {
        worker,
        message: panic_message(payload.as_ref()),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Extracts at most one cluster per dimension, fanning dimensions out to workers.
pub struct DimensionClusterBuilder {
    space: Arc<EmbeddingSpace>,
    params: ClusteringParams,
}

impl DimensionClusterBuilder {
    pub fn new(space: Arc<EmbeddingSpace>) -> Self {
        let params = ClusteringParams::default();
        info!(
            "Initializing DimensionClusterBuilder: shape={:?}, workers={}",
            space.shape(),
            params.workers
        );
        Self { space, params }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        info!("Setting workers: {}", workers);
        self.params.workers = workers;
        self
    }

    /// `None` falls back to the size derived from the space's shape.
    pub fn with_min_cluster_size(mut self, min_cluster_size: Option<usize>) -> Self {
        info!("Setting minimum cluster size: {:?}", min_cluster_size);
        self.params.min_cluster_size = min_cluster_size;
        self
    }

    pub fn with_params(mut self, params: ClusteringParams) -> Self {
        info!("Setting clustering params: {:?}", params);
        self.params = params;
        self
    }

    pub fn params(&self) -> &ClusteringParams {
        &self.params
    }

    pub fn min_cluster_size(&self) -> usize {
        self.params
            .min_cluster_size
            .unwrap_or_else(|| self.space.min_cluster_size())
    }

    /// Pool threads for a run: one per worker, never more than there are dimensions.
    pub fn pool_size(&self) -> usize {
        self.params.workers.min(self.space.nfeatures()).max(1)
    }

    /// Runs every worker to completion and keeps the per-dimension bookkeeping.
    pub fn run_detailed(&self) -> Result<BuildReport, BuildError> {
        self.run_workers(|mut worker, space| {
            worker.run(space);
            worker.into_outcome()
        })
    }

    /// Fans the partitioned workers out on the pool, each through `body`.
    pub(crate) fn run_workers<F>(&self, body: F) -> Result<BuildReport, BuildError>
    where
        F: Fn(DimensionClusterWorker, &EmbeddingSpace) -> WorkerOutcome + Sync,
    {
        let nworkers = self.params.workers;
        if nworkers == 0 {
            return Err(BuildError::InvalidWorkers(nworkers));
        }

        let (nitems, nfeatures) = self.space.shape();
        let extractor = ClusterExtractor::new(self.min_cluster_size());
        let nthreads = self.pool_size();
        info!(
            "Building clusters over {} dimensions of {} items with {} workers on {} threads (min size {})",
            nfeatures,
            nitems,
            nworkers,
            nthreads,
            extractor.min_cluster_size()
        );

        let workers: Vec<DimensionClusterWorker> = partition(nfeatures, nworkers)
            .into_iter()
            .enumerate()
            .map(|(id, queue)| {
                trace!("worker {} assigned {:?}", id, queue);
                DimensionClusterWorker::new(id, queue, extractor)
            })
            .collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(nthreads)
            .thread_name(|i| format!("dimcluster-worker-{}", i))
            .build()?;

        let space: &EmbeddingSpace = &self.space;
        let body = &body;
        let results: Vec<Result<WorkerOutcome, BuildError>> = pool.install(|| {
            workers
                .into_par_iter()
                .map(|worker| {
                    let id = worker.id();
                    run_guarded(id, move || body(worker, space))
                })
                .collect()
        });

        // any crashed worker fails the whole run
        let outcomes = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        let report = BuildReport::from_outcomes(outcomes);

        debug!(
            "Processed {} dimensions, {} faults",
            report.processed_dimensions().len(),
            report.faults.len()
        );
        info!("Cluster build completed: {} clusters", report.clusters.len());
        Ok(report)
    }
}

impl ClusterBuilder for DimensionClusterBuilder {
    fn run(&self) -> Result<Vec<Cluster>, BuildError> {
        self.run_detailed().map(|report| report.clusters)
    }
}
