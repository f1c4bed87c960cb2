//! A worker drains its own queue of dimensions and keeps the clusters that qualify.
//!
//! Queues are handed out at construction and never shared. The embedding space is
//! only read, so workers run side by side without locks.

use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::cluster::Cluster;
use crate::core::EmbeddingSpace;
use crate::errors::ExtractionError;
use crate::extractor::ClusterExtractor;

/// A dimension that could not be extracted. The run carries on without it.
#[derive(Clone, Debug, PartialEq)]
pub struct DimensionFault {
    pub dimension: usize,
    pub error: ExtractionError,
}

/// Everything a finished worker hands back to the builder.
#[derive(Clone, Debug, Default)]
pub struct WorkerOutcome {
    pub worker: usize,
    pub clusters: Vec<Cluster>,
    pub faults: Vec<DimensionFault>,
    pub processed: Vec<usize>,
}

#[derive(Debug)]
pub struct DimensionClusterWorker {
    id: usize,
    queue: VecDeque<usize>,
    extractor: ClusterExtractor,
    clusters: Vec<Cluster>,
    faults: Vec<DimensionFault>,
    processed: Vec<usize>,
}

impl DimensionClusterWorker {
    pub fn new(id: usize, queue: VecDeque<usize>, extractor: ClusterExtractor) -> Self {
        Self {
            id,
            queue,
            extractor,
            clusters: Vec::new(),
            faults: Vec::new(),
            processed: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Dimensions still waiting.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn faults(&self) -> &[DimensionFault] {
        &self.faults
    }

    /// Runs until the queue is empty.
    pub fn run(&mut self, space: &EmbeddingSpace) {
        debug!("worker {} starting with {} dimensions", self.id, self.queue.len());

        while let Some(dimension) = self.queue.pop_front() {
            debug!("worker {} working on dimension {}", self.id, dimension);
            self.processed.push(dimension);

            match self.extractor.extract(space, dimension) {
                Ok(cluster)
                    if !cluster.is_empty()
                        && cluster.len() >= self.extractor.min_cluster_size() =>
                {
                    debug!("worker {}: {}", self.id, cluster);
                    self.clusters.push(cluster);
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(
                        "worker {} skipping dimension {}: {}",
                        self.id, dimension, error
                    );
                    self.faults.push(DimensionFault { dimension, error });
                }
            }
        }

        info!(
            "worker {} finished: {} dimensions, {} clusters, {} faults",
            self.id,
            self.processed.len(),
            self.clusters.len(),
            self.faults.len()
        );
    }

    pub fn into_outcome(self) -> WorkerOutcome {
        WorkerOutcome {
            worker: self.id,
            clusters: self.clusters,
            faults: self.faults,
            processed: self.processed,
        }
    }
}
