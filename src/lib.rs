//! # dimcluster
//!
//! Per-dimension cluster discovery over dense embedding spaces.
//!
//! Each coordinate axis is handled on its own: the entities are sorted by their
//! value on that axis and the longest run whose value span stays within the axis
//! mean becomes that dimension's cluster, provided it is large enough.
//!
//! ```
//! use std::sync::Arc;
//! use dimcluster::builder::{ClusterBuilder, DimensionClusterBuilder};
//! use dimcluster::core::EmbeddingSpace;
//!
//! let labels: Vec<String> = (0..12).map(|i| format!("Q{}", i)).collect();
//! let rows: Vec<Vec<f64>> = (0..12).map(|i| vec![1.0 + i as f64 * 0.01]).collect();
//! let space = Arc::new(EmbeddingSpace::new(labels, rows).unwrap());
//!
//! let clusters = DimensionClusterBuilder::new(space).with_workers(2).run().unwrap();
//! assert_eq!(clusters.len(), 1);
//! assert_eq!(clusters[0].len(), 12);
//! ```

pub mod builder;
pub mod cluster;
pub mod core;
pub mod errors;
pub mod extractor;
pub mod parsing;
pub mod worker;

#[cfg(test)]
mod tests;
