//! EmbeddingSpace: the immutable, labelled matrix the clustering core reads.
//!
//! The loader hands over rows (one dense vector per entity label). Clustering
//! works one dimension at a time, so the space stores values feature-major:
//! every dimension is a contiguous slice and `projection` is zero-copy.
//!
//! # Examples
//!
//! ```
//! use dimcluster::core::EmbeddingSpace;
//!
//! let space = EmbeddingSpace::new(
//!     vec!["a".into(), "b".into()],
//!     vec![vec![1.0, 0.5], vec![2.0, 0.25]],
//! )
//! .unwrap();
//!
//! assert_eq!(space.shape(), (2, 2));
//! assert_eq!(space.projection(0).unwrap(), &[1.0, 2.0]);
//! ```
//!
//! # Invariants
//!
//! - `nitems >= 1` and `nfeatures >= 1`.
//! - `labels.len() == nitems`, labels are unique.
//! - Never mutated after construction; share it across workers with `Arc`.

use std::collections::HashSet;

use log::{debug, info};

use crate::errors::{EmbeddingError, ExtractionError};

/// Lower bound on the derived minimum cluster size.
pub const MIN_CLUSTER_FLOOR: usize = 10;

#[derive(Clone, Debug)]
pub struct EmbeddingSpace {
    nitems: usize,
    nfeatures: usize,
    labels: Vec<String>,
    data: Vec<f64>, // feature-major: data[feature * nitems + item]
}

impl EmbeddingSpace {
    /// Builds from row vectors aligned with `labels`.
    pub fn new(labels: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, EmbeddingError> {
        let nitems = rows.len();
        let nfeatures = rows.first().map(|r| r.len()).unwrap_or(0);

        if let Some((row, bad)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != nfeatures)
        {
            return Err(EmbeddingError::RaggedRow {
                row,
                expected: nfeatures,
                actual: bad.len(),
            });
        }

        let mut data = vec![0.0; nitems * nfeatures];
        for (item, values) in rows.iter().enumerate() {
            for (feature, &value) in values.iter().enumerate() {
                data[feature * nitems + item] = value;
            }
        }

        Self::validated(labels, data, nitems, nfeatures)
    }

    /// Builds from a row-major flat buffer of `labels.len() * nfeatures` values.
    pub fn from_flat(
        labels: Vec<String>,
        flat: Vec<f64>,
        nfeatures: usize,
    ) -> Result<Self, EmbeddingError> {
        let nitems = labels.len();
        if nfeatures == 0 || nitems == 0 {
            return Err(EmbeddingError::Empty { nitems, nfeatures });
        }
        if flat.len() != nitems * nfeatures {
            return Err(EmbeddingError::LabelCountMismatch {
                labels: nitems,
                rows: flat.len() / nfeatures,
            });
        }

        let mut data = vec![0.0; nitems * nfeatures];
        for (idx, &value) in flat.iter().enumerate() {
            let (item, feature) = (idx / nfeatures, idx % nfeatures);
            data[feature * nitems + item] = value;
        }

        Self::validated(labels, data, nitems, nfeatures)
    }

    fn validated(
        labels: Vec<String>,
        data: Vec<f64>,
        nitems: usize,
        nfeatures: usize,
    ) -> Result<Self, EmbeddingError> {
        if nitems == 0 || nfeatures == 0 {
            return Err(EmbeddingError::Empty { nitems, nfeatures });
        }
        if labels.len() != nitems {
            return Err(EmbeddingError::LabelCountMismatch {
                labels: labels.len(),
                rows: nitems,
            });
        }

        let mut seen = HashSet::with_capacity(nitems);
        for (row, label) in labels.iter().enumerate() {
            if !seen.insert(label.as_str()) {
                return Err(EmbeddingError::DuplicateLabel {
                    label: label.clone(),
                    row,
                });
            }
        }

        info!(
            "EmbeddingSpace ready: {} items x {} features",
            nitems, nfeatures
        );
        debug!("Feature-major buffer holds {} values", data.len());

        Ok(Self {
            nitems,
            nfeatures,
            labels,
            data,
        })
    }

    /// Returns (nitems, nfeatures).
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nitems, self.nfeatures)
    }

    #[inline]
    pub fn nitems(&self) -> usize {
        self.nitems
    }

    #[inline]
    pub fn nfeatures(&self) -> usize {
        self.nfeatures
    }

    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// # Panics
    /// Panics if `item >= nitems`.
    #[inline]
    pub fn label(&self, item: usize) -> &str {
        &self.labels[item]
    }

    /// Zero-copy view of every item's value on `dimension`, in row order.
    #[inline]
    pub fn projection(&self, dimension: usize) -> Result<&[f64], ExtractionError> {
        if dimension >= self.nfeatures {
            return Err(ExtractionError::DimensionOutOfRange {
                dimension,
                nfeatures: self.nfeatures,
            });
        }
        let start = dimension * self.nitems;
        Ok(&self.data[start..start + self.nitems])
    }

    /// Reconstructs one entity's vector across all dimensions.
    ///
    /// # Panics
    /// Panics if `item >= nitems`.
    pub fn row(&self, item: usize) -> Vec<f64> {
        assert!(item < self.nitems, "Item index out of bounds");
        (0..self.nfeatures)
            .map(|f| self.data[f * self.nitems + item])
            .collect()
    }

    /// `max(10, nitems / (nfeatures * 10))`, fixed for the whole run.
    #[inline]
    pub fn min_cluster_size(&self) -> usize {
        (self.nitems / (self.nfeatures * 10)).max(MIN_CLUSTER_FLOOR)
    }
}
