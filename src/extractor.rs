//! Per-dimension cluster extraction.
//!
//! For one dimension the extractor:
//! 1. sorts every entity's projected value ascending (stable, ties keep row order),
//! 2. takes the tolerance as the arithmetic mean of those values (compensated sum),
//! 3. finds the longest contiguous window `[start, end)` of the sorted values whose
//!    span `v[end-1] - v[start]` is `<=` the tolerance (first found wins on ties),
//! 4. emits the window's labels as a `Cluster` if it reaches the minimum size.
//!
//! The tolerance is the mean of raw values, not a spread statistic. Negative means
//! are possible and only leave singleton windows.
//!
//! The window search is a two-pointer scan: the right edge advances one slot at a
//! time and the left edge gallops (exponential steps, then binary search) to the
//! first position that fits again. Both pointers only move forward, so a dimension
//! costs `O(n log n)` for the sort and `O(n)` amortised for the scan.
//!
//! Non-finite values are rejected with `ExtractionError::NonFinite` before sorting.

use log::{debug, trace};

use crate::cluster::Cluster;
use crate::core::EmbeddingSpace;
use crate::errors::ExtractionError;

/// Half-open range over a sorted projection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// The (value, row) pairs of one dimension, sorted ascending by value.
#[derive(Clone, Debug)]
pub struct SortedProjection {
    dimension: usize,
    values: Vec<f64>,
    rows: Vec<usize>,
}

impl SortedProjection {
    pub fn from_space(space: &EmbeddingSpace, dimension: usize) -> Result<Self, ExtractionError> {
        let column = space.projection(dimension)?;
        Self::from_values(dimension, column)
    }

    /// Rows are the indices of `column`.
    pub fn from_values(dimension: usize, column: &[f64]) -> Result<Self, ExtractionError> {
        if let Some((row, &value)) = column.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ExtractionError::NonFinite {
                dimension,
                row,
                value,
            });
        }

        let mut pairs: Vec<(f64, usize)> = column.iter().copied().zip(0..).collect();
        // stable: equal values keep row order
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (values, rows): (Vec<f64>, Vec<usize>) = pairs.into_iter().unzip();

        Ok(Self {
            dimension,
            values,
            rows,
        })
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Row index (into the space) of each sorted value.
    #[inline]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn tolerance(&self) -> f64 {
        tolerance(&self.values)
    }
}

/// Arithmetic mean of `values`; 0.0 when empty.
///
/// Summed with Neumaier compensation so small terms are not absorbed by large ones.
/// If the sum itself overflows, every term is divided by the count first.
pub fn tolerance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = compensated_sum(values.iter().copied()) / n;
    if mean.is_finite() {
        return mean;
    }
    compensated_sum(values.iter().map(|v| v / n))
}

fn compensated_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut compensation = 0.0;
    for v in values {
        let t = sum + v;
        if f64::abs(sum) >= f64::abs(v) {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}

/// Longest window of ascending `values` whose span is `<= tolerance`.
///
/// Any single value counts as a window of length one, so the result is empty only
/// for empty input. On equal lengths the window with the smallest `start` wins.
pub fn widest_window(values: &[f64], tolerance: f64) -> Window {
    if values.is_empty() {
        return Window::default();
    }

    let mut best = Window { start: 0, end: 1 };
    let mut start = 0;
    let mut jumps = 0usize;

    for last in 1..values.len() {
        if values[last] - values[start] > tolerance {
            start = gallop_start(values, start, last, tolerance);
            jumps += 1;
        }
        if last + 1 - start > best.len() {
            best = Window {
                start,
                end: last + 1,
            };
        }
    }

    trace!(
        "window scan over {} values: {} left-edge jumps, best {:?}",
        values.len(),
        jumps,
        best
    );
    best
}

/// First `s` in `(start, last]` with `values[last] - values[s] <= tolerance`,
/// or `last` when none fits. Requires the span at `start` to be too wide.
fn gallop_start(values: &[f64], start: usize, last: usize, tolerance: f64) -> usize {
    debug_assert!(start < last);
    let target = values[last];
    let too_wide = |v: f64| target - v > tolerance;

    let mut lo = start;
    let mut step = 1;
    let hi = loop {
        let next = lo + step;
        if next >= last {
            break last;
        }
        if !too_wide(values[next]) {
            break next;
        }
        lo = next;
        step *= 2;
    };

    lo + 1 + values[lo + 1..hi].partition_point(|&v| too_wide(v))
}

/// Turns one dimension of an `EmbeddingSpace` into at most one cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClusterExtractor {
    min_cluster_size: usize,
}

impl ClusterExtractor {
    pub fn new(min_cluster_size: usize) -> Self {
        Self { min_cluster_size }
    }

    /// Uses the size threshold derived from the space's shape.
    pub fn for_space(space: &EmbeddingSpace) -> Self {
        Self::new(space.min_cluster_size())
    }

    #[inline]
    pub fn min_cluster_size(&self) -> usize {
        self.min_cluster_size
    }

    /// Returns an empty cluster when the widest window is below the minimum size.
    pub fn extract(
        &self,
        space: &EmbeddingSpace,
        dimension: usize,
    ) -> Result<Cluster, ExtractionError> {
        let projection = SortedProjection::from_space(space, dimension)?;
        let tolerance = projection.tolerance();
        let window = widest_window(projection.values(), tolerance);

        debug!(
            "dimension {}: tolerance={:.6}, window=[{}, {}) len={}",
            dimension,
            tolerance,
            window.start,
            window.end,
            window.len()
        );

        let mut cluster = Cluster::new(dimension, dimension);
        if window.len() < self.min_cluster_size {
            debug!(
                "dimension {}: window of {} below minimum {}, discarded",
                dimension,
                window.len(),
                self.min_cluster_size
            );
            return Ok(cluster);
        }

        cluster.extend(
            projection.rows()[window.start..window.end]
                .iter()
                .map(|&row| space.label(row)),
        );
        Ok(cluster)
    }
}
