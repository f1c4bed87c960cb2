//! Synthetic embeddings and a brute-force window oracle shared by the tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::EmbeddingSpace;
use crate::extractor::Window;

pub fn labels(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("e{}", i)).collect()
}

/// One inner vec per dimension, all of equal length.
pub fn space_from_columns(columns: &[Vec<f64>]) -> EmbeddingSpace {
    let nitems = columns[0].len();
    let rows: Vec<Vec<f64>> = (0..nitems)
        .map(|i| columns.iter().map(|c| c[i]).collect())
        .collect();
    EmbeddingSpace::new(labels(nitems), rows).expect("valid synthetic space")
}

/// Uniform values in `[lo, hi)`, reproducible from `seed`.
pub fn random_space(nitems: usize, nfeatures: usize, lo: f64, hi: f64, seed: u64) -> EmbeddingSpace {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows: Vec<Vec<f64>> = (0..nitems)
        .map(|_| (0..nfeatures).map(|_| rng.random_range(lo..hi)).collect())
        .collect();
    EmbeddingSpace::new(labels(nitems), rows).expect("valid synthetic space")
}

pub fn random_sorted(n: usize, lo: f64, hi: f64, rng: &mut StdRng) -> Vec<f64> {
    let mut values: Vec<f64> = (0..n).map(|_| rng.random_range(lo..hi)).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

/// O(n²): from every start extend while the span fits, keep the first longest.
pub fn brute_force_window(values: &[f64], tolerance: f64) -> Window {
    if values.is_empty() {
        return Window::default();
    }
    let mut best = Window { start: 0, end: 1 };
    for start in 0..values.len() {
        let mut end = start + 1;
        while end < values.len() && values[end] - values[start] <= tolerance {
            end += 1;
        }
        if end - start > best.len() {
            best = Window { start, end };
        }
    }
    best
}
