//! Rayon-based scoring of the source × target pair matrix.
//!
//! Pair scores are independent of each other, so rows of the matrix may be
//! computed on any thread in any order. Results always come back in input
//! order, which keeps the greedy selection that follows deterministic.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Minimum number of rows handed to one worker.
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// Pair count from which the matrix is scored in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Configuration for parallel pair scoring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Minimum rows per rayon job
    pub batch_size: usize,
    /// Minimum pairs (sources × targets) before using parallelism
    pub parallel_threshold: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ParallelConfig {
    /// Creates a new parallel configuration.
    pub fn new(batch_size: usize, parallel_threshold: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            parallel_threshold,
        }
    }

    /// Always scores on the calling thread.
    pub fn sequential() -> Self {
        Self::new(DEFAULT_BATCH_SIZE, usize::MAX)
    }

    /// Returns whether to use parallel processing for the given pair count.
    #[inline]
    pub fn should_parallelize(&self, n_pairs: usize) -> bool {
        n_pairs >= self.parallel_threshold
    }
}

/// Maps every row through `mapper`, preserving input order.
///
/// `n_pairs` is the work estimate compared against the threshold.
pub fn map_rows<T, R, F>(rows: &[T], n_pairs: usize, config: &ParallelConfig, mapper: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    if config.should_parallelize(n_pairs) {
        rows.par_iter()
            .with_min_len(config.batch_size.max(1))
            .map(mapper)
            .collect()
    } else {
        rows.iter().map(mapper).collect()
    }
}
