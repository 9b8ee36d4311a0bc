use rayon::prelude::*;
use thiserror::Error;

use brushstamp_image::{Image, ImageError};

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

impl From<ParallelError> for ImageError {
    fn from(err: ParallelError) -> Self {
        ImageError::ExecutionError(err.to_string())
    }
}

/// Controls how row-wise image operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

/// Apply a function to every row of the destination image.
///
/// The closure receives the row index and the mutable row slice of
/// `width * C` values. Every row is written by exactly one call, so the
/// result does not depend on the strategy as long as `f` only depends on
/// its arguments.
pub fn for_each_row<T, const C: usize>(
    dst: &mut Image<T, C>,
    strategy: ExecutionStrategy,
    f: impl Fn(usize, &mut [T]) + Send + Sync,
) -> Result<(), ParallelError>
where
    T: Send,
{
    let stride = dst.row_stride();
    let data = dst.as_slice_mut();

    match strategy {
        ExecutionStrategy::Serial => {
            data.chunks_exact_mut(stride)
                .enumerate()
                .for_each(|(row, dst_row)| f(row, dst_row));
        }
        ExecutionStrategy::ParallelRows => {
            data.par_chunks_exact_mut(stride)
                .enumerate()
                .for_each(|(row, dst_row)| f(row, dst_row));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                data.par_chunks_exact_mut(stride)
                    .enumerate()
                    .for_each(|(row, dst_row)| f(row, dst_row));
            });
        }
    }

    Ok(())
}
