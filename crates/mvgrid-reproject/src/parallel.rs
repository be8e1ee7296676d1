use rayon::prelude::*;

use mvgrid_grid::Cell;

use crate::error::ReprojectError;

/// Controls how the per-cell work of a reprojection is scheduled.
///
/// Every cell is computed independently, so the strategy only affects speed,
/// never the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool with one task per depth slice.
    #[default]
    ParallelSlices,

    /// Use the global Rayon thread pool with one task per slice row.
    ///
    /// Finer grained than [`ExecutionStrategy::ParallelSlices`], useful when
    /// there are fewer slices than worker threads.
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small grids, debugging, or when the caller already runs one
    /// reprojection per worker thread.
    Serial,

    /// Run on a local thread pool with `n` threads, one task per slice.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

/// Fill a channel-major grid buffer by evaluating `f` once per cell.
///
/// # Arguments
///
/// * `dst` - The destination buffer of `size^3` elements.
/// * `size` - The grid edge length.
/// * `strategy` - The execution strategy.
/// * `f` - Computes the value of one cell.
///
/// PRECONDITION: `dst.len() == size^3`.
pub fn par_fill_cells<T, F>(
    dst: &mut [T],
    size: usize,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), ReprojectError>
where
    T: Send,
    F: Fn(Cell) -> T + Send + Sync,
{
    let area = size * size;

    let fill_slice = |layer: usize, slice: &mut [T]| {
        slice
            .chunks_exact_mut(size)
            .enumerate()
            .for_each(|(row, dst_row)| fill_row(layer, row, dst_row, &f));
    };

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_exact_mut(area)
                .enumerate()
                .for_each(|(layer, slice)| fill_slice(layer, slice));
        }
        ExecutionStrategy::ParallelSlices => {
            dst.par_chunks_exact_mut(area)
                .enumerate()
                .for_each(|(layer, slice)| fill_slice(layer, slice));
        }
        ExecutionStrategy::ParallelRows => {
            dst.par_chunks_exact_mut(size)
                .enumerate()
                .for_each(|(index, dst_row)| fill_row(index / size, index % size, dst_row, &f));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ReprojectError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ReprojectError::ThreadPool(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_exact_mut(area)
                    .enumerate()
                    .for_each(|(layer, slice)| fill_slice(layer, slice));
            });
        }
    }

    Ok(())
}

#[inline]
fn fill_row<T, F>(layer: usize, row: usize, dst_row: &mut [T], f: &F)
where
    F: Fn(Cell) -> T,
{
    dst_row
        .iter_mut()
        .enumerate()
        .for_each(|(col, dst_cell)| *dst_cell = f(Cell::new(layer, row, col)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected(size: usize) -> Vec<usize> {
        (0..size * size * size).collect()
    }

    fn run(strategy: ExecutionStrategy) -> Result<Vec<usize>, ReprojectError> {
        let size = 5;
        let mut dst = vec![0usize; size * size * size];
        par_fill_cells(&mut dst, size, strategy, |cell| cell.offset(size))?;
        Ok(dst)
    }

    #[test]
    fn test_fill_serial() -> Result<(), ReprojectError> {
        assert_eq!(run(ExecutionStrategy::Serial)?, expected(5));
        Ok(())
    }

    #[test]
    fn test_fill_parallel_slices() -> Result<(), ReprojectError> {
        assert_eq!(run(ExecutionStrategy::ParallelSlices)?, expected(5));
        Ok(())
    }

    #[test]
    fn test_fill_parallel_rows() -> Result<(), ReprojectError> {
        assert_eq!(run(ExecutionStrategy::ParallelRows)?, expected(5));
        Ok(())
    }

    #[test]
    fn test_fill_fixed() -> Result<(), ReprojectError> {
        assert_eq!(run(ExecutionStrategy::Fixed(2))?, expected(5));
        Ok(())
    }

    #[test]
    fn test_fill_fixed_error() {
        let res = run(ExecutionStrategy::Fixed(0));
        assert_eq!(res, Err(ReprojectError::InvalidThreadCount(0)));
    }
}
