use mvgrid_grid::{GridError, OccupancyGrid};
use num_traits::Float;

use crate::error::SamplerError;

/// Average a list of grids element-wise.
///
/// The values are summed and divided by the number of grids. The result is
/// not renormalized.
///
/// # Arguments
///
/// * `grids` - The grids to average, all of the same size.
///
/// # Errors
///
/// If `grids` is empty or the sizes differ, an error is returned.
///
/// Example:
///
/// ```
/// use mvgrid_grid::OccupancyGrid;
/// use mvgrid_sampler::average_grids;
///
/// let a = OccupancyGrid::from_size_val(2, 1.0f32).unwrap();
/// let b = OccupancyGrid::from_size_val(2, 0.0f32).unwrap();
/// let mean = average_grids(&[a, b]).unwrap();
/// assert!(mean.as_slice().iter().all(|&v| v == 0.5));
/// ```
pub fn average_grids<T: Float>(grids: &[OccupancyGrid<T>]) -> Result<OccupancyGrid<T>, SamplerError> {
    let (first, rest) = grids.split_first().ok_or(SamplerError::EmptyGrids)?;

    let mut sum = first.clone();
    for grid in rest {
        if grid.size() != sum.size() {
            return Err(GridError::SizeMismatch(sum.size(), grid.size()).into());
        }
        sum.as_slice_mut()
            .iter_mut()
            .zip(grid.as_slice())
            .for_each(|(acc, &v)| *acc = *acc + v);
    }

    if rest.is_empty() {
        return Ok(sum);
    }

    let count = <T as num_traits::NumCast>::from(grids.len()).ok_or(GridError::CastError)?;
    sum.as_slice_mut().iter_mut().for_each(|v| *v = *v / count);

    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_average_single_grid() -> Result<(), SamplerError> {
        let grid = OccupancyGrid::new(2, (0..8).map(|v| v as f32 * 0.1).collect())?;
        let mean = average_grids(std::slice::from_ref(&grid))?;
        assert_eq!(mean, grid);
        Ok(())
    }

    #[test]
    fn test_average_three_grids() -> Result<(), SamplerError> {
        let grids = [
            OccupancyGrid::from_size_val(3, 0.9f64)?,
            OccupancyGrid::from_size_val(3, 0.3f64)?,
            OccupancyGrid::new(3, (0..27).map(|v| v as f64).collect())?,
        ];
        let mean = average_grids(&grids)?;
        for (i, v) in mean.as_slice().iter().enumerate() {
            assert_relative_eq!(*v, (1.2 + i as f64) / 3.0, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_average_errors() -> Result<(), SamplerError> {
        assert_eq!(
            average_grids::<f32>(&[]),
            Err(SamplerError::EmptyGrids)
        );

        let grids = [
            OccupancyGrid::<f32>::zeros(2)?,
            OccupancyGrid::<f32>::zeros(3)?,
        ];
        assert_eq!(
            average_grids(&grids),
            Err(SamplerError::Grid(GridError::SizeMismatch(2, 3)))
        );
        Ok(())
    }
}
