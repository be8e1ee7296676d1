use mvgrid_algebra::{Mat4F64, Viewpoint};
use mvgrid_grid::{Cell, OccupancyGrid};

use crate::{
    coords::CoordinateTransform,
    depth::DepthCodec,
    error::ReprojectError,
    parallel::{self, ExecutionStrategy},
};

/// Find the source cell a destination cell samples from.
///
/// # Arguments
///
/// * `cell` - The destination cell.
/// * `transform` - The destination to source coordinate mapping.
/// * `codec` - The depth quantization of the grid.
///
/// # Returns
///
/// The nearest source cell, always inside the grid.
pub fn resample_cell(cell: Cell, transform: &CoordinateTransform, codec: &DepthCodec) -> Cell {
    let size = codec.size();
    let sizef = size as f64;

    // columns run along x, rows run against y
    let x = (cell.col as f64 + 0.5) / sizef;
    let y = 1.0 - (cell.row as f64 + 0.5) / sizef;
    let z = codec.layer_to_depth(cell.layer);

    let [src_x, src_y, src_z] = transform.apply([x, y, z]);

    let row = ((1.0 - src_y) * sizef).floor() as usize;
    let col = (src_x * sizef).floor() as usize;
    let layer = codec.depth_to_layer_clamped(src_z);

    Cell::new(layer, row.min(size - 1), col.min(size - 1))
}

/// Reproject a grid with a precomputed coordinate transform.
///
/// See [`reproject`].
pub fn reproject_with<T>(
    src: &OccupancyGrid<T>,
    transform: &CoordinateTransform,
    proj: &Mat4F64,
    strategy: ExecutionStrategy,
) -> Result<OccupancyGrid<T>, ReprojectError>
where
    T: Copy + Send + Sync,
{
    let size = src.size();
    let codec = DepthCodec::new(size, *proj);
    let src_data = src.as_slice();

    // every entry is overwritten below
    let mut dst_data = src_data.to_vec();

    let now = std::time::Instant::now();
    parallel::par_fill_cells(&mut dst_data, size, strategy, |cell| {
        let src_cell = resample_cell(cell, transform, &codec);
        src_data[src_cell.offset(size)]
    })?;
    log::debug!(
        "reprojected {} grid with {:?} in {:?}",
        src.grid_size(),
        strategy,
        now.elapsed()
    );

    Ok(OccupancyGrid::new(size, dst_data)?)
}

/// Re-express an occupancy grid predicted from one viewpoint as seen from another.
///
/// Every destination cell is mapped back to the source viewpoint and takes
/// the value of the nearest source cell. There is no interpolation, so the
/// output only ever contains values present in the input.
///
/// # Arguments
///
/// * `src` - The grid predicted from the `src_view` viewpoint.
/// * `src_view` - The viewpoint of the input grid.
/// * `dst_view` - The viewpoint of the output grid.
/// * `proj` - The projection shared by both viewpoints.
/// * `strategy` - How the per-cell work is scheduled.
///
/// # Returns
///
/// A new grid of the same size as `src`.
///
/// # Errors
///
/// If the destination transform is singular or the thread pool cannot be
/// built, an error is returned.
///
/// # Example
///
/// ```
/// use mvgrid_algebra::{Mat4F64, Viewpoint};
/// use mvgrid_grid::OccupancyGrid;
/// use mvgrid_reproject::{reproject, ExecutionStrategy};
///
/// let proj = Mat4F64::perspective(std::f64::consts::FRAC_PI_2, 1.0, 2.0, 10.0);
/// let pose = Viewpoint::new(Mat4F64::IDENTITY, Mat4F64::from_translation([0.0, 0.0, -5.0]));
///
/// let mut grid = OccupancyGrid::<f32>::zeros(32).unwrap();
/// grid[[16, 8, 8]] = 1.0;
///
/// let out = reproject(&grid, &pose, &pose, &proj, ExecutionStrategy::default()).unwrap();
/// assert_eq!(out, grid);
/// ```
pub fn reproject<T>(
    src: &OccupancyGrid<T>,
    src_view: &Viewpoint,
    dst_view: &Viewpoint,
    proj: &Mat4F64,
    strategy: ExecutionStrategy,
) -> Result<OccupancyGrid<T>, ReprojectError>
where
    T: Copy + Send + Sync,
{
    let transform = CoordinateTransform::new(src_view, dst_view, proj)?;
    reproject_with(src, &transform, proj, strategy)
}
