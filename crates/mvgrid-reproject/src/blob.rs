use mvgrid_algebra::{Mat4F64, Viewpoint};
use mvgrid_grid::{GridError, OccupancyGrid};

use crate::{error::ReprojectError, parallel::ExecutionStrategy, resample};

/// Dimensions of a flat channel-major blob as handed over by a data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobShape {
    /// Number of channels.
    pub channels: usize,
    /// Height of one channel.
    pub height: usize,
    /// Width of one channel, also the grid edge length.
    pub width: usize,
}

impl BlobShape {
    /// Create a new blob shape.
    pub fn new(channels: usize, height: usize, width: usize) -> Self {
        Self {
            channels,
            height,
            width,
        }
    }

    /// The edge length of the grid stored in the blob.
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width
    }

    /// The number of elements of one channel.
    #[inline]
    pub fn channel_area(&self) -> usize {
        self.height * self.width
    }

    /// The total number of elements of the blob.
    #[inline]
    pub fn len(&self) -> usize {
        self.channels * self.channel_area()
    }

    /// Whether the blob holds no element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Describes where the grid data starts inside a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobLayout {
    /// The blob dimensions.
    pub shape: BlobShape,
    /// Skip one leading channel block of `width * height` elements.
    pub auxiliary_header_block: bool,
}

impl BlobLayout {
    /// Create a layout where the grid starts at the first element.
    pub fn new(shape: BlobShape) -> Self {
        Self {
            shape,
            auxiliary_header_block: false,
        }
    }

    /// Set whether a leading channel block is skipped.
    pub fn with_auxiliary_header(mut self, skip: bool) -> Self {
        self.auxiliary_header_block = skip;
        self
    }

    /// Guess the layout the way the classifier layers emit their blobs.
    ///
    /// Blobs whose height equals `width * width` are unfolded classifier
    /// outputs, and their first channel holds the background class.
    pub fn infer(shape: BlobShape) -> Self {
        let skip = shape.height == shape.width * shape.width;
        log::debug!("inferred auxiliary header block = {skip} for {shape:?}");
        Self::new(shape).with_auxiliary_header(skip)
    }

    /// The edge length of the grid.
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.shape.grid_size()
    }

    /// The number of elements before the grid data.
    #[inline]
    pub fn data_offset(&self) -> usize {
        if self.auxiliary_header_block {
            self.shape.channel_area()
        } else {
            0
        }
    }
}

/// Copy the grid stored in a flat blob into an owned grid.
///
/// # Arguments
///
/// * `input` - The flat channel-major blob.
/// * `layout` - Where the grid is stored in `input`.
///
/// # Errors
///
/// If the grid size is zero or `input` is too short, an error is returned.
pub fn unpack_grid<T: Copy>(
    input: &[T],
    layout: &BlobLayout,
) -> Result<OccupancyGrid<T>, ReprojectError> {
    let size = layout.grid_size();
    if size == 0 {
        return Err(GridError::ZeroSize.into());
    }

    let offset = layout.data_offset();
    let required = offset + size * size * size;
    if input.len() < required {
        return Err(ReprojectError::BufferTooSmall(input.len(), required));
    }

    Ok(OccupancyGrid::new(size, input[offset..required].to_vec())?)
}

/// Write a grid into the front of a flat buffer, one slice after the other.
///
/// # Errors
///
/// If `output` holds fewer than `size^3` elements, an error is returned.
pub fn pack_grid<T: Copy>(grid: &OccupancyGrid<T>, output: &mut [T]) -> Result<(), ReprojectError> {
    let src = grid.as_slice();
    if output.len() < src.len() {
        return Err(ReprojectError::BufferTooSmall(output.len(), src.len()));
    }
    output[..src.len()].copy_from_slice(src);
    Ok(())
}

/// Rotate the grid stored in a flat blob from one viewpoint to another.
///
/// The grid is unpacked, reprojected and written back into `output`, in this
/// order. Only the first `size^3` elements of `output` are written.
///
/// # Arguments
///
/// * `input` - The flat channel-major blob holding the grid.
/// * `layout` - Where the grid is stored in `input`.
/// * `src` - The viewpoint the grid was predicted from.
/// * `dst` - The viewpoint to express the grid in.
/// * `proj` - The shared projection matrix.
/// * `output` - The destination buffer.
/// * `strategy` - How the per-cell work is scheduled.
///
/// # Errors
///
/// If any buffer is too small or the destination transform is singular, an
/// error is returned and `output` is left untouched.
///
/// Example:
///
/// ```
/// use mvgrid_algebra::{Mat4F64, Viewpoint};
/// use mvgrid_reproject::{rotate_buffer, BlobLayout, BlobShape, ExecutionStrategy};
///
/// let proj = Mat4F64::perspective(std::f64::consts::FRAC_PI_2, 1.0, 2.0, 10.0);
/// let pose = Viewpoint::precomposed(Mat4F64::from_translation([0.0, 0.0, -5.0]));
///
/// let layout = BlobLayout::new(BlobShape::new(8, 8, 8));
/// let input = (0..512).map(|v| v as f32).collect::<Vec<_>>();
/// let mut output = vec![0.0f32; 512];
///
/// rotate_buffer(&input, &layout, &pose, &pose, &proj, &mut output, ExecutionStrategy::Serial).unwrap();
/// assert_eq!(input, output);
/// ```
pub fn rotate_buffer<T>(
    input: &[T],
    layout: &BlobLayout,
    src: &Viewpoint,
    dst: &Viewpoint,
    proj: &Mat4F64,
    output: &mut [T],
    strategy: ExecutionStrategy,
) -> Result<(), ReprojectError>
where
    T: Copy + Send + Sync,
{
    let size = layout.grid_size();
    let required = size * size * size;
    if output.len() < required {
        return Err(ReprojectError::BufferTooSmall(output.len(), required));
    }

    let grid = unpack_grid(input, layout)?;
    let rotated = resample::reproject(&grid, src, dst, proj, strategy)?;
    pack_grid(&rotated, output)
}

/// A viewpoint given as two flat row-major matrices.
#[derive(Debug, Clone, Copy)]
pub struct RawViewpoint<'a> {
    /// The 16 entries of the model matrix, row after row.
    pub model: &'a [f64],
    /// The 16 entries of the view matrix, row after row.
    pub view: &'a [f64],
}

impl RawViewpoint<'_> {
    /// Load the matrices into a [`Viewpoint`].
    pub fn to_viewpoint(&self) -> Result<Viewpoint, ReprojectError> {
        Ok(Viewpoint::new(
            Mat4F64::from_row_major_slice(self.model)?,
            Mat4F64::from_row_major_slice(self.view)?,
        ))
    }
}

/// Like [`rotate_buffer`], with every matrix given as a flat row-major slice.
///
/// # Errors
///
/// In addition to the errors of [`rotate_buffer`], a matrix that does not hold
/// exactly 16 elements is rejected.
pub fn rotate_buffer_raw<T>(
    input: &[T],
    layout: &BlobLayout,
    src: RawViewpoint<'_>,
    dst: RawViewpoint<'_>,
    proj: &[f64],
    output: &mut [T],
    strategy: ExecutionStrategy,
) -> Result<(), ReprojectError>
where
    T: Copy + Send + Sync,
{
    let src = src.to_viewpoint()?;
    let dst = dst.to_viewpoint()?;
    let proj = Mat4F64::from_row_major_slice(proj)?;
    rotate_buffer(input, layout, &src, &dst, &proj, output, strategy)
}
