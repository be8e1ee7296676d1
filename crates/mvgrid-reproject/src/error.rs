use mvgrid_algebra::AlgebraError;
use mvgrid_grid::GridError;

/// An error type for the reprojection module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ReprojectError {
    /// Error raised while building or reading a grid.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Error raised while loading a transform.
    #[error(transparent)]
    Algebra(#[from] AlgebraError),

    /// Error when the destination model-view-projection matrix has no inverse.
    #[error("Cannot invert the destination model-view-projection transform")]
    SingularTransform,

    /// Error when a buffer holds fewer elements than the grid needs.
    #[error("Buffer length ({0}) is smaller than the required {1} elements")]
    BufferTooSmall(usize, usize),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}
