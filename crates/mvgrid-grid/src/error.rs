/// An error type for the grid module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GridError {
    /// Error when the grid edge length is zero.
    #[error("Grid size must be greater than zero")]
    ZeroSize,

    /// Error when the data length does not match the grid size.
    #[error("Data length ({0}) does not match the grid size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when a slice does not have the expected square area.
    #[error("Slice {0} has {1} elements, expected {2}")]
    InvalidSliceLength(usize, usize, usize),

    /// Error when two grids are combined but their sizes differ.
    #[error("Grid size mismatch: {0} != {1}")]
    SizeMismatch(usize, usize),

    /// Error when a value cannot be cast to the target type.
    #[error("Failed to cast grid value")]
    CastError,
}
