#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Marshalling between flat channel-major buffers and occupancy grids.
pub mod blob;

/// Mapping of normalized grid coordinates between two viewpoints.
pub mod coords;

/// Non-linear quantization of depth layers.
pub mod depth;

/// Error types for the reprojection module.
pub mod error;

/// Execution strategies for the per-cell work.
pub mod parallel;

/// Nearest neighbour resampling of whole grids.
pub mod resample;

pub use crate::blob::{
    pack_grid, rotate_buffer, rotate_buffer_raw, unpack_grid, BlobLayout, BlobShape, RawViewpoint,
};
pub use crate::coords::{map_coordinate, CoordinateTransform};
pub use crate::depth::{depth_to_layer, layer_to_depth, DepthCodec};
pub use crate::error::ReprojectError;
pub use crate::parallel::ExecutionStrategy;
pub use crate::resample::{reproject, reproject_with, resample_cell};
