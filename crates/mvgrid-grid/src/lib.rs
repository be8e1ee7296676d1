#![deny(missing_docs)]
//! Dense occupancy grid types for multi-view reprojection.

/// Error types for the grid module.
pub mod error;

/// Occupancy grid representation.
pub mod grid;

/// Iso-surface depth rendering for visual inspection.
pub mod render;

pub use crate::error::GridError;
pub use crate::grid::{Cell, GridSize, OccupancyGrid};
