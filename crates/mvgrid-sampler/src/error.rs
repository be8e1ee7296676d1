use mvgrid_grid::GridError;
use mvgrid_reproject::ReprojectError;

use crate::sampler::ViewId;

/// An error type for the sampler module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SamplerError {
    /// Error when the sampler configuration is inconsistent.
    #[error("Invalid sampler configuration: {0}")]
    InvalidConfig(String),

    /// Error when fewer distinct candidate views exist than requested.
    #[error("Not enough candidate views: requested {requested}, available {available}")]
    NotEnoughCandidates {
        /// Number of views requested.
        requested: usize,
        /// Number of candidate views left after excluding the current one.
        available: usize,
    },

    /// Error when the catalog has no record for a view.
    #[error("No record for view {0:?}")]
    MissingView(ViewId),

    /// Error when averaging an empty list of grids.
    #[error("Cannot average an empty list of grids")]
    EmptyGrids,

    /// Error raised while building or combining grids.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Error raised while reprojecting a grid.
    #[error(transparent)]
    Reproject(#[from] ReprojectError),
}
