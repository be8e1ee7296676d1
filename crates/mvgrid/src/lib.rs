#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use mvgrid_algebra as algebra;

#[doc(inline)]
pub use mvgrid_grid as grid;

#[doc(inline)]
pub use mvgrid_reproject as reproject;

#[doc(inline)]
pub use mvgrid_sampler as sampler;
