#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Element-wise aggregation of grids.
pub mod aggregate;

/// Access to the recorded views of a dataset.
pub mod catalog;

/// Parameters of the view sampler.
pub mod config;

/// Error types for the sampler module.
pub mod error;

/// Random view selection and example assembly.
pub mod sampler;

pub use crate::aggregate::average_grids;
pub use crate::catalog::{InMemoryCatalog, ViewCatalog, ViewRecord};
pub use crate::config::ViewSamplerConfig;
pub use crate::error::SamplerError;
pub use crate::sampler::{GridSource, SampledGrid, ViewId, ViewSampler};
