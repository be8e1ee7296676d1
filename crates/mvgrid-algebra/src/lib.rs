#![deny(missing_docs)]
//! Algebraic types for multi-view occupancy grids.
//!
//! This crate provides:
//! - `Mat4F64` / `Vec4F64`: newtypes over the `glam` double precision backend
//! - `Viewpoint`: a recorded camera pose made of a model and a view matrix

mod error;
mod matrix;
mod vector;
mod viewpoint;

pub use error::AlgebraError;
pub use matrix::Mat4F64;
pub use vector::Vec4F64;
pub use viewpoint::Viewpoint;

/// Alias used across the workspace for a homogeneous 4x4 transform.
pub type Transform4x4 = Mat4F64;
