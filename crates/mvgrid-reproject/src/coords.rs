use mvgrid_algebra::{Mat4F64, Vec4F64, Viewpoint};

use crate::error::ReprojectError;

/// Lower bound of every mapped coordinate.
pub const CLAMP_MIN: f64 = 0.01;

/// Upper bound of every mapped coordinate.
pub const CLAMP_MAX: f64 = 0.99;

// NaN falls back to CLAMP_MIN: `f64::max` ignores a NaN operand.
#[inline]
fn clamp_unit(v: f64) -> f64 {
    v.max(CLAMP_MIN).min(CLAMP_MAX)
}

/// Maps normalized grid coordinates from a destination viewpoint back to a
/// source viewpoint.
///
/// Both viewpoints share the same projection. The inverse of the destination
/// transform is computed once, so a single instance can be applied to every
/// cell of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    dst_inverse: Mat4F64,
    src_mvp: Mat4F64,
}

impl CoordinateTransform {
    /// Create the transform from `dst` back to `src`.
    ///
    /// # Arguments
    ///
    /// * `src` - The viewpoint the source grid was predicted from.
    /// * `dst` - The viewpoint the output grid is expressed in.
    /// * `proj` - The projection shared by both viewpoints.
    ///
    /// # Errors
    ///
    /// If `proj * dst.view * dst.model` is singular, an error is returned.
    pub fn new(src: &Viewpoint, dst: &Viewpoint, proj: &Mat4F64) -> Result<Self, ReprojectError> {
        let dst_inverse = dst
            .model_view_projection(proj)
            .try_inverse()
            .ok_or(ReprojectError::SingularTransform)?;

        Ok(Self {
            dst_inverse,
            src_mvp: src.model_view_projection(proj),
        })
    }

    /// Map one normalized coordinate.
    ///
    /// The coordinate is lifted to normalized device coordinates, unprojected
    /// through the destination camera, projected through the source camera and
    /// divided by `w`. Each axis is rescaled to `[0, 1]` and clamped to
    /// `[CLAMP_MIN, CLAMP_MAX]` so that downstream lookups never touch the
    /// outer boundary.
    pub fn apply(&self, coord: [f64; 3]) -> [f64; 3] {
        let [x, y, z] = coord;
        let ndc = Vec4F64::new(x * 2.0 - 1.0, y * 2.0 - 1.0, z * 2.0 - 1.0, 1.0);

        let position = self.dst_inverse * ndc;
        let src_ndc = (self.src_mvp * position).perspective_divide();

        [
            clamp_unit(src_ndc.x / 2.0 + 0.5),
            clamp_unit(src_ndc.y / 2.0 + 0.5),
            clamp_unit(src_ndc.z / 2.0 + 0.5),
        ]
    }
}

/// Map a normalized coordinate of the destination viewpoint to the source viewpoint.
///
/// Convenience wrapper building a [`CoordinateTransform`] for a single point.
///
/// Example:
///
/// ```
/// use mvgrid_algebra::{Mat4F64, Viewpoint};
/// use mvgrid_reproject::coords::map_coordinate;
///
/// let proj = Mat4F64::perspective(std::f64::consts::FRAC_PI_2, 1.0, 2.0, 10.0);
/// let pose = Viewpoint::new(Mat4F64::IDENTITY, Mat4F64::from_translation([0.0, 0.0, -5.0]));
///
/// let mapped = map_coordinate([0.0, 0.5, 1.0], &pose, &pose, &proj).unwrap();
/// assert_eq!(mapped[0], 0.01);
/// assert!((mapped[1] - 0.5).abs() < 1e-9);
/// assert_eq!(mapped[2], 0.99);
/// ```
pub fn map_coordinate(
    coord: [f64; 3],
    src: &Viewpoint,
    dst: &Viewpoint,
    proj: &Mat4F64,
) -> Result<[f64; 3], ReprojectError> {
    Ok(CoordinateTransform::new(src, dst, proj)?.apply(coord))
}
