//! 4x4 homogeneous matrix (double precision).

use std::ops::{Deref, DerefMut};

use crate::{error::AlgebraError, vector::Vec4F64};

/// 4x4 homogeneous matrix (double precision).
///
/// This is a thin `#[repr(transparent)]` newtype over `glam::DMat4`. The backend
/// stores columns, while the data collaborators hand over row-major buffers, so
/// every constructor states which layout it expects.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Mat4F64(pub glam::DMat4);

impl Mat4F64 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self(glam::DMat4::IDENTITY);

    /// Create a new matrix from column vectors.
    #[inline]
    pub fn from_cols(x_axis: Vec4F64, y_axis: Vec4F64, z_axis: Vec4F64, w_axis: Vec4F64) -> Self {
        Self(glam::DMat4::from_cols(
            x_axis.into(),
            y_axis.into(),
            z_axis.into(),
            w_axis.into(),
        ))
    }

    /// Create a new matrix from a column-major array.
    #[inline]
    pub fn from_cols_array(arr: &[f64; 16]) -> Self {
        Self(glam::DMat4::from_cols_array(arr))
    }

    /// Create a new matrix from a row-major array.
    #[inline]
    pub fn from_rows_array(arr: &[f64; 16]) -> Self {
        Self(glam::DMat4::from_cols_array(arr).transpose())
    }

    /// Create a new matrix from a flat row-major buffer.
    ///
    /// # Arguments
    ///
    /// * `data` - The 16 matrix entries, row after row.
    ///
    /// # Errors
    ///
    /// If the buffer does not hold exactly 16 elements, an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use mvgrid_algebra::Mat4F64;
    ///
    /// let data = [
    ///     1.0, 0.0, 0.0, 3.0,
    ///     0.0, 1.0, 0.0, 4.0,
    ///     0.0, 0.0, 1.0, 5.0,
    ///     0.0, 0.0, 0.0, 1.0,
    /// ];
    /// let m = Mat4F64::from_row_major_slice(&data).unwrap();
    /// assert_eq!(m.element(0, 3), 3.0);
    /// assert_eq!(m.element(2, 3), 5.0);
    /// ```
    pub fn from_row_major_slice(data: &[f64]) -> Result<Self, AlgebraError> {
        let arr: &[f64; 16] = data
            .try_into()
            .map_err(|_| AlgebraError::InvalidMatrixLength(data.len()))?;
        Ok(Self::from_rows_array(arr))
    }

    /// Create a new matrix from a flat row-major single precision buffer.
    pub fn from_row_major_f32(data: &[f32]) -> Result<Self, AlgebraError> {
        if data.len() != 16 {
            return Err(AlgebraError::InvalidMatrixLength(data.len()));
        }
        let mut arr = [0.0f64; 16];
        arr.iter_mut()
            .zip(data.iter())
            .for_each(|(dst, src)| *dst = *src as f64);
        Ok(Self::from_rows_array(&arr))
    }

    /// Convert the matrix to a flat row-major array.
    #[inline]
    pub fn to_rows_array(&self) -> [f64; 16] {
        self.0.transpose().to_cols_array()
    }

    /// Read the entry at `row` and `col`.
    #[inline]
    pub fn element(&self, row: usize, col: usize) -> f64 {
        self.0.col(col)[row]
    }

    /// Invert the matrix.
    ///
    /// Returns `None` when the determinant is exactly zero. Near-singular
    /// matrices are inverted as-is and may produce non-finite entries.
    pub fn try_inverse(&self) -> Option<Self> {
        if self.0.determinant() == 0.0 {
            return None;
        }
        Some(Self(self.0.inverse()))
    }

    /// OpenGL style right-handed perspective projection.
    ///
    /// Depth is mapped to `[-1, 1]` in normalized device coordinates, which is
    /// the convention the grid depth quantization is calibrated against.
    pub fn perspective(fov_y_radians: f64, aspect_ratio: f64, z_near: f64, z_far: f64) -> Self {
        Self(glam::DMat4::perspective_rh_gl(
            fov_y_radians,
            aspect_ratio,
            z_near,
            z_far,
        ))
    }

    /// Rotation around the y axis (yaw).
    #[inline]
    pub fn from_rotation_y(angle: f64) -> Self {
        Self(glam::DMat4::from_rotation_y(angle))
    }

    /// Rotation around the x axis (pitch).
    #[inline]
    pub fn from_rotation_x(angle: f64) -> Self {
        Self(glam::DMat4::from_rotation_x(angle))
    }

    /// Pure translation.
    #[inline]
    pub fn from_translation(translation: [f64; 3]) -> Self {
        Self(glam::DMat4::from_translation(glam::DVec3::from_array(
            translation,
        )))
    }
}

impl Default for Mat4F64 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Deref for Mat4F64 {
    type Target = glam::DMat4;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Mat4F64 {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<glam::DMat4> for Mat4F64 {
    #[inline]
    fn from(m: glam::DMat4) -> Self {
        Self(m)
    }
}

impl From<Mat4F64> for glam::DMat4 {
    #[inline]
    fn from(m: Mat4F64) -> Self {
        m.0
    }
}

// Matrix-matrix multiplication.
impl std::ops::Mul<Mat4F64> for Mat4F64 {
    type Output = Mat4F64;

    #[inline]
    fn mul(self, rhs: Mat4F64) -> Self::Output {
        Mat4F64(self.0 * rhs.0)
    }
}

// Matrix-vector multiplication.
impl std::ops::Mul<Vec4F64> for Mat4F64 {
    type Output = Vec4F64;

    #[inline]
    fn mul(self, rhs: Vec4F64) -> Self::Output {
        Vec4F64(self.0 * rhs.0)
    }
}
