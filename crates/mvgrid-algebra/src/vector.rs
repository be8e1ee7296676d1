//! 4D homogeneous vector (double precision).

use std::ops::{Deref, DerefMut};

/// 4D homogeneous vector (double precision).
///
/// This is a newtype wrapper around `glam::DVec4`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Vec4F64(pub glam::DVec4);

impl Vec4F64 {
    /// Create a new Vec4 from x, y, z, and w components.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self(glam::DVec4::new(x, y, z, w))
    }

    /// Create a homogeneous point (`w = 1`).
    #[inline]
    pub fn from_point(p: [f64; 3]) -> Self {
        Self::new(p[0], p[1], p[2], 1.0)
    }

    /// Create a Vec4 from an array.
    #[inline]
    pub fn from_array(arr: [f64; 4]) -> Self {
        Self(glam::DVec4::from_array(arr))
    }

    /// Convert to array.
    #[inline]
    pub fn to_array(self) -> [f64; 4] {
        self.0.to_array()
    }

    /// Divide every component by the homogeneous `w` component.
    #[inline]
    pub fn perspective_divide(self) -> Self {
        Self(self.0 / self.0.w)
    }

    /// Zero vector.
    pub const ZERO: Self = Self(glam::DVec4::ZERO);
}

impl Deref for Vec4F64 {
    type Target = glam::DVec4;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Vec4F64 {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<glam::DVec4> for Vec4F64 {
    #[inline]
    fn from(v: glam::DVec4) -> Self {
        Self(v)
    }
}

impl From<Vec4F64> for glam::DVec4 {
    #[inline]
    fn from(v: Vec4F64) -> Self {
        v.0
    }
}

impl From<[f64; 4]> for Vec4F64 {
    #[inline]
    fn from(arr: [f64; 4]) -> Self {
        Self::from_array(arr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec4_basic() {
        let v = Vec4F64::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
        assert_eq!(v.w, 4.0);
        assert_eq!(Vec4F64::from_array(v.to_array()), v);
    }

    #[test]
    fn test_perspective_divide() {
        let v = Vec4F64::new(2.0, 4.0, -6.0, 2.0).perspective_divide();
        assert_eq!(v.to_array(), [1.0, 2.0, -3.0, 1.0]);
        assert_eq!(Vec4F64::from_point([1.0, 2.0, 3.0]).w, 1.0);
    }
}
