use mvgrid_algebra::Mat4F64;

// Calibration of the grid producer: layers are spread over view space depths
// between -NEAR_DEPTH and -(NEAR_DEPTH + DEPTH_SPAN).
const LAYER_STRIDE: f64 = 0.8;
const NEAR_DEPTH: f64 = 2.5;
const DEPTH_SPAN: f64 = 5.5;

// Layer offset in world units; integer division of the grid size.
#[inline]
fn layer_offset(size: usize) -> f64 {
    (size / 16) as f64
}

/// Convert a discrete depth layer to a normalized device depth in `[0, 1]`.
///
/// The layer is first placed along the view space z axis using the
/// quantization of the grid producer, then pushed through the perspective
/// terms of `proj` and rescaled from `[-1, 1]` to `[0, 1]`.
///
/// # Arguments
///
/// * `layer` - The depth layer, in `[0, size)`.
/// * `size` - The grid edge length.
/// * `proj` - A perspective projection matrix.
///
/// # Returns
///
/// The depth, approximately in `[0, 1]`. No clamping is applied.
///
/// Example:
///
/// ```
/// use mvgrid_algebra::Mat4F64;
/// use mvgrid_reproject::depth::{depth_to_layer, layer_to_depth};
///
/// let proj = Mat4F64::perspective(std::f64::consts::FRAC_PI_2, 1.0, 2.0, 10.0);
/// let depth = layer_to_depth(10, 32, &proj);
/// assert_eq!(depth_to_layer(depth, 32, &proj), 10);
/// ```
pub fn layer_to_depth(layer: usize, size: usize, proj: &Mat4F64) -> f64 {
    let zf = layer as f64 * LAYER_STRIDE + layer_offset(size);
    let depth_lin = -(zf + 0.5) / size as f64 * DEPTH_SPAN - NEAR_DEPTH;
    let depth_ndc = -proj.element(2, 3) / depth_lin - proj.element(2, 2);
    depth_ndc / 2.0 + 0.5
}

/// Convert a normalized device depth in `[0, 1]` back to a discrete depth layer.
///
/// This is the algebraic inverse of [`layer_to_depth`], rounded to the nearest
/// layer (halfway cases away from zero).
///
/// # Returns
///
/// The layer index. It is not clamped and may fall outside `[0, size)`.
pub fn depth_to_layer(depth: f64, size: usize, proj: &Mat4F64) -> i64 {
    let depth_ndc = depth * 2.0 - 1.0;
    let depth_lin = -proj.element(2, 3) / (depth_ndc + proj.element(2, 2));
    let zf = (-(depth_lin + NEAR_DEPTH) / DEPTH_SPAN) * size as f64 - 0.5;
    ((zf - layer_offset(size)) / LAYER_STRIDE).round() as i64
}

/// Depth quantization bound to one grid size and projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthCodec {
    size: usize,
    proj: Mat4F64,
}

impl DepthCodec {
    /// Create a new codec for grids of the given size.
    pub fn new(size: usize, proj: Mat4F64) -> Self {
        Self { size, proj }
    }

    /// The grid edge length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// See [`layer_to_depth`].
    #[inline]
    pub fn layer_to_depth(&self, layer: usize) -> f64 {
        layer_to_depth(layer, self.size, &self.proj)
    }

    /// See [`depth_to_layer`].
    #[inline]
    pub fn depth_to_layer(&self, depth: f64) -> i64 {
        depth_to_layer(depth, self.size, &self.proj)
    }

    /// Like [`DepthCodec::depth_to_layer`] but clamped to `[0, size - 1]`.
    #[inline]
    pub fn depth_to_layer_clamped(&self, depth: f64) -> usize {
        let max_layer = self.size.saturating_sub(1) as i64;
        self.depth_to_layer(depth).clamp(0, max_layer) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn projections() -> Vec<Mat4F64> {
        vec![
            Mat4F64::perspective(std::f64::consts::FRAC_PI_2, 1.0, 2.0, 10.0),
            Mat4F64::perspective(0.85, 1.0, 0.1, 100.0),
            Mat4F64::perspective(0.6, 4.0 / 3.0, 1.0, 20.0),
        ]
    }

    #[test]
    fn test_layer_offset_is_integer_division() {
        assert_eq!(layer_offset(32), 2.0);
        assert_eq!(layer_offset(64), 4.0);
        assert_eq!(layer_offset(40), 2.0);
        assert_eq!(layer_offset(8), 0.0);
    }

    #[test]
    fn test_layer_to_depth_known_value() {
        // near = 2, far = 10: proj(2, 2) = -1.5, proj(2, 3) = -5
        let proj = Mat4F64::perspective(std::f64::consts::FRAC_PI_2, 1.0, 2.0, 10.0);
        // size 64, layer 0: zf = 4, depth_lin = -(4.5 / 64) * 5.5 - 2.5
        let depth_lin = -(4.5 / 64.0) * 5.5 - 2.5;
        let expected = (5.0 / depth_lin + 1.5) / 2.0 + 0.5;
        assert_relative_eq!(layer_to_depth(0, 64, &proj), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_depth_increases_with_layer() {
        for proj in projections() {
            let depths = (0..64)
                .map(|l| layer_to_depth(l, 64, &proj))
                .collect::<Vec<_>>();
            assert!(depths.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_depth_round_trip() {
        for proj in projections() {
            for size in [16, 32, 64] {
                for layer in 0..size {
                    let depth = layer_to_depth(layer, size, &proj);
                    assert_eq!(depth_to_layer(depth, size, &proj), layer as i64);
                }
            }
        }
    }

    #[test]
    fn test_depth_to_layer_unclamped() {
        let proj = Mat4F64::perspective(std::f64::consts::FRAC_PI_2, 1.0, 2.0, 10.0);
        let codec = DepthCodec::new(32, proj);
        let before_first = codec.layer_to_depth(0) - 0.05;
        let after_last = codec.layer_to_depth(31) + 0.02;

        assert!(codec.depth_to_layer(before_first) < 0);
        assert!(codec.depth_to_layer(after_last) > 31);
        assert_eq!(codec.depth_to_layer_clamped(before_first), 0);
        assert_eq!(codec.depth_to_layer_clamped(after_last), 31);
    }
}
