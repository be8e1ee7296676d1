use crate::matrix::Mat4F64;

/// A recorded camera pose under which a grid was predicted or rendered.
///
/// The two-matrix form keeps the object model matrix and the camera view
/// matrix apart. Datasets that only store a single combined matrix use
/// [`Viewpoint::precomposed`], which leaves the view as identity so that
/// `view * model` reduces to the stored matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewpoint {
    /// Object to world transform.
    pub model: Mat4F64,
    /// World to camera transform.
    pub view: Mat4F64,
}

impl Viewpoint {
    /// Create a viewpoint from separate model and view matrices.
    pub fn new(model: Mat4F64, view: Mat4F64) -> Self {
        Self { model, view }
    }

    /// Create a viewpoint from a single precomposed model-view matrix.
    pub fn precomposed(model_view: Mat4F64) -> Self {
        Self {
            model: model_view,
            view: Mat4F64::IDENTITY,
        }
    }

    /// The combined `view * model` transform.
    #[inline]
    pub fn model_view(&self) -> Mat4F64 {
        self.view * self.model
    }

    /// The full object to clip space transform `proj * view * model`.
    #[inline]
    pub fn model_view_projection(&self, proj: &Mat4F64) -> Mat4F64 {
        *proj * self.view * self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precomposed_matches_two_matrix_form() {
        let model = Mat4F64::from_rotation_y(0.7);
        let view = Mat4F64::from_translation([0.0, 0.0, -5.0]);
        let proj = Mat4F64::perspective(0.8, 1.0, 2.0, 10.0);

        let pose = Viewpoint::new(model, view);
        let single = Viewpoint::precomposed(pose.model_view());

        assert_eq!(single.model_view(), pose.model_view());
        assert_eq!(
            single.model_view_projection(&proj),
            proj * pose.model_view()
        );
    }
}
