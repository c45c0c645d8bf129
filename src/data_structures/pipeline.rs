//! Matrix pipeline of a drawable.
//!
//! Everything here is a pure function of the current local transform, the
//! world matrix handed down by the parent and the camera's view-project
//! matrix. Nodes store the result by value and recompute it eagerly after
//! every mutation, so a draw call can never observe a stale matrix.

use cgmath::{EuclideanSpace, SquareMatrix, Transform as _};

use crate::data_structures::transform::Transform;

/// Derived matrices of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrices {
    /// `T * R * S` of the local transform.
    pub local: cgmath::Matrix4<f32>,
    /// `world * local`
    pub model: cgmath::Matrix4<f32>,
    /// `view_project * model`
    pub model_view_project: cgmath::Matrix4<f32>,
}

impl Matrices {
    pub fn identity() -> Self {
        Self {
            local: cgmath::Matrix4::identity(),
            model: cgmath::Matrix4::identity(),
            model_view_project: cgmath::Matrix4::identity(),
        }
    }

    pub fn compose(
        transform: &Transform,
        world: &cgmath::Matrix4<f32>,
        view_project: &cgmath::Matrix4<f32>,
    ) -> Self {
        let local = transform.to_matrix();
        let model = *world * local;
        let model_view_project = *view_project * model;
        Self {
            local,
            model,
            model_view_project,
        }
    }
}

impl Default for Matrices {
    fn default() -> Self {
        Self::identity()
    }
}

/// The node's origin pushed through `world` and then `view_project`.
///
/// Only the translation participates, so rotating or scaling a node never
/// moves its ray. Both transforms include the homogeneous divide; no
/// inverse projection or depth solve happens here.
pub fn camera_ray(
    translation: cgmath::Vector3<f32>,
    world: &cgmath::Matrix4<f32>,
    view_project: &cgmath::Matrix4<f32>,
) -> cgmath::Vector3<f32> {
    let in_world = world.transform_point(cgmath::Point3::from_vec(translation));
    view_project.transform_point(in_world).to_vec()
}
