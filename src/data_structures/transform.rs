//! Local transformation data of a drawable.
//!
//! A [`Transform`] is plain data: a translation, a unit rotation quaternion and
//! a non-uniform scale. It knows how to compose itself with deltas and how to
//! turn itself into a local matrix, nothing more.

use cgmath::{InnerSpace, One, Zero};

/// Translation, rotation (as quaternion) and scale of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Transform {
    /// Identity transform: origin, no rotation, unit scale.
    pub fn new() -> Self {
        Self {
            translation: cgmath::Vector3::zero(),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Local matrix, translation applied last: `T * R * S`.
    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.translation)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn translate(&mut self, delta: cgmath::Vector3<f32>) {
        self.translation += delta;
    }

    /// Post-multiplies `rotation`, i.e. applies it in the current local frame.
    pub fn rotate(&mut self, rotation: cgmath::Quaternion<f32>) {
        self.rotation = (self.rotation * rotation).normalize();
    }

    pub fn scale(&mut self, factors: cgmath::Vector3<f32>) {
        self.scale = cgmath::Vector3::new(
            self.scale.x * factors.x,
            self.scale.y * factors.y,
            self.scale.z * factors.z,
        );
    }

    pub fn reset_translation(&mut self) {
        self.translation = cgmath::Vector3::zero();
    }

    pub fn reset_rotation(&mut self) {
        self.rotation = cgmath::Quaternion::one();
    }

    pub fn reset_scale(&mut self) {
        self.scale = cgmath::Vector3::new(1.0, 1.0, 1.0);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<cgmath::Vector3<f32>> for Transform {
    fn from(translation: cgmath::Vector3<f32>) -> Self {
        Transform {
            translation,
            ..Default::default()
        }
    }
}
