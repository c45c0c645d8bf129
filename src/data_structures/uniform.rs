//! Uniform values stored on a drawable and handed to a program at draw time.

use std::collections::HashMap;

/// Uniform written by every node after each matrix recomputation.
pub const MODEL_VIEW_PROJECT: &str = "modelViewProject";
/// Extra uniform derived by the atmosphere shell on every view update.
pub const NORMAL_MATRIX: &str = "normalMatrix";

/// Uniform table of a node: name to value, keys unique.
pub type Uniforms = HashMap<String, UniformValue>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(cgmath::Vector2<f32>),
    Vec3(cgmath::Vector3<f32>),
    Vec4(cgmath::Vector4<f32>),
    Mat3(cgmath::Matrix3<f32>),
    Mat4(cgmath::Matrix4<f32>),
}

impl UniformValue {
    /**
     * Raw bytes as they would be written into a uniform buffer.
     *
     * Matrices are column major, like cgmath stores them. No std140 padding is
     * inserted, that is up to the program owning the buffer layout.
     */
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            UniformValue::Int(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Float(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Vec2(v) => {
                let raw: [f32; 2] = (*v).into();
                bytemuck::cast_slice(&raw).to_vec()
            }
            UniformValue::Vec3(v) => {
                let raw: [f32; 3] = (*v).into();
                bytemuck::cast_slice(&raw).to_vec()
            }
            UniformValue::Vec4(v) => {
                let raw: [f32; 4] = (*v).into();
                bytemuck::cast_slice(&raw).to_vec()
            }
            UniformValue::Mat3(m) => {
                let raw: [[f32; 3]; 3] = (*m).into();
                bytemuck::cast_slice(&raw).to_vec()
            }
            UniformValue::Mat4(m) => {
                let raw: [[f32; 4]; 4] = (*m).into();
                bytemuck::cast_slice(&raw).to_vec()
            }
        }
    }

    pub fn as_mat4(&self) -> Option<cgmath::Matrix4<f32>> {
        match self {
            UniformValue::Mat4(m) => Some(*m),
            _ => None,
        }
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<cgmath::Vector2<f32>> for UniformValue {
    fn from(v: cgmath::Vector2<f32>) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<cgmath::Vector3<f32>> for UniformValue {
    fn from(v: cgmath::Vector3<f32>) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<cgmath::Vector4<f32>> for UniformValue {
    fn from(v: cgmath::Vector4<f32>) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<cgmath::Matrix3<f32>> for UniformValue {
    fn from(m: cgmath::Matrix3<f32>) -> Self {
        UniformValue::Mat3(m)
    }
}

impl From<cgmath::Matrix4<f32>> for UniformValue {
    fn from(m: cgmath::Matrix4<f32>) -> Self {
        UniformValue::Mat4(m)
    }
}
