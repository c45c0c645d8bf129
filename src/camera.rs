//! Camera and projection producing the view-project matrix fed to
//! [`Drawable::update_view`](crate::data_structures::drawable::Drawable::update_view).

use cgmath::{InnerSpace, Rad};

/// cgmath builds OpenGL clip space (z in -1..1), wgpu expects z in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: cgmath::Point3<f32>,
    pub target: cgmath::Point3<f32>,
    pub up: cgmath::Vector3<f32>,
}

impl Camera {
    pub fn new(eye: cgmath::Point3<f32>, target: cgmath::Point3<f32>) -> Self {
        Self {
            eye,
            target,
            up: cgmath::Vector3::unit_y(),
        }
    }

    pub fn view_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn forward(&self) -> cgmath::Vector3<f32> {
        (self.target - self.eye).normalize()
    }

    /// `projection * view`, corrected for wgpu's depth range.
    pub fn view_project(&self, projection: &Projection) -> cgmath::Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * projection.calc_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(cgmath::Point3::new(0.0, 0.0, 5.0), cgmath::Point3::new(0.0, 0.0, 0.0))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}
