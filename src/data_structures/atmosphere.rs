//! Atmosphere shell: a procedurally built sphere drawn around a planet.
//!
//! It builds its own mesh instead of looking one up by name, and on every
//! view update it derives a normal matrix from the camera's view-project
//! matrix, after the regular matrix and ray recomputation.

use std::ops::{Deref, DerefMut};

use cgmath::{Matrix, SquareMatrix};
use log::warn;

use crate::{
    data_structures::{
        drawable::{Drawable, DrawableDescriptor, Node},
        uniform::NORMAL_MATRIX,
    },
    error::{DrawableError, ResourceKind},
    resources::{AssetProvider, LoadFuture, geometry},
};

#[derive(Clone, Debug)]
pub struct AtmosphereDescriptor<'a> {
    pub label: Option<&'a str>,
    pub program: Option<&'a str>,
    pub radius: f32,
    pub segments: u32,
    pub rings: u32,
}

impl Default for AtmosphereDescriptor<'_> {
    fn default() -> Self {
        Self {
            label: Some("atmosphere"),
            program: Some("atmosphere"),
            radius: 1.025,
            segments: 64,
            rings: 32,
        }
    }
}

pub struct Atmosphere {
    node: Node,
    radius: f32,
    segments: u32,
    rings: u32,
}

impl Atmosphere {
    pub fn new(desc: &AtmosphereDescriptor) -> Self {
        let mut node = Node::new(&DrawableDescriptor {
            label: desc.label,
            program: desc.program,
            mesh: None,
            ..Default::default()
        });
        node.set_uniform(NORMAL_MATRIX, cgmath::Matrix4::<f32>::identity());
        Self {
            node,
            radius: desc.radius,
            segments: desc.segments,
            rings: desc.rings,
        }
    }

    /// Uploads the shell mesh, then lets the node load its program and become ready.
    pub async fn init(&mut self, provider: &dyn AssetProvider) -> anyhow::Result<&mut Self> {
        self.node.reset_ready();
        let shell = geometry::uv_sphere(self.radius, self.segments, self.rings);
        let mesh = provider.upload_mesh(shell).await.map_err(|source| {
            warn!("Could not upload the atmosphere shell: {:#}", source);
            DrawableError::ResourceLoad {
                kind: ResourceKind::Mesh,
                name: format!("uv_sphere({}, {}, {})", self.radius, self.segments, self.rings),
                source,
            }
        })?;
        self.node.set_mesh(mesh);
        self.node.init(provider).await?;
        Ok(self)
    }

    /**
     * Runs the node's view update, then refreshes the normal matrix.
     *
     * The normal matrix is the inverse transpose of the view-project matrix
     * itself, not of the model or model-view matrix. A singular view-project
     * keeps the previous normal matrix.
     */
    pub fn update_view(&mut self, view_project: cgmath::Matrix4<f32>) -> &mut Self {
        self.node.update_view(view_project);
        match view_project.invert() {
            Some(inverse) => {
                self.node.set_uniform(NORMAL_MATRIX, inverse.transpose());
            }
            None => warn!("{}: view-project is singular, keeping the normal matrix", self.node),
        }
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self::new(&AtmosphereDescriptor::default())
    }
}

impl Deref for Atmosphere {
    type Target = Node;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

impl DerefMut for Atmosphere {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.node
    }
}

impl Drawable for Atmosphere {
    fn node(&self) -> &Node {
        &self.node
    }

    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    fn init<'a>(&'a mut self, provider: &'a dyn AssetProvider) -> LoadFuture<'a, ()>
    where
        Self: 'a,
    {
        Box::pin(async move { Atmosphere::init(self, provider).await.map(|_| ()) })
    }

    fn update_view(&mut self, view_project: cgmath::Matrix4<f32>) {
        Atmosphere::update_view(self, view_project);
    }
}
