//! Contracts of the collaborators a drawable consumes.
//!
//! Asset loading, GPU meshes and programs and the animation system all live
//! outside of this crate. A drawable only sees them through the traits below.

use std::{collections::HashMap, future::Future, pin::Pin, rc::Rc};

use instant::Duration;

use crate::data_structures::{drawable::DrawMode, drawable::Node, uniform::UniformValue};

pub mod geometry;

/// Future returned by an [`AssetProvider`]. Single threaded, hence not `Send`.
pub type LoadFuture<'a, T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + 'a>>;

/// Vertex attribute name to shader location, as exposed by a program.
pub type AttributeLocations = HashMap<String, u32>;

/// A GPU mesh. Knows how to bind its buffers and issue the draw.
pub trait Mesh {
    fn draw(&self, locations: &AttributeLocations, mode: DrawMode);
}

/// A GPU program with a set of named uniform setters.
pub trait Program {
    /**
     * Binds the program and hands it to `draw`.
     *
     * The callback sets uniforms and draws the mesh while the program is bound.
     */
    fn use_program(&self, draw: &mut dyn FnMut(&dyn Program));

    /// Whether the program exposes a setter for `name`.
    fn has_uniform(&self, name: &str) -> bool;

    /// Invokes the setter for `name`. Callers check `has_uniform` first.
    fn set_uniform(&self, name: &str, value: &UniformValue);

    fn attribute_locations(&self) -> &AttributeLocations;
}

/// Resolves names to meshes and programs. Both loads may fail.
pub trait AssetProvider {
    fn load_mesh<'a>(&'a self, name: &'a str) -> LoadFuture<'a, Rc<dyn Mesh>>;

    fn load_program<'a>(&'a self, name: &'a str) -> LoadFuture<'a, Rc<dyn Program>>;

    /// Turns procedurally built geometry into a mesh.
    fn upload_mesh<'a>(&'a self, geometry: geometry::Geometry) -> LoadFuture<'a, Rc<dyn Mesh>>;
}

/// Drives animations of a node by mutating it through its transform mutators.
pub trait Animator {
    fn run_animations(&mut self, delta: Duration, target: &mut Node);
}
