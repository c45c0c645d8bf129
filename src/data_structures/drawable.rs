//! Drawable scene-graph nodes.
//!
//! A [`Node`] owns its local transform, the matrices derived from it, a
//! uniform table and its children. Every mutator recomputes the matrix
//! pipeline before returning and pushes the new model matrix down to the
//! children, depth-first. There is no dirty flag: what you read is what the
//! next draw call uses.
//!
//! [`Drawable`] is the seam for specializations. A type wraps a `Node`,
//! exposes it through `node`/`node_mut` and overrides the hooks it needs
//! (see [`crate::data_structures::atmosphere`]).

use std::{fmt, rc::Rc, str::FromStr};

use cgmath::{SquareMatrix, Zero};
use instant::Duration;
use log::{debug, trace, warn};

use crate::{
    data_structures::{
        pipeline::{Matrices, camera_ray},
        transform::Transform,
        uniform::{MODEL_VIEW_PROJECT, UniformValue, Uniforms},
    },
    error::{DrawableError, ResourceKind},
    resources::{Animator, AssetProvider, LoadFuture, Mesh, Program},
};

/// Primitive assembly used when the mesh is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DrawMode {
    #[default]
    Triangles,
    Lines,
}

impl DrawMode {
    /// GL enum value of `LINES`.
    pub const LINES: u32 = 0x0001;
    /// GL enum value of `TRIANGLES`.
    pub const TRIANGLES: u32 = 0x0004;

    pub fn raw(self) -> u32 {
        match self {
            DrawMode::Triangles => Self::TRIANGLES,
            DrawMode::Lines => Self::LINES,
        }
    }
}

impl TryFrom<u32> for DrawMode {
    type Error = DrawableError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            Self::TRIANGLES => Ok(DrawMode::Triangles),
            Self::LINES => Ok(DrawMode::Lines),
            other => Err(DrawableError::InvalidDrawMode(other)),
        }
    }
}

impl FromStr for DrawMode {
    type Err = DrawableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "triangles" | "faces" => Ok(DrawMode::Triangles),
            "lines" => Ok(DrawMode::Lines),
            _ => Err(DrawableError::UnknownDrawMode(s.to_string())),
        }
    }
}

impl From<DrawMode> for wgpu::PrimitiveTopology {
    fn from(mode: DrawMode) -> Self {
        match mode {
            DrawMode::Triangles => wgpu::PrimitiveTopology::TriangleList,
            DrawMode::Lines => wgpu::PrimitiveTopology::LineList,
        }
    }
}

/// Construction parameters of a [`Node`].
///
/// Either name may be absent; a node with neither is ready as soon as it is
/// initialised.
#[derive(Clone, Debug, Default)]
pub struct DrawableDescriptor<'a> {
    pub label: Option<&'a str>,
    pub program: Option<&'a str>,
    pub mesh: Option<&'a str>,
    pub draw_mode: DrawMode,
}

/// Anything that can live in the scene graph.
///
/// Default implementations forward to the wrapped [`Node`]. Overrides of
/// `update_view` must still run the node's own view update so the matrices
/// and the ray stay current.
pub trait Drawable {
    fn node(&self) -> &Node;

    fn node_mut(&mut self) -> &mut Node;

    /// Resolves the resources of this drawable and flips it to ready.
    fn init<'a>(&'a mut self, provider: &'a dyn AssetProvider) -> LoadFuture<'a, ()>
    where
        Self: 'a,
    {
        Box::pin(async move { self.node_mut().init(provider).await.map(|_| ()) })
    }

    /// Called by the parent whenever its model matrix changes.
    fn update_world(&mut self, world: cgmath::Matrix4<f32>) {
        self.node_mut().update_world(world);
    }

    /// Called by the camera once per frame.
    fn update_view(&mut self, view_project: cgmath::Matrix4<f32>) {
        self.node_mut().update_view(view_project);
    }

    fn update_time(&mut self, delta: Duration) -> bool {
        self.node_mut().update_time(delta)
    }

    fn draw(&self) {
        self.node().draw();
    }

    fn dispose(&mut self) {
        self.node_mut().dispose();
    }
}

pub struct Node {
    label: Option<String>,
    program_name: Option<String>,
    mesh_name: Option<String>,
    mesh: Option<Rc<dyn Mesh>>,
    program: Option<Rc<dyn Program>>,
    transform: Transform,
    world: cgmath::Matrix4<f32>,
    view_project: cgmath::Matrix4<f32>,
    matrices: Matrices,
    ray: cgmath::Vector3<f32>,
    uniforms: Uniforms,
    draw_mode: DrawMode,
    children: Vec<Box<dyn Drawable>>,
    animator: Option<Box<dyn Animator>>,
    ready: bool,
    elapsed: Duration,
}

impl Node {
    pub fn new(desc: &DrawableDescriptor) -> Self {
        let mut node = Self {
            label: desc.label.map(str::to_string),
            program_name: desc.program.map(str::to_string),
            mesh_name: desc.mesh.map(str::to_string),
            mesh: None,
            program: None,
            transform: Transform::new(),
            world: cgmath::Matrix4::identity(),
            view_project: cgmath::Matrix4::identity(),
            matrices: Matrices::identity(),
            ray: cgmath::Vector3::zero(),
            uniforms: Uniforms::new(),
            draw_mode: desc.draw_mode,
            children: Vec::new(),
            animator: None,
            ready: false,
            elapsed: Duration::ZERO,
        };
        node.update_matrix();
        node.update_ray();
        node
    }

    /// Shorthand for a node that only names its program and mesh.
    pub fn with_names(program: Option<&str>, mesh: Option<&str>) -> Self {
        Self::new(&DrawableDescriptor {
            program,
            mesh,
            ..Default::default()
        })
    }

    /**
     * Fetches the named mesh and program concurrently.
     *
     * Both fetches run to completion even if one of them fails, and whatever
     * resolved is stored on the node. The node only becomes ready if every
     * issued fetch succeeded; otherwise the first failure (mesh before program)
     * is returned and the node stays not ready. Names that were never given
     * issue no fetch at all.
     */
    pub async fn init(&mut self, provider: &dyn AssetProvider) -> anyhow::Result<&mut Self> {
        self.reset_ready();
        let mesh_name = self.mesh_name.clone();
        let program_name = self.program_name.clone();

        let mesh_fetch = async {
            match mesh_name.as_deref() {
                Some(name) => Some(fetch(ResourceKind::Mesh, name, provider.load_mesh(name)).await),
                None => None,
            }
        };
        let program_fetch = async {
            match program_name.as_deref() {
                Some(name) => {
                    Some(fetch(ResourceKind::Program, name, provider.load_program(name)).await)
                }
                None => None,
            }
        };
        let (mesh, program) = futures::future::join(mesh_fetch, program_fetch).await;

        let mut failure = None;
        match mesh {
            Some(Ok(mesh)) => self.mesh = Some(mesh),
            Some(Err(e)) => failure = failure.or(Some(e)),
            None => (),
        }
        match program {
            Some(Ok(program)) => self.program = Some(program),
            Some(Err(e)) => failure = failure.or(Some(e)),
            None => (),
        }
        if let Some(e) = failure {
            return Err(e.into());
        }

        self.ready = true;
        debug!("{} is ready", self);
        Ok(self)
    }

    /// Drops the ready flag until the next successful `init`.
    pub(crate) fn reset_ready(&mut self) {
        self.ready = false;
    }

    /// Draws the mesh with the bound program. Does nothing until the node is ready.
    pub fn draw(&self) {
        if !self.ready {
            return;
        }
        if let Some(program) = &self.program {
            program.use_program(&mut |bound: &dyn Program| self.draw_with(bound));
        }
    }

    fn draw_with(&self, program: &dyn Program) {
        for (name, value) in &self.uniforms {
            if program.has_uniform(name) {
                program.set_uniform(name, value);
            } else {
                trace!("{} skips uniform '{}' unknown to its program", self, name);
            }
        }
        if let Some(mesh) = &self.mesh {
            mesh.draw(program.attribute_locations(), self.draw_mode);
        }
    }

    pub fn set_uniform(&mut self, name: impl Into<String>, value: impl Into<UniformValue>) -> &mut Self {
        self.uniforms.insert(name.into(), value.into());
        self
    }

    /**
     * Accumulates elapsed time and lets the animator mutate this node.
     *
     * Always returns `true`: keep the node in the active set. Pruning is left
     * to whoever owns the active set.
     */
    pub fn update_time(&mut self, delta: Duration) -> bool {
        self.elapsed += delta;
        if let Some(mut animator) = self.animator.take() {
            animator.run_animations(delta, self);
            if self.animator.is_none() {
                self.animator = Some(animator);
            }
        }
        true
    }

    /// Attaches `child` and seeds its world matrix with this node's current model matrix.
    pub fn add_child(&mut self, child: impl Drawable + 'static) -> &mut Self {
        self.add_boxed_child(Box::new(child))
    }

    pub fn add_boxed_child(&mut self, mut child: Box<dyn Drawable>) -> &mut Self {
        child.update_world(self.matrices.model);
        debug!("{} adopts {}", self, child.node());
        self.children.push(child);
        self
    }

    /// Recomputes `local`, `model` and the model-view-project uniform, then cascades to the children.
    pub fn update_matrix(&mut self) -> &mut Self {
        self.matrices = Matrices::compose(&self.transform, &self.world, &self.view_project);
        self.uniforms.insert(
            MODEL_VIEW_PROJECT.to_string(),
            self.matrices.model_view_project.into(),
        );
        let model = self.matrices.model;
        if !self.children.is_empty() {
            trace!("{} cascades to {} children", self, self.children.len());
        }
        for child in self.children.iter_mut() {
            child.update_world(model);
        }
        self
    }

    pub fn update_world(&mut self, world: cgmath::Matrix4<f32>) -> &mut Self {
        self.world = world;
        self.update_matrix()
    }

    pub fn update_view(&mut self, view_project: cgmath::Matrix4<f32>) -> &mut Self {
        self.view_project = view_project;
        self.update_matrix();
        self.update_ray()
    }

    pub fn update_ray(&mut self) -> &mut Self {
        self.ray = camera_ray(self.transform.translation, &self.world, &self.view_project);
        self
    }

    pub fn translate(&mut self, delta: cgmath::Vector3<f32>) -> &mut Self {
        self.transform.translate(delta);
        self.update_matrix();
        self.update_ray()
    }

    pub fn translate_x(&mut self, x: f32) -> &mut Self {
        self.translate(cgmath::Vector3::new(x, 0.0, 0.0))
    }

    pub fn translate_y(&mut self, y: f32) -> &mut Self {
        self.translate(cgmath::Vector3::new(0.0, y, 0.0))
    }

    pub fn translate_z(&mut self, z: f32) -> &mut Self {
        self.translate(cgmath::Vector3::new(0.0, 0.0, z))
    }

    pub fn set_translation(&mut self, translation: cgmath::Vector3<f32>) -> &mut Self {
        self.transform.reset_translation();
        self.translate(translation)
    }

    pub fn rotate(&mut self, rotation: cgmath::Quaternion<f32>) -> &mut Self {
        self.transform.rotate(rotation);
        self.update_matrix()
    }

    pub fn set_rotation(&mut self, rotation: cgmath::Quaternion<f32>) -> &mut Self {
        self.transform.reset_rotation();
        self.rotate(rotation)
    }

    pub fn scale(&mut self, factors: cgmath::Vector3<f32>) -> &mut Self {
        self.transform.scale(factors);
        self.update_matrix()
    }

    pub fn set_scale(&mut self, factors: cgmath::Vector3<f32>) -> &mut Self {
        self.transform.reset_scale();
        self.scale(factors)
    }

    pub fn scalar_scale(&mut self, factor: f32) -> &mut Self {
        self.scale(cgmath::Vector3::new(factor, factor, factor))
    }

    pub fn set_scalar_scale(&mut self, factor: f32) -> &mut Self {
        self.set_scale(cgmath::Vector3::new(factor, factor, factor))
    }

    pub fn set_draw_mode(&mut self, mode: DrawMode) -> &mut Self {
        self.draw_mode = mode;
        self
    }

    /// Sets the draw mode from a raw GL enum value. Unknown values leave the mode untouched.
    pub fn set_draw_mode_raw(&mut self, raw: u32) -> Result<&mut Self, DrawableError> {
        let mode = DrawMode::try_from(raw).inspect_err(|e| warn!("{}: {}", self, e))?;
        Ok(self.set_draw_mode(mode))
    }

    pub fn draw_lines(&mut self) -> &mut Self {
        self.set_draw_mode(DrawMode::Lines)
    }

    pub fn draw_faces(&mut self) -> &mut Self {
        self.set_draw_mode(DrawMode::Triangles)
    }

    /// Binds a mesh that was not resolved by name, e.g. one built procedurally.
    pub fn set_mesh(&mut self, mesh: Rc<dyn Mesh>) -> &mut Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn set_program(&mut self, program: Rc<dyn Program>) -> &mut Self {
        self.program = Some(program);
        self
    }

    pub fn set_animator(&mut self, animator: impl Animator + 'static) -> &mut Self {
        self.animator = Some(Box::new(animator));
        self
    }

    /**
     * Releases nothing.
     *
     * Meshes and programs are shared handles owned by the asset provider,
     * which is responsible for freeing the GPU objects behind them.
     */
    pub fn dispose(&mut self) {}

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn mesh_name(&self) -> Option<&str> {
        self.mesh_name.as_deref()
    }

    pub fn program_name(&self) -> Option<&str> {
        self.program_name.as_deref()
    }

    pub fn mesh(&self) -> Option<&Rc<dyn Mesh>> {
        self.mesh.as_ref()
    }

    pub fn program(&self) -> Option<&Rc<dyn Program>> {
        self.program.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn translation(&self) -> cgmath::Vector3<f32> {
        self.transform.translation
    }

    pub fn rotation(&self) -> cgmath::Quaternion<f32> {
        self.transform.rotation
    }

    pub fn scale_factors(&self) -> cgmath::Vector3<f32> {
        self.transform.scale
    }

    pub fn local(&self) -> cgmath::Matrix4<f32> {
        self.matrices.local
    }

    pub fn world(&self) -> cgmath::Matrix4<f32> {
        self.world
    }

    pub fn model(&self) -> cgmath::Matrix4<f32> {
        self.matrices.model
    }

    pub fn view_project(&self) -> cgmath::Matrix4<f32> {
        self.view_project
    }

    pub fn model_view_project(&self) -> cgmath::Matrix4<f32> {
        self.matrices.model_view_project
    }

    pub fn ray(&self) -> cgmath::Vector3<f32> {
        self.ray
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    pub fn children(&self) -> &[Box<dyn Drawable>] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Box<dyn Drawable>] {
        &mut self.children
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new(&DrawableDescriptor::default())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.label, &self.program_name, &self.mesh_name) {
            (Some(label), _, _) => write!(f, "drawable '{}'", label),
            (None, program, mesh) => write!(
                f,
                "drawable ({} / {})",
                program.as_deref().unwrap_or("-"),
                mesh.as_deref().unwrap_or("-")
            ),
        }
    }
}

impl Drawable for Node {
    fn node(&self) -> &Node {
        self
    }

    fn node_mut(&mut self) -> &mut Node {
        self
    }
}

async fn fetch<T>(
    kind: ResourceKind,
    name: &str,
    load: LoadFuture<'_, T>,
) -> Result<T, DrawableError> {
    load.await.map_err(|source| {
        warn!("Could not load {} '{}': {:#}", kind, name, source);
        DrawableError::ResourceLoad {
            kind,
            name: name.to_string(),
            source,
        }
    })
}
