use std::{
    cell::RefCell,
    collections::HashSet,
    rc::Rc,
};

use cgmath::AbsDiffEq;
use flow_drawable::{
    DrawMode, UniformValue,
    resources::{
        AssetProvider, AttributeLocations, LoadFuture, Mesh, Program,
        geometry::Geometry,
    },
};

pub(crate) const EPSILON: f32 = 1e-5;

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn mat_eq(a: cgmath::Matrix4<f32>, b: cgmath::Matrix4<f32>) -> bool {
    a.abs_diff_eq(&b, EPSILON)
}

pub(crate) fn assert_mat_eq(a: cgmath::Matrix4<f32>, b: cgmath::Matrix4<f32>) {
    assert!(mat_eq(a, b), "matrices differ:\n{:?}\n{:?}", a, b);
}

pub(crate) fn assert_vec_eq(a: cgmath::Vector3<f32>, b: cgmath::Vector3<f32>) {
    assert!(a.abs_diff_eq(&b, EPSILON), "vectors differ: {:?} vs {:?}", a, b);
}

/// Everything the collaborators were asked to do.
#[derive(Default, Debug)]
pub(crate) struct Calls {
    pub mesh_loads: Vec<String>,
    pub program_loads: Vec<String>,
    pub uploads: Vec<(usize, usize)>,
    pub program_uses: u32,
    pub uniforms_set: Vec<(String, UniformValue)>,
    pub mesh_draws: Vec<DrawMode>,
}

#[derive(Clone, Default)]
pub(crate) struct Recorder(pub Rc<RefCell<Calls>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh_draws(&self) -> Vec<DrawMode> {
        self.0.borrow().mesh_draws.clone()
    }

    pub fn program_uses(&self) -> u32 {
        self.0.borrow().program_uses
    }

    pub fn uniform_names(&self) -> Vec<String> {
        self.0
            .borrow()
            .uniforms_set
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.0
            .borrow()
            .uniforms_set
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn mesh_loads(&self) -> Vec<String> {
        self.0.borrow().mesh_loads.clone()
    }

    pub fn program_loads(&self) -> Vec<String> {
        self.0.borrow().program_loads.clone()
    }

    pub fn uploads(&self) -> Vec<(usize, usize)> {
        self.0.borrow().uploads.clone()
    }

    pub fn total_interactions(&self) -> usize {
        let calls = self.0.borrow();
        calls.program_uses as usize + calls.uniforms_set.len() + calls.mesh_draws.len()
    }
}

pub(crate) struct MockMesh {
    recorder: Recorder,
}

impl MockMesh {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
        }
    }
}

impl Mesh for MockMesh {
    fn draw(&self, _: &AttributeLocations, mode: DrawMode) {
        self.recorder.0.borrow_mut().mesh_draws.push(mode);
    }
}

pub(crate) struct MockProgram {
    recorder: Recorder,
    uniforms: HashSet<String>,
    locations: AttributeLocations,
}

impl MockProgram {
    pub fn new(recorder: &Recorder, uniforms: &HashSet<String>) -> Self {
        Self {
            recorder: recorder.clone(),
            uniforms: uniforms.clone(),
            locations: [("position".to_string(), 0), ("normal".to_string(), 1)]
                .into_iter()
                .collect(),
        }
    }
}

impl Program for MockProgram {
    fn use_program(&self, draw: &mut dyn FnMut(&dyn Program)) {
        self.recorder.0.borrow_mut().program_uses += 1;
        draw(self);
    }

    fn has_uniform(&self, name: &str) -> bool {
        self.uniforms.contains(name)
    }

    fn set_uniform(&self, name: &str, value: &UniformValue) {
        self.recorder
            .0
            .borrow_mut()
            .uniforms_set
            .push((name.to_string(), *value));
    }

    fn attribute_locations(&self) -> &AttributeLocations {
        &self.locations
    }
}

/// Resolves every name except the ones marked missing.
pub(crate) struct MockProvider {
    pub recorder: Recorder,
    missing: HashSet<String>,
    uniforms: HashSet<String>,
}

impl MockProvider {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
            missing: HashSet::new(),
            uniforms: [flow_drawable::data_structures::uniform::MODEL_VIEW_PROJECT]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn missing(mut self, name: &str) -> Self {
        self.missing.insert(name.to_string());
        self
    }

    pub fn with_uniform(mut self, name: &str) -> Self {
        self.uniforms.insert(name.to_string());
        self
    }
}

impl AssetProvider for MockProvider {
    fn load_mesh<'a>(&'a self, name: &'a str) -> LoadFuture<'a, Rc<dyn Mesh>> {
        Box::pin(async move {
            self.recorder.0.borrow_mut().mesh_loads.push(name.to_string());
            if self.missing.contains(name) {
                return Err(anyhow::anyhow!("no mesh named '{}'", name));
            }
            let mesh: Rc<dyn Mesh> = Rc::new(MockMesh::new(&self.recorder));
            Ok(mesh)
        })
    }

    fn load_program<'a>(&'a self, name: &'a str) -> LoadFuture<'a, Rc<dyn Program>> {
        Box::pin(async move {
            self.recorder
                .0
                .borrow_mut()
                .program_loads
                .push(name.to_string());
            if self.missing.contains(name) {
                return Err(anyhow::anyhow!("no program named '{}'", name));
            }
            let program: Rc<dyn Program> =
                Rc::new(MockProgram::new(&self.recorder, &self.uniforms));
            Ok(program)
        })
    }

    fn upload_mesh<'a>(&'a self, geometry: Geometry) -> LoadFuture<'a, Rc<dyn Mesh>> {
        Box::pin(async move {
            self.recorder
                .0
                .borrow_mut()
                .uploads
                .push((geometry.vertices.len(), geometry.indices.len()));
            if self.missing.contains("upload") {
                return Err(anyhow::anyhow!("upload rejected"));
            }
            let mesh: Rc<dyn Mesh> = Rc::new(MockMesh::new(&self.recorder));
            Ok(mesh)
        })
    }
}
