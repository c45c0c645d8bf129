//! The active set of drawables for a frame loop.
//!
//! Each frame the owner calls, in this order:
//! 1. `update(dt)` to advance animations and prune finished roots
//! 2. `set_view(vp)` (or `set_camera`) when the camera moved
//! 3. `draw()`
//!
//! Only roots can be pruned; children live as long as their parent.

use instant::Duration;
use log::debug;

use crate::{
    camera::{Camera, Projection},
    data_structures::drawable::Drawable,
};

#[derive(Default)]
pub struct Stage {
    roots: Vec<Box<dyn Drawable>>,
    view_project: Option<cgmath::Matrix4<f32>>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a root drawable. It receives the last view-project set on the stage, if any.
    pub fn push(&mut self, drawable: impl Drawable + 'static) -> &mut Self {
        self.push_boxed(Box::new(drawable))
    }

    pub fn push_boxed(&mut self, mut drawable: Box<dyn Drawable>) -> &mut Self {
        if let Some(view_project) = self.view_project {
            visit_mut(drawable.as_mut(), &mut |d: &mut dyn Drawable| d.update_view(view_project));
        }
        self.roots.push(drawable);
        self
    }

    /**
     * Advances time on every node and drops roots whose `update_time`
     * returned `false`.
     *
     * Returns the number of pruned roots.
     */
    pub fn update(&mut self, delta: Duration) -> usize {
        let before = self.roots.len();
        self.roots.retain_mut(|root| {
            let keep = root.update_time(delta);
            for child in root.node_mut().children_mut() {
                visit_mut(child.as_mut(), &mut |d: &mut dyn Drawable| {
                    d.update_time(delta);
                });
            }
            if !keep {
                root.dispose();
            }
            keep
        });
        let pruned = before - self.roots.len();
        if pruned > 0 {
            debug!("Pruned {} finished drawables", pruned);
        }
        pruned
    }

    /// Hands `view_project` to every node of every tree, depth-first.
    pub fn set_view(&mut self, view_project: cgmath::Matrix4<f32>) {
        self.view_project = Some(view_project);
        for root in self.roots.iter_mut() {
            visit_mut(root.as_mut(), &mut |d: &mut dyn Drawable| d.update_view(view_project));
        }
    }

    pub fn set_camera(&mut self, camera: &Camera, projection: &Projection) {
        self.set_view(camera.view_project(projection));
    }

    /// Draws every node of every tree, parents before children.
    pub fn draw(&self) {
        for root in self.roots.iter() {
            visit(root.as_ref(), &mut |d: &dyn Drawable| d.draw());
        }
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn roots(&self) -> &[Box<dyn Drawable>] {
        &self.roots
    }

    pub fn roots_mut(&mut self) -> &mut [Box<dyn Drawable>] {
        &mut self.roots
    }
}

fn visit(drawable: &dyn Drawable, f: &mut dyn FnMut(&dyn Drawable)) {
    f(drawable);
    for child in drawable.node().children() {
        visit(child.as_ref(), f);
    }
}

fn visit_mut(drawable: &mut dyn Drawable, f: &mut dyn FnMut(&mut dyn Drawable)) {
    f(drawable);
    for child in drawable.node_mut().children_mut() {
        visit_mut(child.as_mut(), f);
    }
}
