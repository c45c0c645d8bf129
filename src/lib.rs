//! flow-drawable
//!
//! A hierarchical scene-graph node ("drawable") for the flow engine family. A
//! drawable owns a local transform, composes it with the world matrix handed
//! down by its parent and the camera's view-project matrix, and issues a draw
//! call against a program/mesh pair once both have been loaded.
//!
//! High-level modules
//! - `camera`: camera and projection producing the view-project matrix
//! - `data_structures`: transforms, the matrix pipeline, drawable nodes and the atmosphere shell
//! - `error`: error types raised while loading or configuring drawables
//! - `resources`: collaborator contracts (asset provider, mesh, program, animator) and procedural geometry
//! - `stage`: the active set of drawables driven once per frame
//!

pub mod camera;
pub mod data_structures;
pub mod error;
pub mod resources;
pub mod stage;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use data_structures::{
    atmosphere::{Atmosphere, AtmosphereDescriptor},
    drawable::{DrawMode, Drawable, DrawableDescriptor, Node},
    uniform::UniformValue,
};
pub use instant::Duration;
