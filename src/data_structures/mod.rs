//! Engine data structures: transforms, matrices and drawable nodes.
//!
//! - `transform` holds translation, rotation and scale of a node
//! - `pipeline` derives local, model and model-view-project matrices and the camera ray
//! - `uniform` contains the values a node hands to its program
//! - `drawable` contains the scene-graph node and the `Drawable` trait
//! - `atmosphere` is a specialized drawable with a procedural shell mesh

pub mod atmosphere;
pub mod drawable;
pub mod pipeline;
pub mod transform;
pub mod uniform;
