//! glTF 2.0 object model and document builder.

mod builder;
pub mod materials;
pub mod types;

pub use builder::{GltfBuilder, KEYFRAME_TIME_STEP};
pub(crate) use builder::shininess_to_roughness;
