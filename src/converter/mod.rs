//! Format converters

pub mod pod_gltf;

pub use pod_gltf::{
    convert_scene_to_glb, convert_scene_to_glb_with_overrides, convert_scene_to_glb_with_progress,
    export_scene_to_glb, export_scene_to_gltf,
};
