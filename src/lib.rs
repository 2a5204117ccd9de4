//! # MacPVR
//!
//! A pure-Rust library for working with PowerVR asset formats.
//!
//! ## Supported Formats
//!
//! - **POD scenes** - decoded mesh/node/material scenes translated to glTF 2.0
//! - **GLB** - glTF binary container export (and separate .gltf/.bin)
//! - **PVR textures** - container headers (three generations), metadata, and
//!   per-mipmap byte ranges for block-compressed pixel formats
//!
//! Compressed pixel data is never decoded here; that is the external
//! transcoder's job. This library computes where everything lives and emits
//! byte-exact containers.
//!
//! ## Quick Start
//!
//! ### Inspecting a PVR texture
//!
//! ```no_run
//! use macpvr::formats::pvr::PvrTexture;
//!
//! let texture = PvrTexture::from_file("albedo.pvr")?;
//! println!("{}x{}", texture.header.width, texture.header.height);
//! for mip in texture.mipmaps()? {
//!     println!("level {}: {} bytes at {}", mip.level, mip.length, mip.offset);
//! }
//! # Ok::<(), macpvr::Error>(())
//! ```
//!
//! ### Converting a scene to GLB
//!
//! ```
//! use macpvr::converter::convert_scene_to_glb;
//! use macpvr::formats::pod::PodScene;
//!
//! let scene = PodScene::default();
//! let glb = convert_scene_to_glb(&scene)?;
//! assert_eq!(&glb[0..4], b"glTF");
//! # Ok::<(), macpvr::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `macpvr` command-line binary

pub mod converter;
pub mod error;
pub mod formats;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::pod::{
        IndexType, PodMaterial, PodMesh, PodNode, PodScene, PodTexture, VertexDataType,
        VertexElement,
    };
    pub use crate::formats::pvr::{
        MipmapRange, PixelFormat, PvrHeader, PvrTexture, find_pvr_files, parse_batch,
    };

    pub use crate::converter::{
        convert_scene_to_glb, convert_scene_to_glb_with_overrides,
        convert_scene_to_glb_with_progress, export_scene_to_glb, export_scene_to_gltf,
    };
    pub use crate::converter::pod_gltf::gltf::GltfBuilder;
    pub use crate::converter::pod_gltf::{MaterialOverrides, find_sidecar};
}
