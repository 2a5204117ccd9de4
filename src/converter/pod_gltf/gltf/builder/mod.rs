//! glTF 2.0 document builder.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Append-only: the binary buffer only grows, every `add_*` returns the new
//! entry's index (its previous array length), and nothing is ever removed
//! or reordered, so indices handed out earlier stay valid.

mod animation;
mod export;
mod material_methods;
mod mesh;

use crate::error::{Error, Result};

use super::materials::{GltfImage, GltfMaterial, GltfSampler, GltfTexture};
use super::types::{
    GltfAccessor, GltfAnimation, GltfAnimationSampler, GltfAnimationChannel, GltfBufferView,
    GltfChannelTarget, GltfMesh, GltfNode, GltfSkin, AnimationPath,
};

pub use animation::KEYFRAME_TIME_STEP;
pub(crate) use material_methods::shininess_to_roughness;

/// Builder for constructing glTF documents.
pub struct GltfBuilder {
    pub(crate) buffer: Vec<u8>,
    pub(crate) buffer_views: Vec<GltfBufferView>,
    pub(crate) accessors: Vec<GltfAccessor>,
    pub(crate) meshes: Vec<GltfMesh>,
    pub(crate) nodes: Vec<GltfNode>,
    pub(crate) skins: Vec<GltfSkin>,
    pub(crate) images: Vec<GltfImage>,
    pub(crate) textures: Vec<GltfTexture>,
    pub(crate) samplers: Vec<GltfSampler>,
    pub(crate) materials: Vec<GltfMaterial>,
    pub(crate) scene_nodes: Vec<usize>,
    pub(crate) animation: GltfAnimation,
}

impl GltfBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            buffer_views: Vec::new(),
            accessors: Vec::new(),
            meshes: Vec::new(),
            nodes: Vec::new(),
            skins: Vec::new(),
            images: Vec::new(),
            textures: Vec::new(),
            samplers: Vec::new(),
            materials: Vec::new(),
            scene_nodes: Vec::new(),
            animation: GltfAnimation::default(),
        }
    }

    pub(crate) fn align(&mut self, alignment: usize) {
        let padding = (alignment - (self.buffer.len() % alignment)) % alignment;
        self.buffer.extend(std::iter::repeat_n(0u8, padding));
    }

    /// Append bytes to the binary buffer, returning their start offset.
    ///
    /// The buffer is padded to a 4-byte boundary first, so the returned
    /// offset is always aligned. No trailing padding is added here; the
    /// final chunk padding happens at export.
    pub fn append_binary(&mut self, bytes: &[u8]) -> usize {
        self.align(4);
        let offset = self.buffer.len();
        self.buffer.extend_from_slice(bytes);
        offset
    }

    pub fn add_buffer_view(&mut self, view: GltfBufferView) -> usize {
        self.buffer_views.push(view);
        self.buffer_views.len() - 1
    }

    pub fn add_accessor(&mut self, accessor: GltfAccessor) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    pub fn add_mesh(&mut self, mesh: GltfMesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn add_node(&mut self, node: GltfNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn add_skin(&mut self, skin: GltfSkin) -> usize {
        self.skins.push(skin);
        self.skins.len() - 1
    }

    /// Register a node index as a scene root.
    pub fn add_root_node(&mut self, index: usize) {
        self.scene_nodes.push(index);
    }

    /// Assign a material to a mesh's sole primitive.
    ///
    /// The material index may be issued later than the mesh (materials are
    /// translated after nodes); it is validated against the materials array
    /// at export, not here.
    ///
    /// # Errors
    /// Returns an error if the mesh index is out of range.
    pub fn set_mesh_material(&mut self, mesh_index: usize, material_index: usize) -> Result<()> {
        let len = self.meshes.len();
        let mesh = self
            .meshes
            .get_mut(mesh_index)
            .ok_or(Error::GraphIndexOutOfRange {
                array: "meshes",
                index: mesh_index,
                len,
            })?;
        for primitive in &mut mesh.primitives {
            primitive.material = Some(material_index);
        }
        Ok(())
    }

    /// Append an animation sampler and its channel.
    ///
    /// The channel's sampler index is the sampler's position in the sampler
    /// list at the moment of insertion; the two lists advance in lockstep.
    pub fn add_animation(
        &mut self,
        sampler: GltfAnimationSampler,
        node_index: usize,
        path: AnimationPath,
    ) -> usize {
        let sampler_index = self.animation.samplers.len();
        self.animation.samplers.push(sampler);
        self.animation.channels.push(GltfAnimationChannel {
            sampler: sampler_index,
            target: GltfChannelTarget {
                node: node_index,
                path: path.as_str().to_string(),
            },
        });
        sampler_index
    }
}

impl Default for GltfBuilder {
    fn default() -> Self {
        Self::new()
    }
}
