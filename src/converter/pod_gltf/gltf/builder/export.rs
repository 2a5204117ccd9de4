//! Export methods for `GltfBuilder`

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

use super::super::types::{GltfAsset, GltfBuffer, GltfDocument, GltfScene};
use super::GltfBuilder;

impl GltfBuilder {
    /// Check every cross-reference before emission: a dangling index means
    /// a corrupt document that consumers would reject (or worse, misread).
    fn validate(&self) -> Result<()> {
        fn check(array: &'static str, index: usize, len: usize) -> Result<()> {
            if index < len {
                Ok(())
            } else {
                Err(Error::GraphIndexOutOfRange { array, index, len })
            }
        }

        for view in &self.buffer_views {
            let end = view.byte_offset + view.byte_length;
            if end > self.buffer.len() {
                return Err(Error::GraphIndexOutOfRange {
                    array: "buffer",
                    index: end,
                    len: self.buffer.len(),
                });
            }
        }
        for accessor in &self.accessors {
            check("bufferViews", accessor.buffer_view, self.buffer_views.len())?;
        }
        for image in &self.images {
            if let Some(view) = image.buffer_view {
                check("bufferViews", view, self.buffer_views.len())?;
            }
        }
        for texture in &self.textures {
            check("images", texture.source, self.images.len())?;
            if let Some(sampler) = texture.sampler {
                check("samplers", sampler, self.samplers.len())?;
            }
        }
        for mesh in &self.meshes {
            for primitive in &mesh.primitives {
                for &accessor in primitive.attributes.values() {
                    check("accessors", accessor, self.accessors.len())?;
                }
                if let Some(indices) = primitive.indices {
                    check("accessors", indices, self.accessors.len())?;
                }
                if let Some(material) = primitive.material {
                    check("materials", material, self.materials.len())?;
                }
            }
        }
        for node in &self.nodes {
            if let Some(mesh) = node.mesh {
                check("meshes", mesh, self.meshes.len())?;
            }
            if let Some(skin) = node.skin {
                check("skins", skin, self.skins.len())?;
            }
            for &child in &node.children {
                check("nodes", child, self.nodes.len())?;
            }
        }
        for &root in &self.scene_nodes {
            check("nodes", root, self.nodes.len())?;
        }
        for sampler in &self.animation.samplers {
            check("accessors", sampler.input, self.accessors.len())?;
            check("accessors", sampler.output, self.accessors.len())?;
        }
        for channel in &self.animation.channels {
            check("animation samplers", channel.sampler, self.animation.samplers.len())?;
            check("nodes", channel.target.node, self.nodes.len())?;
        }
        Ok(())
    }

    fn build_document(self, buffer_uri: Option<String>) -> (GltfDocument, Vec<u8>) {
        let animations = if self.animation.channels.is_empty() {
            Vec::new()
        } else {
            vec![self.animation]
        };

        let doc = GltfDocument {
            asset: GltfAsset {
                version: "2.0".to_string(),
                generator: Some("MacPVR POD to glTF converter".to_string()),
            },
            scene: 0,
            scenes: vec![GltfScene {
                name: Some("Scene".to_string()),
                nodes: self.scene_nodes,
            }],
            nodes: self.nodes,
            meshes: self.meshes,
            skins: self.skins,
            materials: self.materials,
            textures: self.textures,
            images: self.images,
            samplers: self.samplers,
            animations,
            accessors: self.accessors,
            buffer_views: self.buffer_views,
            buffers: vec![GltfBuffer {
                // must equal the blob exactly; chunk padding is separate
                byte_length: self.buffer.len(),
                uri: buffer_uri,
            }],
        };

        (doc, self.buffer)
    }

    /// Build GLB data and return as bytes.
    ///
    /// # Errors
    /// Returns an error if an index reference is dangling or JSON
    /// serialization fails.
    pub fn build_glb(self) -> Result<Vec<u8>> {
        self.validate()?;
        let (doc, buffer) = self.build_document(None);
        let json = serde_json::to_string(&doc).map_err(|e| Error::GltfSerializationFailed {
            message: e.to_string(),
        })?;
        let json_bytes = json.as_bytes();

        let json_padding = (4 - (json_bytes.len() % 4)) % 4;
        let json_chunk_len = json_bytes.len() + json_padding;

        let bin_padding = (4 - (buffer.len() % 4)) % 4;
        let bin_chunk_len = buffer.len() + bin_padding;

        let total_len = 12 + 8 + json_chunk_len + 8 + bin_chunk_len;

        let mut output = Vec::with_capacity(total_len);

        // GLB header
        output.extend_from_slice(b"glTF");
        output.extend_from_slice(&2u32.to_le_bytes());
        output.extend_from_slice(&(total_len as u32).to_le_bytes());

        // JSON chunk, space-padded
        output.extend_from_slice(&(json_chunk_len as u32).to_le_bytes());
        output.extend_from_slice(&0x4E4F534Au32.to_le_bytes()); // "JSON"
        output.extend_from_slice(json_bytes);
        for _ in 0..json_padding {
            output.push(b' ');
        }

        // Binary chunk, zero-padded
        output.extend_from_slice(&(bin_chunk_len as u32).to_le_bytes());
        output.extend_from_slice(&0x004E4942u32.to_le_bytes()); // "BIN\0"
        output.extend_from_slice(&buffer);
        for _ in 0..bin_padding {
            output.push(0u8);
        }

        Ok(output)
    }

    /// Export as a GLB file.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn export_glb(self, path: &Path) -> Result<()> {
        let glb_data = self.build_glb()?;
        let mut file = File::create(path)?;
        file.write_all(&glb_data)?;
        Ok(())
    }

    /// Export as separate .gltf (JSON) and .bin (binary buffer) files.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn export_gltf(self, path: &Path) -> Result<()> {
        self.validate()?;

        let bin_filename = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| format!("{s}.bin"))
            .ok_or_else(|| Error::GltfSerializationFailed {
                message: "invalid output path".to_string(),
            })?;

        let bin_path = path.with_file_name(&bin_filename);

        let (doc, buffer) = self.build_document(Some(bin_filename));

        let json =
            serde_json::to_string_pretty(&doc).map_err(|e| Error::GltfSerializationFailed {
                message: e.to_string(),
            })?;
        let mut gltf_file = File::create(path)?;
        gltf_file.write_all(json.as_bytes())?;

        let mut bin_file = File::create(&bin_path)?;
        bin_file.write_all(&buffer)?;

        Ok(())
    }
}
