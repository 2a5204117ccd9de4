//! Image, texture, and material methods for `GltfBuilder`

use crate::formats::pod::PodMaterial;

use super::super::materials::{
    GltfImage, GltfMaterial, GltfNormalTextureInfo, GltfOcclusionTextureInfo,
    GltfPbrMetallicRoughness, GltfSampler, GltfTexture, GltfTextureInfo,
};
use super::super::types::GltfBufferView;
use super::GltfBuilder;

/// Blinn-Phong shininess to PBR roughness.
pub(crate) fn shininess_to_roughness(shininess: f32) -> f32 {
    (2.0 / (shininess + 2.0)).sqrt()
}

impl GltfBuilder {
    /// Add an image referenced by URI (the decoded file the external
    /// transcoder produces next to the output).
    /// Returns the image index.
    pub fn add_image_uri(&mut self, uri: impl Into<String>) -> usize {
        self.images.push(GltfImage {
            uri: Some(uri.into()),
            buffer_view: None,
            mime_type: None,
            name: None,
        });
        self.images.len() - 1
    }

    /// Embed already-decoded image bytes in the GLB binary buffer.
    /// Returns the image index.
    pub fn add_embedded_image(
        &mut self,
        data: &[u8],
        mime_type: impl Into<String>,
        name: Option<String>,
    ) -> usize {
        let byte_offset = self.append_binary(data);
        let bv_idx = self.add_buffer_view(GltfBufferView {
            buffer: 0,
            byte_offset,
            byte_length: data.len(),
            byte_stride: None,
            target: None, // no target for images
        });

        self.images.push(GltfImage {
            uri: None,
            buffer_view: Some(bv_idx),
            mime_type: Some(mime_type.into()),
            name,
        });
        self.images.len() - 1
    }

    /// Add a texture sampler with default settings (linear filtering,
    /// repeat wrap). Returns the sampler index.
    pub fn add_sampler(&mut self) -> usize {
        self.samplers.push(GltfSampler::default());
        self.samplers.len() - 1
    }

    /// Add a custom texture sampler.
    /// Returns the sampler index.
    pub fn add_sampler_custom(&mut self, sampler: GltfSampler) -> usize {
        self.samplers.push(sampler);
        self.samplers.len() - 1
    }

    /// Add a texture referencing an image and optionally a sampler.
    /// Returns the texture index.
    pub fn add_texture(
        &mut self,
        image_index: usize,
        sampler_index: Option<usize>,
        name: Option<String>,
    ) -> usize {
        self.textures.push(GltfTexture {
            source: image_index,
            sampler: sampler_index,
            name,
        });
        self.textures.len() - 1
    }

    /// Add a fully assembled material. Returns the material index.
    pub fn add_material(&mut self, material: GltfMaterial) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Map a source Blinn-Phong material to PBR metallic-roughness.
    ///
    /// Base color comes from the diffuse texture when one is referenced,
    /// else the flat diffuse color with alpha forced to 1. Metalness is
    /// always 0: the source format has no such concept. Normal and
    /// occlusion maps attach only for valid (non-negative) indices.
    ///
    /// Returns the material index.
    pub fn add_pod_material(&mut self, material: &PodMaterial) -> usize {
        let mut pbr = GltfPbrMetallicRoughness {
            metallic_factor: Some(0.0),
            roughness_factor: Some(shininess_to_roughness(material.shininess)),
            ..GltfPbrMetallicRoughness::default()
        };
        if material.diffuse_texture_index >= 0 {
            pbr.base_color_texture = Some(GltfTextureInfo {
                index: material.diffuse_texture_index as usize,
                tex_coord: None,
            });
        } else {
            let [r, g, b] = material.diffuse;
            pbr.base_color_factor = Some([r, g, b, 1.0]);
        }

        self.add_material(GltfMaterial {
            name: Some(material.name.clone()),
            pbr_metallic_roughness: Some(pbr),
            normal_texture: (material.bump_map_texture_index >= 0).then(|| {
                GltfNormalTextureInfo {
                    index: material.bump_map_texture_index as usize,
                    scale: None,
                    tex_coord: None,
                }
            }),
            occlusion_texture: (material.opacity_texture_index >= 0).then(|| {
                GltfOcclusionTextureInfo {
                    index: material.opacity_texture_index as usize,
                    strength: None,
                    tex_coord: None,
                }
            }),
            emissive_texture: None,
            alpha_mode: None,
            double_sided: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textured_material_references_the_diffuse_texture() {
        let mut builder = GltfBuilder::new();
        let mut material = PodMaterial::new("body");
        material.diffuse_texture_index = 2;
        material.bump_map_texture_index = 3;
        builder.add_pod_material(&material);

        let m = &builder.materials[0];
        let pbr = m.pbr_metallic_roughness.as_ref().unwrap();
        assert_eq!(pbr.base_color_texture.as_ref().unwrap().index, 2);
        assert_eq!(pbr.base_color_factor, None);
        assert_eq!(pbr.metallic_factor, Some(0.0));
        assert_eq!(m.normal_texture.as_ref().unwrap().index, 3);
        assert!(m.occlusion_texture.is_none());
    }

    #[test]
    fn untextured_material_gets_flat_diffuse_with_opaque_alpha() {
        let mut builder = GltfBuilder::new();
        let mut material = PodMaterial::new("flat");
        material.diffuse = [0.5, 0.25, 0.125];
        builder.add_pod_material(&material);

        let pbr = builder.materials[0].pbr_metallic_roughness.as_ref().unwrap();
        assert_eq!(pbr.base_color_factor, Some([0.5, 0.25, 0.125, 1.0]));
        assert!(pbr.base_color_texture.is_none());
    }

    #[test]
    fn roughness_follows_the_blinn_phong_approximation() {
        // shininess 0 -> fully rough
        assert_eq!(shininess_to_roughness(0.0), 1.0);
        // sqrt(2 / (6 + 2)) = 0.5
        assert_eq!(shininess_to_roughness(6.0), 0.5);
    }

    #[test]
    fn embedded_image_lands_in_the_buffer() {
        let mut builder = GltfBuilder::new();
        let idx = builder.add_embedded_image(&[0x89, 0x50, 0x4E, 0x47], "image/png", None);
        assert_eq!(idx, 0);
        let image = &builder.images[0];
        assert_eq!(image.mime_type.as_deref(), Some("image/png"));
        let view = &builder.buffer_views[image.buffer_view.unwrap()];
        assert_eq!(view.byte_length, 4);
        assert!(image.uri.is_none());
    }
}
