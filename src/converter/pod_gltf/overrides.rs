//! Sidecar material descriptors.
//!
//! Some POD exports ship with a `<name>_model.xml` file describing, per
//! material, the 2D samplers the engine binds (albedo, normal, mask,
//! alpha) with GL filter and wrap modes. When present, textures and
//! materials are driven from this descriptor instead of the scene's flat
//! texture table.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

use super::gltf::materials::GltfSampler;

/// Root of a `_model.xml` descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialOverrides {
    #[serde(rename = "@Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Materials", default)]
    materials: MaterialsNode,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MaterialsNode {
    #[serde(rename = "Material", default)]
    materials: Vec<MaterialOverride>,
}

/// Per-material sampler bindings and render state.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialOverride {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "Sampler2D", default)]
    pub samplers: Vec<SamplerOverride>,
    #[serde(rename = "Culling", default)]
    pub culling: Option<String>,
}

impl MaterialOverride {
    /// Backface culling is off unless the descriptor names a culling mode.
    pub fn double_sided(&self) -> bool {
        match self.culling.as_deref() {
            None | Some("None") => true,
            Some(_) => false,
        }
    }
}

/// One engine sampler binding.
#[derive(Debug, Clone, Deserialize)]
pub struct SamplerOverride {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "FileName")]
    pub file_name: String,
    #[serde(rename = "GL_TEXTURE_MAG_FILTER", default)]
    mag_filter: Option<String>,
    #[serde(rename = "GL_TEXTURE_MIN_FILTER", default)]
    min_filter: Option<String>,
    #[serde(rename = "GL_TEXTURE_WRAP_S", default)]
    wrap_s: Option<String>,
    #[serde(rename = "GL_TEXTURE_WRAP_T", default)]
    wrap_t: Option<String>,
    #[serde(rename = "UVIdx", default)]
    pub uv_set: Option<usize>,
}

/// What a sampler binding feeds in the material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerKind {
    Albedo,
    Normal,
    /// Attached as emissive: glTF has no dedicated mask slot.
    Mask,
    /// No texture slot of its own; its presence switches alpha blending on.
    Alpha,
    Other,
}

fn mag_filter_code(name: &str) -> u32 {
    match name {
        "GL_NEAREST" => 9728,
        _ => 9729, // GL_LINEAR
    }
}

fn min_filter_code(name: &str) -> u32 {
    match name {
        "GL_NEAREST" => 9728,
        "GL_LINEAR" => 9729,
        "GL_NEAREST_MIPMAP_NEAREST" => 9984,
        "GL_LINEAR_MIPMAP_NEAREST" => 9985,
        "GL_NEAREST_MIPMAP_LINEAR" => 9986,
        _ => 9987, // GL_LINEAR_MIPMAP_LINEAR
    }
}

fn wrap_code(name: &str) -> u32 {
    match name {
        "GL_CLAMP_TO_EDGE" => 33071,
        "GL_MIRRORED_REPEAT" => 33648,
        _ => 10497, // GL_REPEAT
    }
}

impl SamplerOverride {
    pub fn kind(&self) -> SamplerKind {
        match self.name.as_str() {
            "uAlbedoTexture" => SamplerKind::Albedo,
            "uNormalTexture" => SamplerKind::Normal,
            "uMaskTexture" => SamplerKind::Mask,
            "uAlphaTexture" => SamplerKind::Alpha,
            _ => SamplerKind::Other,
        }
    }

    /// The source art is TGA; the transcoder emits PNG alongside.
    pub fn png_uri(&self) -> String {
        let path = Path::new(&self.file_name);
        path.file_stem()
            .and_then(|s| s.to_str())
            .map_or_else(|| self.file_name.clone(), |stem| format!("{stem}.png"))
    }

    /// Translate the GL filter/wrap enums to a glTF sampler.
    pub fn gltf_sampler(&self) -> GltfSampler {
        GltfSampler {
            mag_filter: Some(self.mag_filter.as_deref().map_or(9729, mag_filter_code)),
            min_filter: Some(self.min_filter.as_deref().map_or(9987, min_filter_code)),
            wrap_s: Some(self.wrap_s.as_deref().map_or(10497, wrap_code)),
            wrap_t: Some(self.wrap_t.as_deref().map_or(10497, wrap_code)),
        }
    }
}

impl MaterialOverrides {
    pub fn materials(&self) -> &[MaterialOverride] {
        &self.materials.materials
    }

    pub fn material(&self, name: &str) -> Option<&MaterialOverride> {
        self.materials.materials.iter().find(|m| m.name == name)
    }

    /// Parse a descriptor from XML text.
    ///
    /// # Errors
    /// Returns an error if the XML does not match the descriptor schema.
    pub fn from_xml(xml: &str) -> Result<Self> {
        Ok(quick_xml::de::from_str(xml)?)
    }

    /// Load a descriptor from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_xml(&text)
    }
}

/// The descriptor path that pairs with a POD file, if one exists on disk.
pub fn find_sidecar(pod_path: &Path) -> Option<PathBuf> {
    let stem = pod_path.file_stem()?.to_str()?;
    let candidate = pod_path.with_file_name(format!("{stem}_model.xml"));
    candidate.exists().then_some(candidate)
}
