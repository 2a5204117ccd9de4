//! POD scene to glTF (GLB) conversion.
//!
//! Translation runs strictly downward: meshes are decoded into accessors,
//! nodes wire up the hierarchy, then textures and materials are attached -
//! either from the scene's own tables or from a sidecar XML descriptor.
//! Each conversion owns its [`gltf::GltfBuilder`]; nothing is shared
//! between runs.

mod convert;
pub mod decode;
pub mod gltf;
pub mod overrides;

pub use convert::{
    convert_scene_to_glb, convert_scene_to_glb_with_overrides, convert_scene_to_glb_with_progress,
    export_scene_to_glb, export_scene_to_gltf,
};
pub use overrides::{MaterialOverrides, find_sidecar};

// ============================================================================
// Progress Types
// ============================================================================

/// Progress callback type for conversion operations
pub type PodProgressCallback<'a> = &'a (dyn Fn(&PodProgress) + Sync + Send);

/// Progress information during a scene conversion
#[derive(Debug, Clone)]
pub struct PodProgress {
    /// Current operation phase
    pub phase: PodPhase,
    /// Current step number (1-indexed)
    pub current: usize,
    /// Total number of steps
    pub total: usize,
    /// Current entity being processed (if applicable)
    pub detail: Option<String>,
}

impl PodProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: PodPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            detail: None,
        }
    }

    /// Create a progress update naming the entity being processed
    #[must_use]
    pub fn with_detail(
        phase: PodPhase,
        current: usize,
        total: usize,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            detail: Some(detail.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Phase of a scene conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodPhase {
    /// Translating mesh geometry into accessors
    ConvertingMeshes,
    /// Building the node hierarchy and animation channels
    ConvertingNodes,
    /// Attaching images, samplers, and textures
    ConvertingTextures,
    /// Mapping materials
    ConvertingMaterials,
    /// Serializing the container
    WritingOutput,
    /// Conversion complete
    Complete,
}

impl PodPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConvertingMeshes => "Converting meshes",
            Self::ConvertingNodes => "Converting nodes",
            Self::ConvertingTextures => "Converting textures",
            Self::ConvertingMaterials => "Converting materials",
            Self::WritingOutput => "Writing output",
            Self::Complete => "Complete",
        }
    }
}
