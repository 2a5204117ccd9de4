//! Decoded scene structures consumed by the glTF translator.

use super::mesh::PodMesh;

/// Per-node animation data.
///
/// Static nodes carry at most a single TRS; animated nodes additionally
/// carry one 4x4 matrix per keyframe, column-major.
#[derive(Debug, Clone, Default)]
pub struct NodeAnimation {
    pub position: Option<[f32; 3]>,
    /// Quaternion in x, y, z, w component order.
    pub rotation: Option<[f32; 4]>,
    pub scale: Option<[f32; 3]>,
    pub matrices: Option<Vec<[f32; 16]>>,
}

/// One node of the scene hierarchy.
///
/// Index fields follow the POD convention: -1 means "none" (no mesh, no
/// material, or - for `parent_index` - a scene root).
#[derive(Debug, Clone)]
pub struct PodNode {
    pub name: String,
    pub mesh_index: i32,
    pub parent_index: i32,
    pub material_index: i32,
    pub animation: NodeAnimation,
}

impl PodNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mesh_index: -1,
            parent_index: -1,
            material_index: -1,
            animation: NodeAnimation::default(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_index < 0
    }
}

/// Blinn-Phong material as authored in the source scene.
#[derive(Debug, Clone)]
pub struct PodMaterial {
    pub name: String,
    pub diffuse: [f32; 3],
    pub shininess: f32,
    /// Texture indices into the scene texture table; -1 means none.
    pub diffuse_texture_index: i32,
    pub bump_map_texture_index: i32,
    pub opacity_texture_index: i32,
}

impl PodMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            diffuse: [1.0, 1.0, 1.0],
            shininess: 0.0,
            diffuse_texture_index: -1,
            bump_map_texture_index: -1,
            opacity_texture_index: -1,
        }
    }
}

/// Texture reference by base name (extension stripped).
#[derive(Debug, Clone)]
pub struct PodTexture {
    pub name: String,
}

impl PodTexture {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// URI of the decoded image the external transcoder produces.
    pub fn png_uri(&self) -> String {
        format!("{}.png", self.name)
    }
}

/// A fully decoded scene, ready for translation.
#[derive(Debug, Clone, Default)]
pub struct PodScene {
    pub meshes: Vec<PodMesh>,
    pub nodes: Vec<PodNode>,
    pub materials: Vec<PodMaterial>,
    pub textures: Vec<PodTexture>,
}

impl PodScene {
    /// Indices of the children of `parent`, in node order.
    pub fn children_of(&self, parent: usize) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent_index == parent as i32)
            .map(|(i, _)| i)
            .collect()
    }
}
