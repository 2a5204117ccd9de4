//! Mesh entity: interleaved vertex blobs, layout descriptors, face indices.

use byteorder::{ByteOrder, LittleEndian};
use indexmap::IndexMap;

use crate::error::{Error, Result};

use super::vertex::VertexDataType;

/// Width of the face index buffer, mirroring the POD face flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U16,
    U32,
}

impl IndexType {
    /// Look up the POD face-data flag (3 = 16-bit, 17 = 32-bit).
    ///
    /// # Errors
    /// Returns an error for any other flag value.
    pub fn from_face_flag(v: u32) -> Result<Self> {
        match v {
            3 => Ok(Self::U16),
            17 => Ok(Self::U32),
            _ => Err(Error::UnsupportedVertexType { type_code: v }),
        }
    }

    pub fn byte_width(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// The glTF accessor `componentType` code for indices of this width.
    pub fn gltf_component_type(self) -> u32 {
        match self {
            Self::U16 => 5123, // UNSIGNED_SHORT
            Self::U32 => 5125, // UNSIGNED_INT
        }
    }
}

/// Face index buffer: a flat triangle list, uniform 16- or 32-bit width.
#[derive(Debug, Clone)]
pub struct FaceData {
    pub index_type: IndexType,
    pub data: Vec<u8>,
}

impl FaceData {
    pub fn index_count(&self) -> usize {
        self.data.len() / self.index_type.byte_width()
    }

    pub fn triangle_count(&self) -> usize {
        self.index_count() / 3
    }
}

/// Layout descriptor of one vertex attribute within an interleaved buffer.
///
/// Validated at construction: the component count must be 1-4 and the type
/// must be in the known enumeration. Descriptors are immutable after
/// registration.
#[derive(Debug, Clone)]
pub struct VertexElement {
    pub data_type: VertexDataType,
    pub num_components: usize,
    /// Byte distance between successive vertices in the owning buffer.
    pub stride: usize,
    /// Byte offset of this attribute within one stride.
    pub offset: usize,
    /// Index of the owning raw buffer in the mesh.
    pub data_index: usize,
}

impl VertexElement {
    /// # Errors
    /// Returns an error if the component count is outside 1-4.
    pub fn new(
        semantic: &str,
        data_type: VertexDataType,
        num_components: usize,
        stride: usize,
        offset: usize,
        data_index: usize,
    ) -> Result<Self> {
        if !(1..=4).contains(&num_components) {
            return Err(Error::InvalidComponentCount {
                semantic: semantic.to_string(),
                count: num_components,
            });
        }
        Ok(Self {
            data_type,
            num_components,
            stride,
            offset,
            data_index,
        })
    }

    /// Byte size of one attribute value (all components).
    pub fn element_size(&self) -> usize {
        self.data_type.component_size() * self.num_components
    }
}

/// One source mesh: raw interleaved vertex buffers plus the descriptor
/// table that gives them meaning, and a triangle-list index buffer.
#[derive(Debug, Clone, Default)]
pub struct PodMesh {
    pub num_vertices: usize,
    vertex_data: Vec<Vec<u8>>,
    elements: IndexMap<String, VertexElement>,
    faces: Option<FaceData>,
}

impl PodMesh {
    pub fn new(num_vertices: usize) -> Self {
        Self {
            num_vertices,
            ..Self::default()
        }
    }

    /// Append a raw vertex data buffer, returning its index.
    pub fn add_vertex_data(&mut self, data: Vec<u8>) -> usize {
        self.vertex_data.push(data);
        self.vertex_data.len() - 1
    }

    /// Set the face index buffer.
    pub fn add_faces(&mut self, data: Vec<u8>, index_type: IndexType) {
        self.faces = Some(FaceData { index_type, data });
    }

    /// Register a vertex attribute layout under its semantic name.
    ///
    /// # Errors
    /// Returns an error if the semantic is already registered; existing
    /// descriptors are never overwritten.
    pub fn add_element(&mut self, semantic: &str, element: VertexElement) -> Result<()> {
        if self.elements.contains_key(semantic) {
            return Err(Error::DuplicateVertexSemantic {
                semantic: semantic.to_string(),
            });
        }
        self.elements.insert(semantic.to_string(), element);
        Ok(())
    }

    pub fn elements(&self) -> &IndexMap<String, VertexElement> {
        &self.elements
    }

    pub fn element(&self, semantic: &str) -> Option<&VertexElement> {
        self.elements.get(semantic)
    }

    pub fn vertex_data(&self, index: usize) -> Option<&[u8]> {
        self.vertex_data.get(index).map(Vec::as_slice)
    }

    pub fn faces(&self) -> Option<&FaceData> {
        self.faces.as_ref()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.as_ref().map_or(0, FaceData::triangle_count)
    }

    /// One-time byte-rewrite pass: flip the V axis of `TEXCOORD_0` in
    /// place (`v = 1 - v`), keyed by the element's stride and offset.
    ///
    /// POD UVs are authored with V pointing the opposite way from glTF.
    /// Must run before the buffer is first read for translation; decoding
    /// itself never mutates. Meshes without a float `TEXCOORD_0` are left
    /// untouched.
    ///
    /// # Errors
    /// Returns an error if the buffer length is not divisible by the
    /// element's stride.
    pub fn flip_texcoord_v(&mut self) -> Result<()> {
        let Some(element) = self.elements.get("TEXCOORD_0").cloned() else {
            return Ok(());
        };
        if element.data_type != VertexDataType::Float || element.num_components < 2 {
            tracing::debug!("skipping UV flip: TEXCOORD_0 is not a float vec2+");
            return Ok(());
        }
        let Some(data) = self.vertex_data.get_mut(element.data_index) else {
            return Ok(());
        };
        if element.stride == 0 || data.len() % element.stride != 0 {
            return Err(Error::VertexLayoutMismatch {
                semantic: "TEXCOORD_0".to_string(),
                buffer_len: data.len(),
                stride: element.stride,
            });
        }

        for i in 0..self.num_vertices {
            // second component of the pair
            let at = i * element.stride + element.offset + 4;
            if at + 4 > data.len() {
                return Err(Error::VertexOutOfRange {
                    semantic: "TEXCOORD_0".to_string(),
                    vertex: i,
                    offset: at,
                });
            }
            let v = LittleEndian::read_f32(&data[at..at + 4]);
            LittleEndian::write_f32(&mut data[at..at + 4], 1.0 - v);
        }
        Ok(())
    }
}
