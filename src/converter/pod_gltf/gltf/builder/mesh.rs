//! Mesh methods for `GltfBuilder`

use indexmap::IndexMap;

use crate::converter::pod_gltf::decode::{
    decode_attribute, pad_joints, pad_weights, widen_tangents,
};
use crate::error::{Error, Result};
use crate::formats::pod::{PodMesh, VertexElement};

use super::super::types::{GltfAccessor, GltfBufferView, GltfMesh, GltfPrimitive};
use super::GltfBuilder;

fn element_type(num_components: usize) -> &'static str {
    match num_components {
        1 => "SCALAR",
        2 => "VEC2",
        3 => "VEC3",
        _ => "VEC4",
    }
}

fn component_bounds(values: &[f32], num_components: usize) -> (Vec<f32>, Vec<f32>) {
    let mut min = vec![f32::MAX; num_components];
    let mut max = vec![f32::MIN; num_components];
    for tuple in values.chunks_exact(num_components) {
        for (i, &v) in tuple.iter().enumerate() {
            min[i] = min[i].min(v);
            max[i] = max[i].max(v);
        }
    }
    (min, max)
}

impl GltfBuilder {
    /// Translate one source mesh: index buffer, one shared buffer view over
    /// the interleaved vertex blob, and one accessor per attribute.
    ///
    /// Returns the new mesh index. The primitive's material is wired up
    /// later by the node pass.
    ///
    /// # Errors
    /// Returns an error if the mesh has no POSITION element, references a
    /// missing raw buffer, or an attribute fails to decode.
    pub fn add_pod_mesh(&mut self, mesh_index: usize, mesh: &PodMesh) -> Result<usize> {
        let indices_accessor = if let Some(faces) = mesh.faces() {
            let byte_offset = self.append_binary(&faces.data);
            let view = self.add_buffer_view(GltfBufferView {
                buffer: 0,
                byte_offset,
                byte_length: faces.data.len(),
                byte_stride: None,
                target: Some(34963), // ELEMENT_ARRAY_BUFFER
            });
            Some(self.add_accessor(GltfAccessor {
                buffer_view: view,
                byte_offset: None,
                component_type: faces.index_type.gltf_component_type(),
                count: faces.triangle_count() * 3,
                accessor_type: "SCALAR".to_string(),
                min: None,
                max: None,
                normalized: None,
            }))
        } else {
            None
        };

        let position = mesh
            .element("POSITION")
            .ok_or(Error::MeshMissingPositions { mesh_index })?
            .clone();
        let blob = mesh
            .vertex_data(position.data_index)
            .ok_or(Error::MissingVertexData {
                mesh_index,
                data_index: position.data_index,
            })?;

        // One view spans the whole interleaved blob; in-place accessors
        // address it by byte offset.
        let vertex_offset = self.append_binary(blob);
        let shared_view = self.add_buffer_view(GltfBufferView {
            buffer: 0,
            byte_offset: vertex_offset,
            byte_length: blob.len(),
            byte_stride: Some(position.stride),
            target: Some(34962), // ARRAY_BUFFER
        });

        let mut attributes = IndexMap::new();
        for (semantic, element) in mesh.elements() {
            if semantic == "COLOR_0" || element.data_type.is_packed_color() {
                // packed 8-bit-per-channel layouts don't decode to the
                // float accessors this pipeline emits
                tracing::debug!(%semantic, "skipping unsupported packed attribute");
                continue;
            }
            let accessor =
                self.add_pod_attribute(mesh, mesh_index, semantic, element, &position, shared_view)?;
            attributes.insert(semantic.clone(), accessor);
        }

        Ok(self.add_mesh(GltfMesh {
            name: None,
            primitives: vec![GltfPrimitive {
                attributes,
                indices: indices_accessor,
                material: None,
                mode: 4,
            }],
        }))
    }

    fn add_pod_attribute(
        &mut self,
        mesh: &PodMesh,
        mesh_index: usize,
        semantic: &str,
        element: &VertexElement,
        position: &VertexElement,
        shared_view: usize,
    ) -> Result<usize> {
        let count = mesh.num_vertices;
        let decode = |data: &[u8]| {
            decode_attribute(
                data,
                element.data_type,
                element.num_components,
                element.stride,
                element.offset,
                count,
                semantic,
            )
        };
        let data = mesh
            .vertex_data(element.data_index)
            .ok_or(Error::MissingVertexData {
                mesh_index,
                data_index: element.data_index,
            })?;

        match semantic {
            "TANGENT" if element.num_components == 3 => {
                let widened = widen_tangents(&decode(data)?, 3);
                Ok(self.packed_float_accessor(&widened, 4, count, None))
            }
            "JOINTS_0" => {
                let joints = pad_joints(&decode(data)?, element.num_components);
                let bytes: Vec<u8> = joints.iter().flatten().copied().collect();
                let byte_offset = self.append_binary(&bytes);
                let view = self.add_buffer_view(GltfBufferView {
                    buffer: 0,
                    byte_offset,
                    byte_length: bytes.len(),
                    byte_stride: None,
                    target: Some(34962),
                });
                Ok(self.add_accessor(GltfAccessor {
                    buffer_view: view,
                    byte_offset: None,
                    component_type: 5121, // UNSIGNED_BYTE
                    count,
                    accessor_type: "VEC4".to_string(),
                    min: None,
                    max: None,
                    normalized: None,
                }))
            }
            "WEIGHTS_0" => {
                let weights = pad_weights(&decode(data)?, element.num_components, semantic)?;
                let flat: Vec<f32> = weights.iter().flatten().copied().collect();
                Ok(self.packed_float_accessor(&flat, 4, count, None))
            }
            _ => {
                let direct = element
                    .data_type
                    .gltf_component_type()
                    .filter(|_| element.data_index == position.data_index);

                if let Some((component_type, normalized)) = direct {
                    let (min, max) = if semantic == "POSITION" {
                        let (min, max) =
                            component_bounds(&decode(data)?, element.num_components);
                        (Some(min), Some(max))
                    } else {
                        (None, None)
                    };
                    Ok(self.add_accessor(GltfAccessor {
                        buffer_view: shared_view,
                        byte_offset: Some(element.offset),
                        component_type,
                        count,
                        accessor_type: element_type(element.num_components).to_string(),
                        min,
                        max,
                        normalized: normalized.then_some(true),
                    }))
                } else {
                    // no direct componentType (fixed point, 32-bit int) or a
                    // sidecar buffer: rewrite as packed floats
                    let values = decode(data)?;
                    let bounds = (semantic == "POSITION")
                        .then(|| component_bounds(&values, element.num_components));
                    Ok(self.packed_float_accessor(
                        &values,
                        element.num_components,
                        count,
                        bounds,
                    ))
                }
            }
        }
    }

    fn packed_float_accessor(
        &mut self,
        values: &[f32],
        num_components: usize,
        count: usize,
        bounds: Option<(Vec<f32>, Vec<f32>)>,
    ) -> usize {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let byte_offset = self.append_binary(&bytes);
        let view = self.add_buffer_view(GltfBufferView {
            buffer: 0,
            byte_offset,
            byte_length: bytes.len(),
            byte_stride: None,
            target: Some(34962),
        });
        let (min, max) = match bounds {
            Some((min, max)) => (Some(min), Some(max)),
            None => (None, None),
        };
        self.add_accessor(GltfAccessor {
            buffer_view: view,
            byte_offset: None,
            component_type: 5126, // FLOAT
            count,
            accessor_type: element_type(num_components).to_string(),
            min,
            max,
            normalized: None,
        })
    }
}
