//! Strided vertex attribute decoding.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};
use crate::formats::pod::VertexDataType;

/// Decode one attribute out of an interleaved vertex buffer.
///
/// Reads `num_components` consecutive typed values starting at `offset`,
/// advances by `stride`, and repeats `num_vertices` times. The result is a
/// flat f32 sequence of `num_vertices * num_components` values. Integer and
/// fixed-point types widen to float; normalized variants divide by their
/// type maximum. The raw buffer is never mutated.
///
/// # Errors
/// Returns an error if the buffer length is not divisible by `stride`, if a
/// read would run past the buffer, or if the data type has no scalar decode
/// rule (packed color layouts).
pub fn decode_attribute(
    data: &[u8],
    data_type: VertexDataType,
    num_components: usize,
    stride: usize,
    offset: usize,
    num_vertices: usize,
    semantic: &str,
) -> Result<Vec<f32>> {
    if stride == 0 || data.len() % stride != 0 {
        return Err(Error::VertexLayoutMismatch {
            semantic: semantic.to_string(),
            buffer_len: data.len(),
            stride,
        });
    }

    let component_size = data_type.component_size();
    let mut values = Vec::with_capacity(num_vertices * num_components);

    for vertex in 0..num_vertices {
        let base = vertex * stride + offset;
        for c in 0..num_components {
            let at = base + c * component_size;
            if at + component_size > data.len() {
                return Err(Error::VertexOutOfRange {
                    semantic: semantic.to_string(),
                    vertex,
                    offset: at,
                });
            }
            values.push(read_scalar(data_type, &data[at..at + component_size])?);
        }
    }

    Ok(values)
}

fn read_scalar(data_type: VertexDataType, bytes: &[u8]) -> Result<f32> {
    Ok(match data_type {
        VertexDataType::Float => LittleEndian::read_f32(bytes),
        VertexDataType::Int => LittleEndian::read_i32(bytes) as f32,
        VertexDataType::UnsignedInt => LittleEndian::read_u32(bytes) as f32,
        VertexDataType::Short => f32::from(LittleEndian::read_i16(bytes)),
        VertexDataType::ShortNorm => f32::from(LittleEndian::read_i16(bytes)) / 32767.0,
        VertexDataType::UnsignedShort => f32::from(LittleEndian::read_u16(bytes)),
        VertexDataType::UnsignedShortNorm => f32::from(LittleEndian::read_u16(bytes)) / 65535.0,
        VertexDataType::Byte => f32::from(bytes[0] as i8),
        VertexDataType::ByteNorm => f32::from(bytes[0] as i8) / 127.0,
        VertexDataType::UnsignedByte => f32::from(bytes[0]),
        VertexDataType::UnsignedByteNorm => f32::from(bytes[0]) / 255.0,
        VertexDataType::Fixed16_16 => LittleEndian::read_i32(bytes) as f32 / 65536.0,
        packed => {
            return Err(Error::UndecodableVertexType {
                type_name: packed.name(),
            });
        }
    })
}

/// Widen 3-component tangents to 4 by appending handedness 1.0.
/// 4-component input passes through unchanged.
pub fn widen_tangents(values: &[f32], num_components: usize) -> Vec<f32> {
    if num_components != 3 {
        return values.to_vec();
    }
    let mut out = Vec::with_capacity(values.len() / 3 * 4);
    for t in values.chunks_exact(3) {
        out.extend_from_slice(t);
        out.push(1.0);
    }
    out
}

/// Truncate or zero-pad joint index tuples to exactly four unsigned bytes.
pub fn pad_joints(values: &[f32], num_components: usize) -> Vec<[u8; 4]> {
    values
        .chunks(num_components.max(1))
        .map(|tuple| {
            let mut joints = [0u8; 4];
            for (slot, &v) in joints.iter_mut().zip(tuple.iter()) {
                *slot = v as u8;
            }
            joints
        })
        .collect()
}

/// Zero-pad weight tuples to exactly four floats.
///
/// # Errors
/// More than four weights per vertex is a hard error; there is no defined
/// truncation or renormalization rule.
pub fn pad_weights(values: &[f32], num_components: usize, semantic: &str) -> Result<Vec<[f32; 4]>> {
    if num_components > 4 {
        return Err(Error::WeightCountExceeded {
            semantic: semantic.to_string(),
            count: num_components,
        });
    }
    Ok(values
        .chunks(num_components.max(1))
        .map(|tuple| {
            let mut weights = [0.0f32; 4];
            weights[..tuple.len()].copy_from_slice(tuple);
            weights
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_blob(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn decodes_strided_floats() {
        // two vertices of POSITION(vec3) + NORMAL(vec3), stride 24
        let blob = float_blob(&[
            1.0, 2.0, 3.0, 0.0, 1.0, 0.0, //
            4.0, 5.0, 6.0, 0.0, 0.0, 1.0,
        ]);
        let positions =
            decode_attribute(&blob, VertexDataType::Float, 3, 24, 0, 2, "POSITION").unwrap();
        assert_eq!(positions, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let normals =
            decode_attribute(&blob, VertexDataType::Float, 3, 24, 12, 2, "NORMAL").unwrap();
        assert_eq!(normals, vec![0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn decode_then_reencode_is_byte_identical() {
        let blob = float_blob(&[0.5, -1.25, 3.5, 9.0, 0.125, -2.0]);
        let decoded =
            decode_attribute(&blob, VertexDataType::Float, 2, 12, 4, 2, "TEXCOORD_0").unwrap();
        // re-encode the decoded sub-region and compare against the source
        let reencoded: Vec<u8> = decoded.iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(&reencoded[0..8], &blob[4..12]);
        assert_eq!(&reencoded[8..16], &blob[16..24]);
    }

    #[test]
    fn normalized_types_divide_by_type_maximum() {
        let blob = vec![255u8, 0, 127, 64];
        let v = decode_attribute(&blob, VertexDataType::UnsignedByteNorm, 4, 4, 0, 1, "COLOR")
            .unwrap();
        assert_eq!(v[0], 1.0);
        assert_eq!(v[1], 0.0);
        assert!((v[2] - 127.0 / 255.0).abs() < 1e-6);

        let blob: Vec<u8> = [32767i16, -32767].iter().flat_map(|v| v.to_le_bytes()).collect();
        let v = decode_attribute(&blob, VertexDataType::ShortNorm, 2, 4, 0, 1, "NORMAL").unwrap();
        assert_eq!(v, vec![1.0, -1.0]);
    }

    #[test]
    fn fixed_point_divides_by_two_to_the_sixteen() {
        let blob = (3i32 << 16 | 0x8000).to_le_bytes().to_vec();
        let v = decode_attribute(&blob, VertexDataType::Fixed16_16, 1, 4, 0, 1, "POSITION")
            .unwrap();
        assert_eq!(v, vec![3.5]);
    }

    #[test]
    fn stride_mismatch_is_an_error() {
        let blob = vec![0u8; 10];
        assert!(matches!(
            decode_attribute(&blob, VertexDataType::Float, 1, 4, 0, 2, "POSITION"),
            Err(Error::VertexLayoutMismatch {
                buffer_len: 10,
                stride: 4,
                ..
            })
        ));
    }

    #[test]
    fn read_past_end_is_an_error() {
        let blob = vec![0u8; 8];
        assert!(matches!(
            decode_attribute(&blob, VertexDataType::Float, 3, 8, 0, 1, "POSITION"),
            Err(Error::VertexOutOfRange { vertex: 0, .. })
        ));
    }

    #[test]
    fn packed_color_has_no_scalar_decode() {
        let blob = vec![0u8; 4];
        assert!(matches!(
            decode_attribute(&blob, VertexDataType::D3dColor, 1, 4, 0, 1, "COLOR_0"),
            Err(Error::UndecodableVertexType { .. })
        ));
    }

    #[test]
    fn tangents_widen_with_unit_handedness() {
        assert_eq!(
            widen_tangents(&[0.1, 0.2, 0.3], 3),
            vec![0.1, 0.2, 0.3, 1.0]
        );
        // already 4-wide: untouched
        assert_eq!(
            widen_tangents(&[0.1, 0.2, 0.3, -1.0], 4),
            vec![0.1, 0.2, 0.3, -1.0]
        );
    }

    #[test]
    fn joints_pad_and_truncate_to_four() {
        assert_eq!(pad_joints(&[5.0, 9.0], 2), vec![[5, 9, 0, 0]]);
        assert_eq!(pad_joints(&[1.0, 2.0, 3.0, 4.0], 4), vec![[1, 2, 3, 4]]);
        assert_eq!(
            pad_joints(&[1.0, 2.0, 3.0, 4.0, 5.0], 5),
            vec![[1, 2, 3, 4]]
        );
    }

    #[test]
    fn weights_pad_but_never_truncate() {
        assert_eq!(
            pad_weights(&[0.25, 0.75], 2, "WEIGHTS_0").unwrap(),
            vec![[0.25, 0.75, 0.0, 0.0]]
        );
        assert!(matches!(
            pad_weights(&[0.2; 5], 5, "WEIGHTS_0"),
            Err(Error::WeightCountExceeded { count: 5, .. })
        ));
    }
}
