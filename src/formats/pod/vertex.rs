//! Vertex component data types from the POD vertex declaration.

use crate::error::{Error, Result};

/// Component data type of one vertex attribute.
///
/// The discriminants are the raw type codes used by POD vertex
/// declarations. Packed color types occupy four bytes as a single unit and
/// have no per-component scalar interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum VertexDataType {
    Float = 1,
    Int = 2,
    UnsignedShort = 3,
    Rgba = 4,
    Argb = 5,
    D3dColor = 6,
    Ubyte4 = 7,
    Dec3N = 8,
    Fixed16_16 = 9,
    UnsignedByte = 10,
    Short = 11,
    ShortNorm = 12,
    Byte = 13,
    ByteNorm = 14,
    UnsignedByteNorm = 15,
    UnsignedShortNorm = 16,
    UnsignedInt = 17,
    Abgr = 18,
}

impl VertexDataType {
    /// Look up a raw type code from a vertex declaration.
    ///
    /// # Errors
    /// Returns an error if the code is not in the known enumeration.
    pub fn from_u32(v: u32) -> Result<Self> {
        match v {
            1 => Ok(Self::Float),
            2 => Ok(Self::Int),
            3 => Ok(Self::UnsignedShort),
            4 => Ok(Self::Rgba),
            5 => Ok(Self::Argb),
            6 => Ok(Self::D3dColor),
            7 => Ok(Self::Ubyte4),
            8 => Ok(Self::Dec3N),
            9 => Ok(Self::Fixed16_16),
            10 => Ok(Self::UnsignedByte),
            11 => Ok(Self::Short),
            12 => Ok(Self::ShortNorm),
            13 => Ok(Self::Byte),
            14 => Ok(Self::ByteNorm),
            15 => Ok(Self::UnsignedByteNorm),
            16 => Ok(Self::UnsignedShortNorm),
            17 => Ok(Self::UnsignedInt),
            18 => Ok(Self::Abgr),
            _ => Err(Error::UnsupportedVertexType { type_code: v }),
        }
    }

    /// Byte width of one component of this type.
    pub fn component_size(self) -> usize {
        match self {
            Self::UnsignedByte | Self::Byte | Self::ByteNorm | Self::UnsignedByteNorm => 1,
            Self::UnsignedShort | Self::Short | Self::ShortNorm | Self::UnsignedShortNorm => 2,
            Self::Float
            | Self::Int
            | Self::Rgba
            | Self::Argb
            | Self::D3dColor
            | Self::Ubyte4
            | Self::Dec3N
            | Self::Fixed16_16
            | Self::UnsignedInt
            | Self::Abgr => 4,
        }
    }

    /// True for four-byte packed color layouts with no scalar components.
    pub fn is_packed_color(self) -> bool {
        matches!(
            self,
            Self::Rgba | Self::Argb | Self::D3dColor | Self::Ubyte4 | Self::Dec3N | Self::Abgr
        )
    }

    /// The glTF accessor `componentType` code and `normalized` flag this
    /// type maps to directly, if any.
    ///
    /// Types with no direct mapping (fixed point, 32-bit integers, packed
    /// colors) must be decoded and rewritten as floats instead of aliasing
    /// the interleaved buffer.
    pub fn gltf_component_type(self) -> Option<(u32, bool)> {
        match self {
            Self::Float => Some((5126, false)),
            Self::Byte => Some((5120, false)),
            Self::ByteNorm => Some((5120, true)),
            Self::UnsignedByte => Some((5121, false)),
            Self::UnsignedByteNorm => Some((5121, true)),
            Self::Short => Some((5122, false)),
            Self::ShortNorm => Some((5122, true)),
            Self::UnsignedShort => Some((5123, false)),
            Self::UnsignedShortNorm => Some((5123, true)),
            _ => None,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Float => "Float",
            Self::Int => "Int",
            Self::UnsignedShort => "UnsignedShort",
            Self::Rgba => "RGBA",
            Self::Argb => "ARGB",
            Self::D3dColor => "D3DCOLOR",
            Self::Ubyte4 => "UBYTE4",
            Self::Dec3N => "DEC3N",
            Self::Fixed16_16 => "Fixed16.16",
            Self::UnsignedByte => "UnsignedByte",
            Self::Short => "Short",
            Self::ShortNorm => "ShortNorm",
            Self::Byte => "Byte",
            Self::ByteNorm => "ByteNorm",
            Self::UnsignedByteNorm => "UnsignedByteNorm",
            Self::UnsignedShortNorm => "UnsignedShortNorm",
            Self::UnsignedInt => "UnsignedInt",
            Self::Abgr => "ABGR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_known_codes() {
        for code in 1..=18u32 {
            let ty = VertexDataType::from_u32(code).unwrap();
            assert_eq!(ty as u32, code);
        }
    }

    #[test]
    fn rejects_unknown_code() {
        assert!(matches!(
            VertexDataType::from_u32(1000),
            Err(Error::UnsupportedVertexType { type_code: 1000 })
        ));
    }

    #[test]
    fn component_sizes_match_declaration_widths() {
        assert_eq!(VertexDataType::Float.component_size(), 4);
        assert_eq!(VertexDataType::UnsignedShort.component_size(), 2);
        assert_eq!(VertexDataType::UnsignedByteNorm.component_size(), 1);
        assert_eq!(VertexDataType::Fixed16_16.component_size(), 4);
        assert_eq!(VertexDataType::D3dColor.component_size(), 4);
    }

    #[test]
    fn packed_colors_have_no_direct_gltf_mapping() {
        assert!(VertexDataType::Rgba.gltf_component_type().is_none());
        assert!(VertexDataType::Fixed16_16.gltf_component_type().is_none());
        assert_eq!(
            VertexDataType::UnsignedShortNorm.gltf_component_type(),
            Some((5123, true))
        );
    }
}
