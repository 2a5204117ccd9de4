//! Pixel format, channel type, and color space enumerations.

use std::fmt;

use crate::error::{Error, Result};

/// Modern (PVR3) pixel format codes.
///
/// Only meaningful when the high word of the header's pixel-format pair is
/// zero; otherwise the pair encodes a per-channel layout this library does
/// not size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PixelFormat {
    Pvrtc2bppRgb = 0,
    Pvrtc2bppRgba = 1,
    Pvrtc4bppRgb = 2,
    Pvrtc4bppRgba = 3,
    PvrtcII2bpp = 4,
    PvrtcII4bpp = 5,
    Etc1 = 6,
    Dxt1 = 7,
    Dxt2 = 8,
    Dxt3 = 9,
    Dxt4 = 10,
    Dxt5 = 11,
    Bc4 = 12,
    Bc5 = 13,
    Bc6 = 14,
    Bc7 = 15,
    Uyvy = 16,
    Yuy2 = 17,
    Bw1bpp = 18,
    R9g9b9e5 = 19,
    Rgbg8888 = 20,
    Grgb8888 = 21,
    Etc2Rgb = 22,
    Etc2Rgba = 23,
    Etc2RgbA1 = 24,
    EacR11 = 25,
    EacRg11 = 26,
    Astc4x4 = 27,
    Astc5x4 = 28,
    Astc5x5 = 29,
    Astc6x5 = 30,
    Astc6x6 = 31,
    Astc8x5 = 32,
    Astc8x6 = 33,
    Astc8x8 = 34,
    Astc10x5 = 35,
    Astc10x6 = 36,
    Astc10x8 = 37,
    Astc10x10 = 38,
    Astc12x10 = 39,
    Astc12x12 = 40,
    Astc3x3x3 = 41,
    Astc4x3x3 = 42,
    Astc4x4x3 = 43,
    Astc4x4x4 = 44,
    Astc5x4x4 = 45,
    Astc5x5x4 = 46,
    Astc5x5x5 = 47,
    Astc6x5x5 = 48,
    Astc6x6x5 = 49,
    Astc6x6x6 = 50,
}

/// How one mipmap level's byte size is computed for a format.
///
/// Adding a format is a data addition to [`PixelFormat::size_rule`], not a
/// new code path.
#[derive(Debug, Clone, Copy)]
enum SizeRule {
    /// PVRTC: dimensions clamp up to a minimum and the padded area divides
    /// down to bytes.
    PackedArea {
        min_width: u32,
        min_height: u32,
        divisor: usize,
    },
    /// Fixed-size blocks of `width` x `height` texels.
    Blocks {
        width: usize,
        height: usize,
        bytes: usize,
    },
}

impl PixelFormat {
    /// Look up a modern pixel-format code.
    pub fn from_code(code: u32) -> Option<Self> {
        if code > Self::Astc6x6x6 as u32 {
            return None;
        }
        // Discriminants are dense from 0, so a table keeps this a lookup.
        const TABLE: [PixelFormat; 51] = [
            PixelFormat::Pvrtc2bppRgb,
            PixelFormat::Pvrtc2bppRgba,
            PixelFormat::Pvrtc4bppRgb,
            PixelFormat::Pvrtc4bppRgba,
            PixelFormat::PvrtcII2bpp,
            PixelFormat::PvrtcII4bpp,
            PixelFormat::Etc1,
            PixelFormat::Dxt1,
            PixelFormat::Dxt2,
            PixelFormat::Dxt3,
            PixelFormat::Dxt4,
            PixelFormat::Dxt5,
            PixelFormat::Bc4,
            PixelFormat::Bc5,
            PixelFormat::Bc6,
            PixelFormat::Bc7,
            PixelFormat::Uyvy,
            PixelFormat::Yuy2,
            PixelFormat::Bw1bpp,
            PixelFormat::R9g9b9e5,
            PixelFormat::Rgbg8888,
            PixelFormat::Grgb8888,
            PixelFormat::Etc2Rgb,
            PixelFormat::Etc2Rgba,
            PixelFormat::Etc2RgbA1,
            PixelFormat::EacR11,
            PixelFormat::EacRg11,
            PixelFormat::Astc4x4,
            PixelFormat::Astc5x4,
            PixelFormat::Astc5x5,
            PixelFormat::Astc6x5,
            PixelFormat::Astc6x6,
            PixelFormat::Astc8x5,
            PixelFormat::Astc8x6,
            PixelFormat::Astc8x8,
            PixelFormat::Astc10x5,
            PixelFormat::Astc10x6,
            PixelFormat::Astc10x8,
            PixelFormat::Astc10x10,
            PixelFormat::Astc12x10,
            PixelFormat::Astc12x12,
            PixelFormat::Astc3x3x3,
            PixelFormat::Astc4x3x3,
            PixelFormat::Astc4x4x3,
            PixelFormat::Astc4x4x4,
            PixelFormat::Astc5x4x4,
            PixelFormat::Astc5x5x4,
            PixelFormat::Astc5x5x5,
            PixelFormat::Astc6x5x5,
            PixelFormat::Astc6x6x5,
            PixelFormat::Astc6x6x6,
        ];
        Some(TABLE[code as usize])
    }

    /// Map a legacy (V1/V2) pixel-format code to the modern enumeration.
    ///
    /// The legacy word packs flags above bit 7, so only the low byte is the
    /// format. Only the PVRTC codes carry over to the modern table; every
    /// other legacy layout resolves to "format unknown".
    pub fn from_legacy_code(code: u32) -> Option<Self> {
        match code & 0xFF {
            0x0C => Some(Self::Pvrtc2bppRgba),
            0x0D => Some(Self::Pvrtc4bppRgba),
            _ => None,
        }
    }

    fn size_rule(self) -> Option<SizeRule> {
        match self {
            Self::Pvrtc2bppRgb | Self::Pvrtc2bppRgba => Some(SizeRule::PackedArea {
                min_width: 16,
                min_height: 8,
                divisor: 4,
            }),
            Self::Pvrtc4bppRgb | Self::Pvrtc4bppRgba => Some(SizeRule::PackedArea {
                min_width: 8,
                min_height: 8,
                divisor: 2,
            }),
            Self::Etc1
            | Self::Etc2Rgb
            | Self::Etc2Rgba
            | Self::Etc2RgbA1
            | Self::EacR11
            | Self::EacRg11
            | Self::Dxt1 => Some(SizeRule::Blocks {
                width: 4,
                height: 4,
                bytes: 8,
            }),
            Self::Dxt2 | Self::Dxt3 | Self::Dxt4 | Self::Dxt5 => Some(SizeRule::Blocks {
                width: 4,
                height: 4,
                bytes: 16,
            }),
            Self::Astc4x4 => Some(Self::astc(4, 4)),
            Self::Astc5x4 => Some(Self::astc(5, 4)),
            Self::Astc5x5 => Some(Self::astc(5, 5)),
            Self::Astc6x5 => Some(Self::astc(6, 5)),
            Self::Astc6x6 => Some(Self::astc(6, 6)),
            Self::Astc8x5 => Some(Self::astc(8, 5)),
            Self::Astc8x6 => Some(Self::astc(8, 6)),
            Self::Astc8x8 => Some(Self::astc(8, 8)),
            Self::Astc10x5 => Some(Self::astc(10, 5)),
            Self::Astc10x6 => Some(Self::astc(10, 6)),
            Self::Astc10x8 => Some(Self::astc(10, 8)),
            Self::Astc10x10 => Some(Self::astc(10, 10)),
            Self::Astc12x10 => Some(Self::astc(12, 10)),
            Self::Astc12x12 => Some(Self::astc(12, 12)),
            _ => None,
        }
    }

    const fn astc(width: usize, height: usize) -> SizeRule {
        SizeRule::Blocks {
            width,
            height,
            bytes: 16,
        }
    }

    /// Byte size of one mipmap level at `width` x `height` texels.
    ///
    /// # Errors
    /// Returns an error if the format has no registered size rule.
    pub fn mip_level_size(self, width: u32, height: u32) -> Result<usize> {
        let rule = self.size_rule().ok_or_else(|| Error::UnsupportedPixelFormat {
            format: self.to_string(),
        })?;
        Ok(match rule {
            SizeRule::PackedArea {
                min_width,
                min_height,
                divisor,
            } => (width.max(min_width) as usize * height.max(min_height) as usize) / divisor,
            SizeRule::Blocks {
                width: bw,
                height: bh,
                bytes,
            } => (width as usize).div_ceil(bw) * (height as usize).div_ceil(bh) * bytes,
        })
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Channel data type of the texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum ChannelType {
    #[default]
    UnsignedByteNorm = 0,
    SignedByteNorm = 1,
    UnsignedByte = 2,
    SignedByte = 3,
    UnsignedShortNorm = 4,
    SignedShortNorm = 5,
    UnsignedShort = 6,
    SignedShort = 7,
    UnsignedIntegerNorm = 8,
    SignedIntegerNorm = 9,
    UnsignedInteger = 10,
    SignedInteger = 11,
    SignedFloat = 12,
    UnsignedFloat = 13,
}

impl ChannelType {
    /// Unknown codes fall back to the default, as the container tooling does.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Self::SignedByteNorm,
            2 => Self::UnsignedByte,
            3 => Self::SignedByte,
            4 => Self::UnsignedShortNorm,
            5 => Self::SignedShortNorm,
            6 => Self::UnsignedShort,
            7 => Self::SignedShort,
            8 => Self::UnsignedIntegerNorm,
            9 => Self::SignedIntegerNorm,
            10 => Self::UnsignedInteger,
            11 => Self::SignedInteger,
            12 => Self::SignedFloat,
            13 => Self::UnsignedFloat,
            _ => Self::UnsignedByteNorm,
        }
    }
}

/// Color space of the stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum ColorSpace {
    #[default]
    Linear = 0,
    Srgb = 1,
}

impl ColorSpace {
    pub fn from_code(code: u32) -> Self {
        if code == 1 { Self::Srgb } else { Self::Linear }
    }
}
