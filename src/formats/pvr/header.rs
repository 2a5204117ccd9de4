//! PVR container header parsing.
//!
//! Three header generations are auto-detected from the leading magic word:
//! the modern PVR3 52-byte header (either byte order), the legacy V2
//! 52-byte header, and the legacy V1 44-byte header. V1 carries no magic at
//! all, so it is the unconditional fallback - any unrecognized input of at
//! least 44 bytes parses as V1. That ambiguity is inherited from the legacy
//! tooling and kept for asset compatibility; [`PvrHeader::is_heuristic_parse`]
//! flags it.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Error, Result};

use super::pixel_format::{ChannelType, ColorSpace, PixelFormat};

/// `PVR\x03` in file order.
pub const PVR3_MAGIC: u32 = 0x03525650;
/// `PVR\x03` byte-swapped: the file was written big-endian.
pub const PVR3_MAGIC_SWAPPED: u32 = 0x50565203;
/// `PVR!`, stored in the legacy V2 header's trailing magic word.
pub const LEGACY_V2_MAGIC: u32 = 0x21525650;

pub const PVR3_HEADER_SIZE: usize = 52;
pub const LEGACY_V2_HEADER_SIZE: usize = 52;
pub const LEGACY_V1_HEADER_SIZE: usize = 44;

/// Which header generation a container was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderVersion {
    Pvr3,
    LegacyV2,
    LegacyV1,
}

/// Parsed container header. Immutable once parsed; width, height, and
/// mipmap count drive all mipmap-size computation.
#[derive(Debug, Clone)]
pub struct PvrHeader {
    pub version: HeaderVersion,
    pub flags: u32,
    /// Enumerated format when known; `None` is "format unknown".
    pub pixel_format: Option<PixelFormat>,
    /// Raw (low, high) pixel-format pair as stored in the header.
    pub pixel_format_pair: (u32, u32),
    pub channel_type: ChannelType,
    pub color_space: ColorSpace,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub num_surfaces: u32,
    pub num_faces: u32,
    pub mipmap_count: u32,
    pub metadata_size: u32,
    /// Byte offset of the compressed payload (header + metadata).
    pub(super) data_offset: usize,
}

impl PvrHeader {
    /// True when the header was accepted through the magic-less legacy V1
    /// fallback and may be a misparse of an unrelated file.
    pub fn is_heuristic_parse(&self) -> bool {
        self.version == HeaderVersion::LegacyV1
    }

    pub fn data_offset(&self) -> usize {
        self.data_offset
    }
}

/// Detect the header generation and parse it.
pub(super) fn parse_header(data: &[u8]) -> Result<PvrHeader> {
    if data.len() < 4 {
        return Err(Error::PvrHeaderTooShort {
            expected: 4,
            actual: data.len(),
        });
    }

    match LittleEndian::read_u32(&data[0..4]) {
        PVR3_MAGIC => parse_pvr3::<LittleEndian>(data),
        PVR3_MAGIC_SWAPPED => parse_pvr3::<BigEndian>(data),
        LEGACY_V2_MAGIC => parse_legacy_v2(data),
        _ => parse_legacy_v1(data),
    }
}

fn read_words<E: ByteOrder, const N: usize>(data: &[u8]) -> [u32; N] {
    let mut words = [0u32; N];
    for (i, w) in words.iter_mut().enumerate() {
        *w = E::read_u32(&data[i * 4..i * 4 + 4]);
    }
    words
}

fn parse_pvr3<E: ByteOrder>(data: &[u8]) -> Result<PvrHeader> {
    if data.len() < PVR3_HEADER_SIZE {
        return Err(Error::PvrHeaderTooShort {
            expected: PVR3_HEADER_SIZE,
            actual: data.len(),
        });
    }
    let [_version, flags, pf_low, pf_high, color_space, channel_type, height, width, depth, num_surfaces, num_faces, mipmap_count, metadata_size] =
        read_words::<E, 13>(data);

    let pixel_format = if pf_high == 0 {
        PixelFormat::from_code(pf_low)
    } else {
        // high word nonzero: per-channel layout, not an enumerated format
        None
    };

    Ok(PvrHeader {
        version: HeaderVersion::Pvr3,
        flags,
        pixel_format,
        pixel_format_pair: (pf_low, pf_high),
        channel_type: ChannelType::from_code(channel_type),
        color_space: ColorSpace::from_code(color_space),
        width,
        height,
        depth,
        num_surfaces,
        num_faces,
        mipmap_count,
        metadata_size,
        data_offset: PVR3_HEADER_SIZE + metadata_size as usize,
    })
}

fn parse_legacy_v2(data: &[u8]) -> Result<PvrHeader> {
    if data.len() < LEGACY_V2_HEADER_SIZE {
        return Err(Error::PvrHeaderTooShort {
            expected: LEGACY_V2_HEADER_SIZE,
            actual: data.len(),
        });
    }
    let [_header_size, height, width, mipmap_count, pf_and_flags, _data_size, _bit_count, _red_mask, _green_mask, _blue_mask, _alpha_mask, magic, num_surfaces] =
        read_words::<LittleEndian, 13>(data);

    if magic != LEGACY_V2_MAGIC {
        return Err(Error::InvalidLegacyPvrMagic);
    }

    Ok(PvrHeader {
        version: HeaderVersion::LegacyV2,
        flags: pf_and_flags,
        pixel_format: PixelFormat::from_legacy_code(pf_and_flags),
        pixel_format_pair: (pf_and_flags, 0),
        channel_type: ChannelType::default(),
        color_space: ColorSpace::default(),
        width,
        height,
        depth: 1,
        num_surfaces,
        num_faces: 1,
        mipmap_count,
        metadata_size: 0,
        data_offset: LEGACY_V2_HEADER_SIZE,
    })
}

fn parse_legacy_v1(data: &[u8]) -> Result<PvrHeader> {
    if data.len() < LEGACY_V1_HEADER_SIZE {
        return Err(Error::PvrHeaderTooShort {
            expected: LEGACY_V1_HEADER_SIZE,
            actual: data.len(),
        });
    }
    let [_header_size, height, width, mipmap_count, pf_and_flags, _data_size, _bit_count, _red_mask, _green_mask, _blue_mask, _alpha_mask] =
        read_words::<LittleEndian, 11>(data);

    Ok(PvrHeader {
        version: HeaderVersion::LegacyV1,
        flags: pf_and_flags,
        pixel_format: PixelFormat::from_legacy_code(pf_and_flags),
        pixel_format_pair: (pf_and_flags, 0),
        channel_type: ChannelType::default(),
        color_space: ColorSpace::default(),
        width,
        height,
        depth: 1,
        num_surfaces: 1,
        num_faces: 1,
        mipmap_count,
        metadata_size: 0,
        data_offset: LEGACY_V1_HEADER_SIZE,
    })
}
