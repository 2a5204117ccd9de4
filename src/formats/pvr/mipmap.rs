//! Mipmap byte-range computation.

use crate::error::{Error, Result};

use super::header::PvrHeader;

/// Byte range of one mipmap level within the compressed payload.
///
/// Level 0 is the largest; levels are laid out contiguously with 4-byte
/// padding between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipmapRange {
    pub level: usize,
    pub width: u32,
    pub height: u32,
    pub offset: usize,
    pub length: usize,
}

/// Compute the byte range of every mipmap level declared by `header`.
///
/// `payload_len` is the length of the compressed payload the ranges must
/// fit inside.
///
/// # Errors
/// Returns an error if the pixel format is unknown or has no size rule, or
/// if a level's range runs past the payload.
pub(super) fn extract_mipmaps(header: &PvrHeader, payload_len: usize) -> Result<Vec<MipmapRange>> {
    let format = header.pixel_format.ok_or_else(|| Error::UnsupportedPixelFormat {
        format: format!(
            "unknown (raw pair {:#x}/{:#x})",
            header.pixel_format_pair.0, header.pixel_format_pair.1
        ),
    })?;

    let mut ranges = Vec::with_capacity(header.mipmap_count as usize);
    let mut offset = 0usize;

    for level in 0..header.mipmap_count as usize {
        let width = (header.width >> level).max(1);
        let height = (header.height >> level).max(1);
        let length = format.mip_level_size(width, height)?;

        if offset + length > payload_len {
            return Err(Error::MipmapOutOfRange {
                level,
                end: offset + length,
                len: payload_len,
            });
        }

        ranges.push(MipmapRange {
            level,
            width,
            height,
            offset,
            length,
        });

        // levels are 4-byte aligned relative to each other
        offset += length + (4 - length % 4) % 4;
    }

    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::super::header::{HeaderVersion, PvrHeader};
    use super::super::pixel_format::{ChannelType, ColorSpace, PixelFormat};
    use super::*;

    fn header(format: Option<PixelFormat>, width: u32, height: u32, mips: u32) -> PvrHeader {
        PvrHeader {
            version: HeaderVersion::Pvr3,
            flags: 0,
            pixel_format: format,
            pixel_format_pair: (format.map_or(99, |f| f as u32), 0),
            channel_type: ChannelType::default(),
            color_space: ColorSpace::default(),
            width,
            height,
            depth: 1,
            num_surfaces: 1,
            num_faces: 1,
            mipmap_count: mips,
            metadata_size: 0,
            data_offset: 52,
        }
    }

    #[test]
    fn etc1_chain_halves_dimensions_and_pads_between_levels() {
        let h = header(Some(PixelFormat::Etc1), 10, 10, 3);
        let ranges = extract_mipmaps(&h, 4096).unwrap();
        // 10x10 -> 3x3 blocks = 72 bytes, 5x5 -> 2x2 blocks = 32, 2x2 -> 1 block = 8
        assert_eq!(
            ranges,
            vec![
                MipmapRange { level: 0, width: 10, height: 10, offset: 0, length: 72 },
                MipmapRange { level: 1, width: 5, height: 5, offset: 72, length: 32 },
                MipmapRange { level: 2, width: 2, height: 2, offset: 104, length: 8 },
            ]
        );
    }

    #[test]
    fn cursor_advances_past_each_level() {
        let h = header(Some(PixelFormat::Dxt5), 4, 4, 2);
        let ranges = extract_mipmaps(&h, 64).unwrap();
        assert_eq!(ranges[0].length, 16);
        assert_eq!(ranges[1].offset, 16);
        assert_eq!(ranges[1].length, 16);
    }

    #[test]
    fn dimensions_never_drop_below_one() {
        let h = header(Some(PixelFormat::Etc1), 8, 2, 4);
        let ranges = extract_mipmaps(&h, 4096).unwrap();
        assert_eq!((ranges[2].width, ranges[2].height), (2, 1));
        assert_eq!((ranges[3].width, ranges[3].height), (1, 1));
    }

    #[test]
    fn unknown_format_is_an_error() {
        let h = header(None, 8, 8, 1);
        assert!(matches!(
            extract_mipmaps(&h, 4096),
            Err(Error::UnsupportedPixelFormat { .. })
        ));
    }

    #[test]
    fn truncated_payload_is_an_error() {
        let h = header(Some(PixelFormat::Etc1), 16, 16, 1);
        assert!(matches!(
            extract_mipmaps(&h, 100),
            Err(Error::MipmapOutOfRange { level: 0, .. })
        ));
    }
}
