//! PVR compressed-texture containers.
//!
//! Parses the container header (PVR3 in either byte order, legacy V2,
//! legacy V1), the trailing metadata blocks, and computes per-mipmap byte
//! ranges for the block-compressed pixel formats. Pixel data is never
//! decoded here - decompression belongs to the external transcoder.

mod batch;
mod header;
mod metadata;
mod mipmap;
mod pixel_format;

use std::path::Path;

use crate::error::{Error, Result};

pub use batch::{find_pvr_files, parse_batch};
pub use header::{
    HeaderVersion, LEGACY_V2_MAGIC, PVR3_MAGIC, PVR3_MAGIC_SWAPPED, PvrHeader,
};
pub use metadata::MetadataBlock;
pub use mipmap::MipmapRange;
pub use pixel_format::{ChannelType, ColorSpace, PixelFormat};

/// A parsed texture container: header, metadata, and the compressed
/// payload (undecoded).
#[derive(Debug, Clone)]
pub struct PvrTexture {
    pub header: PvrHeader,
    pub metadata: Vec<MetadataBlock>,
    payload: Vec<u8>,
}

impl PvrTexture {
    /// Parse a container from raw file bytes.
    ///
    /// # Errors
    /// Returns an error if the data is too short for the detected header
    /// generation or a legacy V2 magic check fails.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = header::parse_header(data)?;

        let metadata = if header.metadata_size > 0 {
            let start = header::PVR3_HEADER_SIZE;
            let end = (start + header.metadata_size as usize).min(data.len());
            metadata::parse_metadata(&data[start..end])
        } else {
            Vec::new()
        };

        let payload_start = header.data_offset().min(data.len());
        let payload = data[payload_start..].to_vec();

        if header.is_heuristic_parse() {
            tracing::debug!(
                width = header.width,
                height = header.height,
                "no container magic found; parsed as legacy V1"
            );
        }

        Ok(Self {
            header,
            metadata,
            payload,
        })
    }

    /// Parse a container from a file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::parse(&data)
    }

    /// The undecoded compressed payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Byte ranges of every mipmap level within the payload, level 0 first.
    ///
    /// # Errors
    /// Returns an error if the pixel format has no size rule or a level
    /// runs past the payload.
    pub fn mipmaps(&self) -> Result<Vec<MipmapRange>> {
        mipmap::extract_mipmaps(&self.header, self.payload.len())
    }

    /// The payload bytes of one mipmap level.
    ///
    /// # Errors
    /// Returns an error if the range does not lie inside the payload.
    pub fn mipmap_data(&self, range: &MipmapRange) -> Result<&[u8]> {
        let end = range.offset + range.length;
        if end > self.payload.len() {
            return Err(Error::MipmapOutOfRange {
                level: range.level,
                end,
                len: self.payload.len(),
            });
        }
        Ok(&self.payload[range.offset..end])
    }
}
