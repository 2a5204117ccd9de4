//! PVR3 trailing metadata blocks.

use byteorder::{ByteOrder, LittleEndian};

/// One metadata record: a 12-byte `(fourcc, key, size)` header followed by
/// `size` bytes of opaque payload.
#[derive(Debug, Clone)]
pub struct MetadataBlock {
    pub fourcc: u32,
    pub key: u32,
    pub data: Vec<u8>,
}

impl MetadataBlock {
    /// Well-known key names for the standard fourcc.
    pub fn key_name(&self) -> Option<&'static str> {
        match self.key {
            0 => Some("TextureAtlas"),
            1 => Some("NormalMap"),
            2 => Some("CubeMap"),
            3 => Some("Orientation"),
            4 => Some("Border"),
            5 => Some("Padding"),
            _ => None,
        }
    }
}

/// Parse the metadata region. A record whose declared size would read past
/// the end of the region stops parsing early, without error.
pub(super) fn parse_metadata(data: &[u8]) -> Vec<MetadataBlock> {
    let mut blocks = Vec::new();
    let mut offset = 0;
    while offset + 12 <= data.len() {
        let fourcc = LittleEndian::read_u32(&data[offset..offset + 4]);
        let key = LittleEndian::read_u32(&data[offset + 4..offset + 8]);
        let size = LittleEndian::read_u32(&data[offset + 8..offset + 12]) as usize;
        offset += 12;
        if offset + size > data.len() {
            break;
        }
        blocks.push(MetadataBlock {
            fourcc,
            key,
            data: data[offset..offset + size].to_vec(),
        });
        offset += size;
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fourcc: u32, key: u32, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&fourcc.to_le_bytes());
        out.extend_from_slice(&key.to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn parses_consecutive_records() {
        let mut data = record(0x03525650, 3, &[0, 1, 0, 0]);
        data.extend(record(0x03525650, 1, &[]));
        let blocks = parse_metadata(&data);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].key_name(), Some("Orientation"));
        assert_eq!(blocks[0].data, vec![0, 1, 0, 0]);
        assert_eq!(blocks[1].key_name(), Some("NormalMap"));
        assert!(blocks[1].data.is_empty());
    }

    #[test]
    fn overrunning_record_stops_parsing_without_error() {
        let mut data = record(0x03525650, 4, &[9, 9]);
        // second record claims 100 payload bytes that are not there
        data.extend_from_slice(&0x03525650u32.to_le_bytes());
        data.extend_from_slice(&5u32.to_le_bytes());
        data.extend_from_slice(&100u32.to_le_bytes());
        let blocks = parse_metadata(&data);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].key, 4);
    }

    #[test]
    fn trailing_partial_header_is_ignored() {
        let mut data = record(1, 0, &[1]);
        data.extend_from_slice(&[0u8; 7]);
        assert_eq!(parse_metadata(&data).len(), 1);
    }
}
