//! Error types for `MacPVR`

use thiserror::Error;

/// The error type for `MacPVR` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== PVR Container Errors ====================
    /// The data is too short to hold the detected header generation.
    #[error("PVR header too short: need {expected} bytes, have {actual}")]
    PvrHeaderTooShort {
        /// Bytes required by the detected header generation.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// The legacy V2 header's trailing magic word does not match.
    #[error("invalid legacy PVR magic")]
    InvalidLegacyPvrMagic,

    /// The pixel format has no known mipmap size rule.
    #[error("unsupported pixel format: {format}")]
    UnsupportedPixelFormat {
        /// The format name or raw code.
        format: String,
    },

    /// The compressed payload ends before the declared mipmap chain does.
    #[error("mipmap level {level} overruns payload: needs {end} bytes, have {len}")]
    MipmapOutOfRange {
        /// The mipmap level being extracted.
        level: usize,
        /// Byte offset one past the level's end.
        end: usize,
        /// Payload length in bytes.
        len: usize,
    },

    // ==================== Vertex Layout Errors ====================
    /// A vertex semantic was registered twice on the same mesh.
    #[error("vertex semantic already registered: {semantic}")]
    DuplicateVertexSemantic {
        /// The duplicated semantic name.
        semantic: String,
    },

    /// The vertex component type code is not in the known enumeration.
    #[error("unsupported vertex data type: {type_code}")]
    UnsupportedVertexType {
        /// The raw type code from the vertex declaration.
        type_code: u32,
    },

    /// The component type cannot be decoded to scalar values (packed color).
    #[error("vertex data type {type_name} has no scalar decode rule")]
    UndecodableVertexType {
        /// Name of the packed type.
        type_name: &'static str,
    },

    /// A vertex element declared a component count outside 1..=4.
    #[error("invalid component count for {semantic}: {count} (must be 1-4)")]
    InvalidComponentCount {
        /// The semantic being registered.
        semantic: String,
        /// The declared count.
        count: usize,
    },

    /// The raw vertex buffer length does not match the declared stride.
    #[error("vertex buffer for {semantic} is {buffer_len} bytes, not divisible by stride {stride}")]
    VertexLayoutMismatch {
        /// The semantic being decoded.
        semantic: String,
        /// Raw buffer length in bytes.
        buffer_len: usize,
        /// Declared interleaved stride in bytes.
        stride: usize,
    },

    /// A vertex read would run past the end of the raw buffer.
    #[error("vertex {vertex} of {semantic} reads past buffer end (offset {offset})")]
    VertexOutOfRange {
        /// The semantic being decoded.
        semantic: String,
        /// The vertex index whose read overran.
        vertex: usize,
        /// Byte offset of the failed read.
        offset: usize,
    },

    /// More than four bone weights were declared for a vertex.
    #[error("{semantic} has {count} components per vertex; at most 4 weights are supported")]
    WeightCountExceeded {
        /// The semantic being decoded.
        semantic: String,
        /// The declared component count.
        count: usize,
    },

    // ==================== Scene / Translation Errors ====================
    /// The mesh has no POSITION element (required for the shared buffer view).
    #[error("mesh {mesh_index} has no POSITION element")]
    MeshMissingPositions {
        /// Index of the mesh in the scene.
        mesh_index: usize,
    },

    /// The mesh references a vertex data buffer that was never added.
    #[error("mesh {mesh_index} references missing vertex data buffer {data_index}")]
    MissingVertexData {
        /// Index of the mesh in the scene.
        mesh_index: usize,
        /// The missing raw-buffer index.
        data_index: usize,
    },

    // ==================== glTF Document Errors ====================
    /// A document cross-reference points past the end of its target array.
    #[error("glTF {array} index {index} out of range (length {len})")]
    GraphIndexOutOfRange {
        /// Name of the referenced array (accessors, nodes, ...).
        array: &'static str,
        /// The out-of-range index.
        index: usize,
        /// Current length of the referenced array.
        len: usize,
    },

    /// Failed to serialize the glTF JSON chunk.
    #[error("glTF JSON serialization failed: {message}")]
    GltfSerializationFailed {
        /// The serialization error message.
        message: String,
    },

    // ==================== Parsing Errors ====================
    /// XML parsing error from a sidecar material descriptor.
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::DeError),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),

    /// Unexpected end of file.
    #[error("unexpected end of file")]
    UnexpectedEof,
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `MacPVR` operations.
pub type Result<T> = std::result::Result<T, Error>;
