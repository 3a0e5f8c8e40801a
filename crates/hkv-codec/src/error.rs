use thiserror::Error;

use crate::envelope::PayloadFormat;

/// Errors from encoding or decoding a stored value.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(String),

    /// The payload could not be deserialized into the requested type.
    #[error("deserialization failed: {0}")]
    Deserialize(String),

    /// The byte sequence is shorter than its framing requires.
    #[error("truncated payload: need at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// The envelope does not start with the expected magic bytes.
    #[error("invalid envelope magic: expected {expected}, got {actual}")]
    InvalidMagic { expected: String, actual: String },

    /// The envelope was produced by an incompatible codec version.
    #[error("unsupported envelope version: {0}")]
    UnsupportedVersion(u8),

    /// The format tag is not one this crate knows.
    #[error("unknown payload format tag: {0}")]
    UnknownFormat(u8),

    /// The payload was written by a different codec.
    #[error("payload format mismatch: expected {expected}, got {actual}")]
    FormatMismatch {
        expected: PayloadFormat,
        actual: PayloadFormat,
    },

    /// Declared payload length disagrees with the bytes present.
    #[error("payload length mismatch: header says {declared}, found {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// CRC32 of the payload does not match the header (data corruption).
    #[error("payload checksum mismatch: expected {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { expected: u32, computed: u32 },
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
