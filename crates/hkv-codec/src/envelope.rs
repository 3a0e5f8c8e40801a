//! Framing shared by every codec.
//!
//! On-disk layout of an encoded value:
//! ```text
//! [4 bytes: magic "HKVP"]
//! [1 byte:  envelope version]
//! [1 byte:  payload format tag]
//! [4 bytes: payload length (little-endian u32)]
//! [4 bytes: CRC32 of payload (little-endian u32)]
//! [N bytes: payload]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

/// Magic bytes opening every envelope.
pub const MAGIC: &[u8; 4] = b"HKVP";

/// Current envelope version.
pub const VERSION: u8 = 1;

/// Magic + version + format + length + CRC.
pub const HEADER_SIZE: usize = 14;

/// Serialization format of the payload inside an envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayloadFormat {
    /// Compact binary (`bincode`).
    Bincode,
    /// Self-describing MessagePack (`rmp-serde`), structs as named maps.
    MessagePack,
}

impl PayloadFormat {
    /// Tag byte written into the envelope header.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Bincode => 1,
            Self::MessagePack => 2,
        }
    }

    /// Parse a tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Bincode),
            2 => Some(Self::MessagePack),
            _ => None,
        }
    }
}

impl std::fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bincode => write!(f, "bincode"),
            Self::MessagePack => write!(f, "msgpack"),
        }
    }
}

/// Wrap a serialized payload in an envelope.
pub fn seal(format: PayloadFormat, payload: &[u8]) -> CodecResult<Vec<u8>> {
    let length = u32::try_from(payload.len())
        .map_err(|_| CodecError::Serialize(format!("payload too large: {} bytes", payload.len())))?;
    let crc = crc32fast::hash(payload);

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(MAGIC);
    out.push(VERSION);
    out.push(format.tag());
    out.extend_from_slice(&length.to_le_bytes());
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

/// Validate the header and return the payload format without checking the body.
pub fn peek_format(bytes: &[u8]) -> CodecResult<PayloadFormat> {
    if bytes.len() < HEADER_SIZE {
        return Err(CodecError::Truncated {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        });
    }
    if &bytes[0..4] != MAGIC {
        return Err(CodecError::InvalidMagic {
            expected: String::from_utf8_lossy(MAGIC).into(),
            actual: String::from_utf8_lossy(&bytes[0..4]).into(),
        });
    }
    if bytes[4] != VERSION {
        return Err(CodecError::UnsupportedVersion(bytes[4]));
    }
    PayloadFormat::from_tag(bytes[5]).ok_or(CodecError::UnknownFormat(bytes[5]))
}

/// Validate an envelope written in `expected` format and borrow its payload.
pub fn open(expected: PayloadFormat, bytes: &[u8]) -> CodecResult<&[u8]> {
    let actual = peek_format(bytes)?;
    if actual != expected {
        return Err(CodecError::FormatMismatch { expected, actual });
    }

    let declared = read_u32(&bytes[6..10]) as usize;
    let expected_crc = read_u32(&bytes[10..14]);
    let payload = &bytes[HEADER_SIZE..];
    if payload.len() != declared {
        return Err(CodecError::LengthMismatch {
            declared,
            actual: payload.len(),
        });
    }

    let computed = crc32fast::hash(payload);
    if computed != expected_crc {
        return Err(CodecError::ChecksumMismatch {
            expected: expected_crc,
            computed,
        });
    }
    Ok(payload)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}
