//! Single-file container image.
//!
//! On-disk format:
//! ```text
//! [4 bytes:  magic "HKVC"]
//! [4 bytes:  version (big-endian u32)]
//! [N bytes:  bincode-serialized node tree]
//! [32 bytes: BLAKE3 of everything above]
//! ```

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::{ContainerError, ContainerResult};
use crate::tree::Tree;

const MAGIC: &[u8; 4] = b"HKVC";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 8;
const CHECKSUM_SIZE: usize = 32;

pub(crate) fn to_bytes(tree: &Tree) -> ContainerResult<Vec<u8>> {
    let body = bincode::serialize(tree).map_err(|e| ContainerError::Serialization(e.to_string()))?;

    let mut out = Vec::with_capacity(HEADER_SIZE + body.len() + CHECKSUM_SIZE);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_be_bytes());
    out.extend_from_slice(&body);

    let checksum = *blake3::hash(&out).as_bytes();
    out.extend_from_slice(&checksum);
    Ok(out)
}

pub(crate) fn from_bytes(data: &[u8]) -> ContainerResult<Tree> {
    if data.len() < HEADER_SIZE + CHECKSUM_SIZE {
        return Err(ContainerError::Format(format!(
            "image too short: {} bytes",
            data.len()
        )));
    }
    if &data[0..4] != MAGIC {
        return Err(ContainerError::Format(format!(
            "invalid magic: expected {}, got {}",
            String::from_utf8_lossy(MAGIC),
            String::from_utf8_lossy(&data[0..4])
        )));
    }
    let mut version = [0u8; 4];
    version.copy_from_slice(&data[4..8]);
    let version = u32::from_be_bytes(version);
    if version != VERSION {
        return Err(ContainerError::UnsupportedVersion(version));
    }

    let (content, trailer) = data.split_at(data.len() - CHECKSUM_SIZE);
    if blake3::hash(content).as_bytes() != trailer {
        return Err(ContainerError::ChecksumMismatch);
    }

    bincode::deserialize(&content[HEADER_SIZE..])
        .map_err(|e| ContainerError::Serialization(e.to_string()))
}

pub(crate) fn read(path: &Path) -> ContainerResult<Tree> {
    let data = std::fs::read(path)?;
    let tree = from_bytes(&data)?;
    debug!(path = %path.display(), bytes = data.len(), "loaded container image");
    Ok(tree)
}

/// Write the image atomically: temp file in the same directory, fsync, rename.
pub(crate) fn write(path: &Path, tree: &Tree) -> ContainerResult<()> {
    let bytes = to_bytes(tree)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), bytes = bytes.len(), "wrote container image");
    Ok(())
}
