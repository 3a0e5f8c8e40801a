use serde::{Deserialize, Serialize};

use crate::error::{ContainerError, ContainerResult};

/// The kind of node at a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Holds an opaque binary blob.
    Leaf,
    /// Namespace node holding child nodes; has no value of its own.
    Group,
}

impl NodeKind {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf)
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leaf => write!(f, "leaf"),
            Self::Group => write!(f, "group"),
        }
    }
}

/// How a container location is opened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenMode {
    /// Existing location, no mutation.
    ReadOnly,
    /// Existing location, mutable.
    ReadWrite,
    /// Open an existing location or create an empty one.
    #[default]
    Create,
}

impl OpenMode {
    pub fn is_writable(&self) -> bool {
        !matches!(self, Self::ReadOnly)
    }
}

impl std::fmt::Display for OpenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "read-only"),
            Self::ReadWrite => write!(f, "read-write"),
            Self::Create => write!(f, "create"),
        }
    }
}

/// Compression algorithm applied to leaf content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Compression {
    /// Store bytes as given.
    None,
    /// zstd, levels 1 through 22.
    Zstd,
}

/// Storage policy for a leaf.
///
/// Recognized options:
/// - `compression = "none"`: `level` is ignored
/// - `compression = "zstd"`: `level` in `1..=22`
///
/// The default is zstd at level 9.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct StoragePolicy {
    pub compression: Compression,
    pub level: i32,
}

impl StoragePolicy {
    /// Lowest accepted zstd level.
    pub const MIN_ZSTD_LEVEL: i32 = 1;
    /// Highest accepted zstd level.
    pub const MAX_ZSTD_LEVEL: i32 = 22;
    pub const DEFAULT_LEVEL: i32 = 9;

    /// No compression.
    pub const fn stored() -> Self {
        Self {
            compression: Compression::None,
            level: 0,
        }
    }

    /// zstd at `level`.
    pub const fn zstd(level: i32) -> Self {
        Self {
            compression: Compression::Zstd,
            level,
        }
    }

    /// Reject options the container does not recognize.
    pub fn validate(&self) -> ContainerResult<()> {
        match self.compression {
            Compression::None => Ok(()),
            Compression::Zstd => {
                if (Self::MIN_ZSTD_LEVEL..=Self::MAX_ZSTD_LEVEL).contains(&self.level) {
                    Ok(())
                } else {
                    Err(ContainerError::InvalidPolicy(format!(
                        "zstd level {} outside {}..={}",
                        self.level,
                        Self::MIN_ZSTD_LEVEL,
                        Self::MAX_ZSTD_LEVEL
                    )))
                }
            }
        }
    }

    pub(crate) fn compress(&self, data: &[u8]) -> ContainerResult<Vec<u8>> {
        match self.compression {
            Compression::None => Ok(data.to_vec()),
            Compression::Zstd => zstd::encode_all(data, self.level)
                .map_err(|e| ContainerError::Compression(e.to_string())),
        }
    }

    pub(crate) fn decompress(&self, stored: &[u8]) -> ContainerResult<Vec<u8>> {
        match self.compression {
            Compression::None => Ok(stored.to_vec()),
            Compression::Zstd => {
                zstd::decode_all(stored).map_err(|e| ContainerError::Decompression(e.to_string()))
            }
        }
    }
}

impl Default for StoragePolicy {
    fn default() -> Self {
        Self::zstd(Self::DEFAULT_LEVEL)
    }
}

/// Size and policy metadata of a stored leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeafInfo {
    /// Length of the content as written by the caller.
    pub len: u64,
    /// Length after applying the storage policy.
    pub stored_len: u64,
    pub policy: StoragePolicy,
}
