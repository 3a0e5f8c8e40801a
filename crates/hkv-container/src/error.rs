//! Error types for container operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while opening or operating on a container.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The backing location does not exist and the open mode cannot create it.
    #[error("container location not found: {}", .0.display())]
    LocationNotFound(PathBuf),

    /// The node path is malformed.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// A node already occupies the path.
    #[error("node already exists: {path}")]
    AlreadyExists { path: String },

    /// An intermediate path segment is a leaf, so it cannot hold children.
    #[error("not a group: {path}")]
    NotAGroup { path: String },

    /// The container was opened read-only.
    #[error("container is read-only")]
    ReadOnly,

    /// The container has been closed.
    #[error("container is closed")]
    Closed,

    /// The storage policy is not supported.
    #[error("invalid storage policy: {0}")]
    InvalidPolicy(String),

    #[error("compression failed: {0}")]
    Compression(String),

    #[error("decompression failed: {0}")]
    Decompression(String),

    /// The container image is malformed.
    #[error("corrupt container image: {0}")]
    Format(String),

    #[error("unsupported container image version: {0}")]
    UnsupportedVersion(u32),

    /// Image checksum does not match its contents.
    #[error("container image checksum mismatch")]
    ChecksumMismatch,

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage medium.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;
