use hkv_codec::CodecError;
use hkv_container::ContainerError;

/// Errors from store operations.
///
/// Expected outcomes (absent key, group in the way, overwrite refused, null
/// store) are reported through return values, not through this type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A stored payload exists but cannot be decoded (corruption, truncation,
    /// or written by an incompatible codec).
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Failure of the underlying container or storage medium.
    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    /// The namespace prefix cannot be used as a container path.
    #[error("invalid prefix {prefix:?}: {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    /// The store configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
