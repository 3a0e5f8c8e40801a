use std::path::{Path, PathBuf};

use hkv_container::{OpenMode, StoragePolicy};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Namespace used when none is configured.
pub const DEFAULT_PREFIX: &str = "pickled";

/// Construction parameters for a [`crate::Store`].
///
/// A missing `location` yields a null store whose operations all no-op.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub location: Option<PathBuf>,
    pub mode: OpenMode,
    pub prefix: String,
    pub policy: StoragePolicy,
}

impl StoreConfig {
    /// Config for a file-backed store with defaults for everything else.
    pub fn at(location: impl Into<PathBuf>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_policy(mut self, policy: StoragePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            location: None,
            mode: OpenMode::Create,
            prefix: DEFAULT_PREFIX.to_string(),
            policy: StoragePolicy::default(),
        }
    }
}
