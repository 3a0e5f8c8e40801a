//! Namespaced key-value storage of serialized values.
//!
//! [`Store`] maps string keys to leaves of a hierarchical container under a
//! fixed prefix (`"pickled"` by default) and stores any `serde` value there
//! through a codec. Keys with `/` separators become nested groups.
//!
//! The default codec is [`MessagePackCodec`], which is self-describing: any
//! value that serializes can be read back, schema-less ones included.
//! [`BincodeCodec`] is more compact but needs the exact written type on read.
//!
//! # Result shapes
//!
//! | Operation      | Absent      | Value           | Group           |
//! |----------------|-------------|-----------------|-----------------|
//! | `contains`     | `Absent`    | `Leaf`          | `Group`         |
//! | `get`          | `None`      | `Some(value)`   | `None`          |
//! | `remove`       | `false`     | `true`          | `false` unless allowed |
//! | `add`          | `true`      | `true` unless overwrite is off | `false` unless allowed |
//!
//! A null store (no location) and a closed store answer as if every key were
//! absent and refuse every write. Only undecodable payloads and container
//! failures are errors.
//!
//! # Example
//!
//! ```
//! use hkv_container::MemoryContainer;
//! use hkv_store::{AddOptions, Presence, Store};
//!
//! let mut store = Store::with_container(MemoryContainer::new(), "pickled").unwrap();
//! assert!(store.add("/frames/a", &vec![1.0f64, 2.0]).unwrap());
//! assert_eq!(store.contains("/frames").unwrap(), Presence::Group);
//! assert!(!store.add_with("/frames/a", &vec![0.0f64], AddOptions::default().overwrite(false)).unwrap());
//! assert_eq!(store.get::<Vec<f64>>("/frames/a").unwrap(), Some(vec![1.0, 2.0]));
//! assert_eq!(store.list_keys().unwrap(), vec!["/frames/a".to_string()]);
//! ```

pub mod config;
pub mod error;
pub mod options;
pub mod store;

pub use config::{StoreConfig, DEFAULT_PREFIX};
pub use error::{StoreError, StoreResult};
pub use options::{AddOptions, Presence};
pub use store::Store;

// Collaborator types callers need to configure a store.
pub use hkv_codec::{BincodeCodec, Codec, MessagePackCodec};
pub use hkv_container::{Compression, Container, OpenMode, StoragePolicy};
