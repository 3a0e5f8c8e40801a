//! Hierarchical containers for the HKV namespaced store.
//!
//! A container holds two kinds of node addressed by `/`-separated paths:
//! leaves, which carry an opaque byte blob, and groups, which only carry
//! children. The store above never interprets leaf contents.
//!
//! # Modules
//!
//! - [`traits`] -- the [`Container`] trait every backend implements
//! - [`node`] -- [`NodeKind`], [`OpenMode`] and the leaf [`StoragePolicy`]
//! - [`path`] -- path normalization and validation
//! - [`memory`] -- [`MemoryContainer`] for tests and ephemeral use
//! - [`file`] -- [`FileContainer`], a single-file persistent image
//!
//! # Design Rules
//!
//! 1. Leaf content is compressed according to the policy it was written with
//!    and decompressed transparently on read.
//! 2. Creating a leaf never replaces a node; callers delete first.
//! 3. Deleting a group deletes its subtree.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
mod image;
pub mod memory;
pub mod node;
pub mod path;
pub mod traits;
mod tree;

pub use error::{ContainerError, ContainerResult};
pub use file::FileContainer;
pub use memory::MemoryContainer;
pub use node::{Compression, LeafInfo, NodeKind, OpenMode, StoragePolicy};
pub use traits::Container;
