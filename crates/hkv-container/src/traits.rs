use crate::error::ContainerResult;
use crate::node::{LeafInfo, NodeKind, OpenMode, StoragePolicy};

/// Hierarchical container of leaf and group nodes.
///
/// Paths follow [`crate::path`] rules. All implementations must satisfy:
/// - A leaf never has children; a group never has content.
/// - `create_leaf` creates missing intermediate groups and never replaces an
///   existing node.
/// - `delete` of a group removes its whole subtree.
/// - Every operation after `close` fails with `ContainerError::Closed`.
/// - Mutations on a read-only container fail with `ContainerError::ReadOnly`.
/// - All I/O errors are propagated, never silently ignored.
pub trait Container: Send {
    /// Mode the container was opened with.
    fn mode(&self) -> OpenMode;

    /// Kind of the node at `path`, or `None` if nothing is there.
    fn kind_of(&self, path: &str) -> ContainerResult<Option<NodeKind>>;

    /// Create a leaf holding `data`, stored under `policy`.
    fn create_leaf(&mut self, path: &str, data: &[u8], policy: &StoragePolicy)
        -> ContainerResult<()>;

    /// Content of the leaf at `path`.
    ///
    /// Returns `Ok(None)` if the path is absent or a group.
    fn read_leaf(&self, path: &str) -> ContainerResult<Option<Vec<u8>>>;

    /// Size and policy of the leaf at `path`.
    fn leaf_info(&self, path: &str) -> ContainerResult<Option<LeafInfo>>;

    /// Delete the node at `path`, recursively for groups. Returns `true` if
    /// the node existed.
    fn delete(&mut self, path: &str) -> ContainerResult<bool>;

    /// Visit every descendant of the group at `root`.
    ///
    /// The visitor receives each node's path relative to `root` and its kind,
    /// parents before children and siblings in name order. A missing root or a
    /// leaf root visits nothing.
    fn visit(&self, root: &str, visitor: &mut dyn FnMut(&str, NodeKind)) -> ContainerResult<()>;

    /// Persist pending changes to the storage medium.
    fn flush(&mut self) -> ContainerResult<()>;

    /// Flush and release the container. Closing twice is a no-op.
    fn close(&mut self) -> ContainerResult<()>;

    /// Whether `close` has been called.
    fn is_closed(&self) -> bool;

    /// Check whether any node exists at `path`.
    fn exists(&self, path: &str) -> ContainerResult<bool> {
        Ok(self.kind_of(path)?.is_some())
    }
}
