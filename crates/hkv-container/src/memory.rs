//! In-memory container for tests and ephemeral stores.

use crate::error::{ContainerError, ContainerResult};
use crate::node::{LeafInfo, NodeKind, OpenMode, StoragePolicy};
use crate::path;
use crate::traits::Container;
use crate::tree::{Leaf, Tree};

/// A [`Container`] whose nodes live entirely in process memory.
///
/// Data is lost when the container is dropped. [`crate::FileContainer`]
/// wraps one of these and persists it.
pub struct MemoryContainer {
    tree: Tree,
    mode: OpenMode,
    closed: bool,
}

impl MemoryContainer {
    /// Create a new empty, writable container.
    pub fn new() -> Self {
        Self::from_tree(Tree::new(), OpenMode::Create)
    }

    /// Create an empty container with the given mode.
    pub fn with_mode(mode: OpenMode) -> Self {
        Self::from_tree(Tree::new(), mode)
    }

    pub(crate) fn from_tree(tree: Tree, mode: OpenMode) -> Self {
        Self {
            tree,
            mode,
            closed: false,
        }
    }

    pub(crate) fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Total number of nodes, groups included.
    pub fn node_count(&self) -> usize {
        self.tree.node_count()
    }

    fn check_open(&self) -> ContainerResult<()> {
        if self.closed {
            return Err(ContainerError::Closed);
        }
        Ok(())
    }

    fn check_writable(&self) -> ContainerResult<()> {
        self.check_open()?;
        if !self.mode.is_writable() {
            return Err(ContainerError::ReadOnly);
        }
        Ok(())
    }
}

impl Default for MemoryContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for MemoryContainer {
    fn mode(&self) -> OpenMode {
        self.mode
    }

    fn kind_of(&self, path: &str) -> ContainerResult<Option<NodeKind>> {
        self.check_open()?;
        Ok(self.tree.kind_of(&path::segments(path)?))
    }

    fn create_leaf(
        &mut self,
        path: &str,
        data: &[u8],
        policy: &StoragePolicy,
    ) -> ContainerResult<()> {
        self.check_writable()?;
        let segs = path::segments(path)?;
        let leaf = Leaf::encode(data, *policy)?;
        self.tree.insert_leaf(&segs, leaf)
    }

    fn read_leaf(&self, path: &str) -> ContainerResult<Option<Vec<u8>>> {
        self.check_open()?;
        match self.tree.leaf(&path::segments(path)?) {
            Some(leaf) => Ok(Some(leaf.decode()?)),
            None => Ok(None),
        }
    }

    fn leaf_info(&self, path: &str) -> ContainerResult<Option<LeafInfo>> {
        self.check_open()?;
        Ok(self.tree.leaf(&path::segments(path)?).map(Leaf::info))
    }

    fn delete(&mut self, path: &str) -> ContainerResult<bool> {
        self.check_writable()?;
        self.tree.remove(&path::segments(path)?)
    }

    fn visit(&self, root: &str, visitor: &mut dyn FnMut(&str, NodeKind)) -> ContainerResult<()> {
        self.check_open()?;
        self.tree.visit(&path::segments(root)?, visitor);
        Ok(())
    }

    fn flush(&mut self) -> ContainerResult<()> {
        self.check_open()
    }

    fn close(&mut self) -> ContainerResult<()> {
        self.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl std::fmt::Debug for MemoryContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryContainer")
            .field("mode", &self.mode)
            .field("node_count", &self.tree.node_count())
            .field("closed", &self.closed)
            .finish()
    }
}
