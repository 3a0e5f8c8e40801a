//! File-backed container.
//!
//! [`FileContainer`] loads the whole node tree from a single image file on
//! open and writes it back atomically on [`Container::flush`] and
//! [`Container::close`] when something changed. There is no cross-process
//! locking: two writers on the same file see last-close-wins.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{ContainerError, ContainerResult};
use crate::image;
use crate::memory::MemoryContainer;
use crate::node::{LeafInfo, NodeKind, OpenMode, StoragePolicy};
use crate::traits::Container;
use crate::tree::Tree;

/// A [`Container`] persisted to one image file.
pub struct FileContainer {
    path: PathBuf,
    inner: MemoryContainer,
    dirty: bool,
}

impl FileContainer {
    /// Open the container at `path`.
    ///
    /// `ReadOnly` and `ReadWrite` require the file to exist. `Create` starts
    /// from an empty tree when it does not; the file is written on the first
    /// flush or close.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> ContainerResult<Self> {
        let path = path.as_ref().to_path_buf();
        let (tree, dirty) = if path.exists() {
            (image::read(&path)?, false)
        } else if mode == OpenMode::Create {
            (Tree::new(), true)
        } else {
            return Err(ContainerError::LocationNotFound(path));
        };

        debug!(path = %path.display(), %mode, "opened file container");
        Ok(Self {
            path,
            inner: MemoryContainer::from_tree(tree, mode),
            dirty,
        })
    }

    /// Location of the image file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there are changes not yet written to disk.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl Container for FileContainer {
    fn mode(&self) -> OpenMode {
        self.inner.mode()
    }

    fn kind_of(&self, path: &str) -> ContainerResult<Option<NodeKind>> {
        self.inner.kind_of(path)
    }

    fn create_leaf(
        &mut self,
        path: &str,
        data: &[u8],
        policy: &StoragePolicy,
    ) -> ContainerResult<()> {
        self.inner.create_leaf(path, data, policy)?;
        self.dirty = true;
        Ok(())
    }

    fn read_leaf(&self, path: &str) -> ContainerResult<Option<Vec<u8>>> {
        self.inner.read_leaf(path)
    }

    fn leaf_info(&self, path: &str) -> ContainerResult<Option<LeafInfo>> {
        self.inner.leaf_info(path)
    }

    fn delete(&mut self, path: &str) -> ContainerResult<bool> {
        let removed = self.inner.delete(path)?;
        if removed {
            self.dirty = true;
        }
        Ok(removed)
    }

    fn visit(&self, root: &str, visitor: &mut dyn FnMut(&str, NodeKind)) -> ContainerResult<()> {
        self.inner.visit(root, visitor)
    }

    fn flush(&mut self) -> ContainerResult<()> {
        self.inner.flush()?;
        if !self.dirty || !self.inner.mode().is_writable() {
            return Ok(());
        }
        image::write(&self.path, self.inner.tree())?;
        self.dirty = false;
        Ok(())
    }

    fn close(&mut self) -> ContainerResult<()> {
        if self.inner.is_closed() {
            return Ok(());
        }
        let flushed = self.flush();
        self.inner.close()?;
        if let Err(e) = &flushed {
            warn!(path = %self.path.display(), error = %e, "flush on close failed");
        }
        flushed
    }

    fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

impl std::fmt::Debug for FileContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileContainer")
            .field("path", &self.path)
            .field("mode", &self.inner.mode())
            .field("dirty", &self.dirty)
            .finish()
    }
}
