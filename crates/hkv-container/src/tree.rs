//! In-memory node tree shared by the container backends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ContainerError, ContainerResult};
use crate::node::{LeafInfo, NodeKind, StoragePolicy};
use crate::path;

/// Leaf content after the storage policy has been applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Leaf {
    pub policy: StoragePolicy,
    pub len: u64,
    pub stored: Vec<u8>,
}

impl Leaf {
    pub fn encode(data: &[u8], policy: StoragePolicy) -> ContainerResult<Self> {
        policy.validate()?;
        Ok(Self {
            policy,
            len: data.len() as u64,
            stored: policy.compress(data)?,
        })
    }

    pub fn decode(&self) -> ContainerResult<Vec<u8>> {
        let data = self.policy.decompress(&self.stored)?;
        if data.len() as u64 != self.len {
            return Err(ContainerError::Decompression(format!(
                "size mismatch: expected {}, got {}",
                self.len,
                data.len()
            )));
        }
        Ok(data)
    }

    pub fn info(&self) -> LeafInfo {
        LeafInfo {
            len: self.len,
            stored_len: self.stored.len() as u64,
            policy: self.policy,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Node {
    Group(BTreeMap<String, Node>),
    Leaf(Leaf),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Group(_) => NodeKind::Group,
            Self::Leaf(_) => NodeKind::Leaf,
        }
    }
}

/// Children of the implicit root group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Tree {
    root: BTreeMap<String, Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kind of the node at `segs`; the empty path is the root group.
    pub fn kind_of(&self, segs: &[&str]) -> Option<NodeKind> {
        if segs.is_empty() {
            return Some(NodeKind::Group);
        }
        self.node(segs).map(Node::kind)
    }

    pub fn leaf(&self, segs: &[&str]) -> Option<&Leaf> {
        match self.node(segs)? {
            Node::Leaf(leaf) => Some(leaf),
            Node::Group(_) => None,
        }
    }

    fn node(&self, segs: &[&str]) -> Option<&Node> {
        let (first, rest) = segs.split_first()?;
        let mut node = self.root.get(*first)?;
        for seg in rest {
            node = match node {
                Node::Group(children) => children.get(*seg)?,
                Node::Leaf(_) => return None,
            };
        }
        Some(node)
    }

    fn children(&self, segs: &[&str]) -> Option<&BTreeMap<String, Node>> {
        if segs.is_empty() {
            return Some(&self.root);
        }
        match self.node(segs)? {
            Node::Group(children) => Some(children),
            Node::Leaf(_) => None,
        }
    }

    /// Insert a leaf, creating missing intermediate groups.
    ///
    /// Nothing is modified when the insert fails.
    pub fn insert_leaf(&mut self, segs: &[&str], leaf: Leaf) -> ContainerResult<()> {
        let Some((name, parents)) = segs.split_last() else {
            return Err(ContainerError::InvalidPath {
                path: String::new(),
                reason: "cannot create a leaf at the root".into(),
            });
        };

        for depth in 1..=parents.len() {
            if let Some(Node::Leaf(_)) = self.node(&parents[..depth]) {
                return Err(ContainerError::NotAGroup {
                    path: parents[..depth].join("/"),
                });
            }
        }
        if self.node(segs).is_some() {
            return Err(ContainerError::AlreadyExists {
                path: segs.join("/"),
            });
        }

        let mut children = &mut self.root;
        for seg in parents {
            let entry = children
                .entry((*seg).to_string())
                .or_insert_with(|| Node::Group(BTreeMap::new()));
            children = match entry {
                Node::Group(grand) => grand,
                Node::Leaf(_) => {
                    return Err(ContainerError::NotAGroup {
                        path: (*seg).to_string(),
                    })
                }
            };
        }
        children.insert((*name).to_string(), Node::Leaf(leaf));
        Ok(())
    }

    /// Remove the node at `segs` with its whole subtree.
    pub fn remove(&mut self, segs: &[&str]) -> ContainerResult<bool> {
        let Some((name, parents)) = segs.split_last() else {
            return Err(ContainerError::InvalidPath {
                path: String::new(),
                reason: "cannot delete the root group".into(),
            });
        };

        let mut children = &mut self.root;
        for seg in parents {
            children = match children.get_mut(*seg) {
                Some(Node::Group(grand)) => grand,
                _ => return Ok(false),
            };
        }
        Ok(children.remove(*name).is_some())
    }

    /// Depth-first, parents before children, siblings in name order.
    pub fn visit(&self, segs: &[&str], visitor: &mut dyn FnMut(&str, NodeKind)) {
        if let Some(children) = self.children(segs) {
            walk("", children, visitor);
        }
    }

    /// Total number of nodes, groups included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        walk("", &self.root, &mut |_, _| count += 1);
        count
    }
}

fn walk(prefix: &str, children: &BTreeMap<String, Node>, visitor: &mut dyn FnMut(&str, NodeKind)) {
    for (name, node) in children {
        let here = path::join(prefix, name);
        visitor(&here, node.kind());
        if let Node::Group(grand) = node {
            walk(&here, grand, visitor);
        }
    }
}
