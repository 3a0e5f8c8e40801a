use hkv_container::{NodeKind, StoragePolicy};

/// What a key resolves to in the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Presence {
    /// Nothing is stored at the key (or the store is null/closed).
    Absent,
    /// A value is stored at the key.
    Leaf,
    /// The key names a group of other keys; it holds no value itself.
    Group,
}

impl Presence {
    pub fn exists(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// `None` when absent, otherwise whether the key holds a value.
    pub fn is_leaf(&self) -> Option<bool> {
        match self {
            Self::Absent => None,
            Self::Leaf => Some(true),
            Self::Group => Some(false),
        }
    }
}

impl From<Option<NodeKind>> for Presence {
    fn from(kind: Option<NodeKind>) -> Self {
        match kind {
            None => Self::Absent,
            Some(NodeKind::Leaf) => Self::Leaf,
            Some(NodeKind::Group) => Self::Group,
        }
    }
}

/// Policy for [`crate::Store::add_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddOptions {
    /// Replace an existing value. Default `true`.
    pub overwrite: bool,
    /// Permit replacing a group, deleting everything under it. Default `false`.
    pub allow_delete_group: bool,
    /// Storage policy for this write; the store's policy when `None`.
    pub policy: Option<StoragePolicy>,
}

impl AddOptions {
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn allow_delete_group(mut self, allow: bool) -> Self {
        self.allow_delete_group = allow;
        self
    }

    pub fn policy(mut self, policy: StoragePolicy) -> Self {
        self.policy = Some(policy);
        self
    }
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            allow_delete_group: false,
            policy: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_shapes() {
        assert!(!Presence::Absent.exists());
        assert_eq!(Presence::Absent.is_leaf(), None);
        assert!(Presence::Leaf.exists());
        assert_eq!(Presence::Leaf.is_leaf(), Some(true));
        assert!(Presence::Group.exists());
        assert_eq!(Presence::Group.is_leaf(), Some(false));
    }

    #[test]
    fn presence_from_kind() {
        assert_eq!(Presence::from(None), Presence::Absent);
        assert_eq!(Presence::from(Some(NodeKind::Leaf)), Presence::Leaf);
        assert_eq!(Presence::from(Some(NodeKind::Group)), Presence::Group);
    }

    #[test]
    fn add_option_defaults() {
        let o = AddOptions::default();
        assert!(o.overwrite);
        assert!(!o.allow_delete_group);
        assert!(o.policy.is_none());

        let o = o
            .overwrite(false)
            .allow_delete_group(true)
            .policy(StoragePolicy::stored());
        assert!(!o.overwrite);
        assert!(o.allow_delete_group);
        assert_eq!(o.policy, Some(StoragePolicy::stored()));
    }
}
