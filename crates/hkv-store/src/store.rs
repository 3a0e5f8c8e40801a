use hkv_codec::{Codec, MessagePackCodec};
use hkv_container::{path, Container, FileContainer, NodeKind, StoragePolicy};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{StoreConfig, DEFAULT_PREFIX};
use crate::error::{StoreError, StoreResult};
use crate::options::{AddOptions, Presence};

enum Backing {
    /// No container was configured; every operation no-ops.
    Disabled,
    Open(Box<dyn Container>),
    Closed,
}

fn live<'a>(backing: &'a Backing, op: &str) -> Option<&'a dyn Container> {
    match backing {
        Backing::Open(container) => Some(container.as_ref()),
        Backing::Disabled => None,
        Backing::Closed => {
            warn!(op, "operation on closed store ignored");
            None
        }
    }
}

fn live_mut<'a>(backing: &'a mut Backing, op: &str) -> Option<&'a mut dyn Container> {
    match backing {
        Backing::Open(container) => Some(container.as_mut()),
        Backing::Disabled => None,
        Backing::Closed => {
            warn!(op, "operation on closed store ignored");
            None
        }
    }
}

/// Key-value store of serialized values under a fixed container prefix.
///
/// Every key resolves to the qualified path `prefix + key` (a `/` is inserted
/// when the key does not start with one). Values are encoded with the store's
/// [`Codec`] and written as container leaves; `/`-separated keys become nested
/// groups in the container.
///
/// A store opened without a location is a null store: writes return `false`,
/// reads return nothing and listing is empty. A closed store behaves the same.
/// Only undecodable payloads and container failures surface as errors.
pub struct Store<C: Codec = MessagePackCodec> {
    backing: Backing,
    prefix: String,
    policy: StoragePolicy,
    codec: C,
}

impl Store<MessagePackCodec> {
    /// Open a store as described by `config`.
    ///
    /// Without a location this returns a null store; with one, a
    /// [`FileContainer`] opened in `config.mode`.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let prefix = normalize_prefix(&config.prefix)?;
        let backing = match &config.location {
            None => {
                debug!(%prefix, "opening null store");
                Backing::Disabled
            }
            Some(location) => {
                let container = FileContainer::open(location, config.mode)?;
                Backing::Open(Box::new(container))
            }
        };
        Ok(Self {
            backing,
            prefix,
            policy: config.policy,
            codec: MessagePackCodec,
        })
    }

    /// Wrap an already open container.
    pub fn with_container(
        container: impl Container + 'static,
        prefix: &str,
    ) -> StoreResult<Self> {
        Ok(Self {
            backing: Backing::Open(Box::new(container)),
            prefix: normalize_prefix(prefix)?,
            policy: StoragePolicy::default(),
            codec: MessagePackCodec,
        })
    }

    /// A null store under the default prefix.
    pub fn disabled() -> Self {
        Self {
            backing: Backing::Disabled,
            prefix: DEFAULT_PREFIX.to_string(),
            policy: StoragePolicy::default(),
            codec: MessagePackCodec,
        }
    }
}

impl<C: Codec> Store<C> {
    /// Replace the codec used for subsequent reads and writes.
    pub fn with_codec<D: Codec>(mut self, codec: D) -> Store<D> {
        Store {
            backing: std::mem::replace(&mut self.backing, Backing::Disabled),
            prefix: std::mem::take(&mut self.prefix),
            policy: self.policy,
            codec,
        }
    }

    /// Replace the default storage policy for writes.
    pub fn with_policy(mut self, policy: StoragePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Namespace prefix in canonical form (no leading or trailing `/`).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn policy(&self) -> StoragePolicy {
        self.policy
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// `false` for a null store.
    pub fn is_enabled(&self) -> bool {
        !matches!(self.backing, Backing::Disabled)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.backing, Backing::Closed)
    }

    /// The underlying container, for data stored outside the prefix.
    pub fn container(&self) -> Option<&dyn Container> {
        match &self.backing {
            Backing::Open(container) => Some(container.as_ref()),
            _ => None,
        }
    }

    pub fn container_mut(&mut self) -> Option<&mut dyn Container> {
        match &mut self.backing {
            Backing::Open(container) => Some(container.as_mut()),
            _ => None,
        }
    }

    /// Container path a key resolves to.
    pub fn qualify(&self, key: &str) -> String {
        if key.starts_with(path::SEPARATOR) {
            format!("{}{key}", self.prefix)
        } else {
            format!("{}{}{key}", self.prefix, path::SEPARATOR)
        }
    }

    /// Store `value` under `key` with default options: overwrite a value,
    /// refuse to replace a group.
    pub fn add<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> StoreResult<bool> {
        self.add_with(key, value, AddOptions::default())
    }

    /// Store `value` under `key`.
    ///
    /// Returns `Ok(false)` without touching the container when the store is
    /// null or closed, when something exists at `key` and `overwrite` is off,
    /// or when a group exists at `key` and `allow_delete_group` is off.
    /// Replacing a group deletes its whole subtree.
    pub fn add_with<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        opts: AddOptions,
    ) -> StoreResult<bool> {
        let qualified = self.qualify(key);
        let policy = opts.policy.unwrap_or(self.policy);
        let Some(container) = live_mut(&mut self.backing, "add") else {
            return Ok(false);
        };

        let existing = container.kind_of(&qualified)?;
        if let Some(kind) = existing {
            if !opts.overwrite {
                debug!(key, "add refused: entry exists and overwrite is off");
                return Ok(false);
            }
            if kind == NodeKind::Group && !opts.allow_delete_group {
                warn!(key, "add refused: key is a group and group deletion is off");
                return Ok(false);
            }
        }

        // Nothing is deleted unless the new value is ready to be written.
        policy.validate()?;
        let bytes = self.codec.encode(value)?;
        if let Some(kind) = existing {
            container.delete(&qualified)?;
            debug!(key, %kind, "replaced existing entry");
        }
        container.create_leaf(&qualified, &bytes, &policy)?;
        debug!(key, bytes = bytes.len(), "added value");
        Ok(true)
    }

    /// Whether `key` is absent, holds a value, or is a group.
    pub fn contains(&self, key: &str) -> StoreResult<Presence> {
        let Some(container) = live(&self.backing, "contains") else {
            return Ok(Presence::Absent);
        };
        Ok(Presence::from(container.kind_of(&self.qualify(key))?))
    }

    /// Remove the value at `key`; groups are left alone.
    pub fn remove(&mut self, key: &str) -> StoreResult<bool> {
        self.remove_with(key, false)
    }

    /// Remove whatever is at `key`, recursively for groups when
    /// `allow_delete_group` is set.
    pub fn remove_with(&mut self, key: &str, allow_delete_group: bool) -> StoreResult<bool> {
        let qualified = self.qualify(key);
        let Some(container) = live_mut(&mut self.backing, "remove") else {
            return Ok(false);
        };

        match container.kind_of(&qualified)? {
            None => Ok(false),
            Some(NodeKind::Group) if !allow_delete_group => {
                warn!(key, "remove refused: key is a group and group deletion is off");
                Ok(false)
            }
            Some(kind) => {
                let removed = container.delete(&qualified)?;
                debug!(key, %kind, removed, "removed entry");
                Ok(removed)
            }
        }
    }

    /// Decode the value at `key`.
    ///
    /// Returns `Ok(None)` if `key` is absent, is a group, or the store is null
    /// or closed. A payload that exists but does not decode is an error.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(self.codec.decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Encoded bytes stored at `key`, without decoding.
    pub fn get_raw(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let Some(container) = live(&self.backing, "get") else {
            return Ok(None);
        };
        Ok(container.read_leaf(&self.qualify(key))?)
    }

    /// Keys of every value under the prefix, nested groups included.
    ///
    /// Keys are returned with a leading `/` in container traversal order.
    /// Groups are not listed.
    pub fn list_keys(&self) -> StoreResult<Vec<String>> {
        let Some(container) = live(&self.backing, "list_keys") else {
            return Ok(Vec::new());
        };

        match container.kind_of(&self.prefix)? {
            None => Ok(Vec::new()),
            Some(NodeKind::Leaf) => Ok(vec![path::SEPARATOR.to_string()]),
            Some(NodeKind::Group) => {
                let mut keys = Vec::new();
                container.visit(&self.prefix, &mut |relative, kind| {
                    if kind.is_leaf() {
                        keys.push(format!("{}{relative}", path::SEPARATOR));
                    }
                })?;
                Ok(keys)
            }
        }
    }

    /// Persist pending changes without closing.
    pub fn flush(&mut self) -> StoreResult<()> {
        if let Some(container) = live_mut(&mut self.backing, "flush") {
            container.flush()?;
        }
        Ok(())
    }

    /// Flush and release the container.
    ///
    /// Idempotent; a no-op on a null store. After closing, the store behaves
    /// like a null store.
    pub fn close(&mut self) -> StoreResult<()> {
        match std::mem::replace(&mut self.backing, Backing::Closed) {
            Backing::Open(mut container) => {
                container.close()?;
                debug!(prefix = %self.prefix, "closed store");
                Ok(())
            }
            Backing::Disabled => {
                self.backing = Backing::Disabled;
                Ok(())
            }
            Backing::Closed => Ok(()),
        }
    }
}

impl<C: Codec> Drop for Store<C> {
    fn drop(&mut self) {
        if let Backing::Open(container) = &mut self.backing {
            if let Err(e) = container.close() {
                warn!(prefix = %self.prefix, error = %e, "failed to close store on drop");
            }
        }
    }
}

impl<C: Codec + std::fmt::Debug> std::fmt::Debug for Store<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.backing {
            Backing::Disabled => "disabled",
            Backing::Open(_) => "open",
            Backing::Closed => "closed",
        };
        f.debug_struct("Store")
            .field("state", &state)
            .field("prefix", &self.prefix)
            .field("policy", &self.policy)
            .field("codec", &self.codec)
            .finish()
    }
}

fn normalize_prefix(prefix: &str) -> StoreResult<String> {
    let normalized = path::normalize(prefix).map_err(|e| StoreError::InvalidPrefix {
        prefix: prefix.to_string(),
        reason: e.to_string(),
    })?;
    if normalized.is_empty() {
        return Err(StoreError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: "prefix must name a group below the root".into(),
        });
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hkv_codec::{BincodeCodec, CodecError};
    use hkv_container::{ContainerError, MemoryContainer, OpenMode};
    use serde::Deserialize;
    use std::collections::BTreeSet;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        grid: Vec<Vec<i64>>,
        weights: Vec<f32>,
        tag: Option<u8>,
    }

    fn sample() -> Sample {
        Sample {
            name: "dummy".into(),
            grid: vec![vec![10; 40]; 30],
            weights: vec![0.25, 0.5, 0.75],
            tag: Some(3),
        }
    }

    fn mem_store() -> Store {
        Store::with_container(MemoryContainer::new(), DEFAULT_PREFIX).unwrap()
    }

    fn key_set(store: &Store) -> BTreeSet<String> {
        store.list_keys().unwrap().into_iter().collect()
    }

    // -----------------------------------------------------------------------
    // Round-trip
    // -----------------------------------------------------------------------

    #[test]
    fn add_then_get_roundtrip() {
        let mut store = mem_store();
        assert!(store.add("/something", &sample()).unwrap());
        let back: Sample = store.get("/something").unwrap().expect("should exist");
        assert_eq!(back, sample());
    }

    #[test]
    fn stored_bytes_match_codec_output() {
        let mut store = mem_store();
        store.add("/v", &sample()).unwrap();
        let raw = store.get_raw("/v").unwrap().unwrap();
        assert_eq!(raw, MessagePackCodec.encode(&sample()).unwrap());
    }

    #[test]
    fn roundtrip_without_compression() {
        let mut store = mem_store().with_policy(StoragePolicy::stored());
        store.add("/plain", &vec![1u32, 2, 3]).unwrap();
        assert_eq!(store.get::<Vec<u32>>("/plain").unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn default_store_holds_schemaless_values() {
        let mut store = mem_store();
        let value = serde_json::json!({"a": [1, "two", {"three": 3.0}]});
        assert!(store.add("/doc", &value).unwrap());
        assert_eq!(store.get::<serde_json::Value>("/doc").unwrap(), Some(value));
    }

    #[test]
    fn non_finite_floats_survive_the_store() {
        let mut store = mem_store();
        let values = vec![f64::NAN, f64::INFINITY, f64::NEG_INFINITY];
        assert!(store.add("/floats", &values).unwrap());
        let back: Vec<f64> = store.get("/floats").unwrap().expect("should exist");
        assert!(back[0].is_nan());
        assert_eq!(back[1], f64::INFINITY);
        assert_eq!(back[2], f64::NEG_INFINITY);
    }

    #[test]
    fn reading_as_a_narrower_type_is_an_error() {
        let mut store = mem_store();
        store.add("/wide", &0x0102_0304u32).unwrap();
        let err = store.get::<u8>("/wide").unwrap_err();
        assert!(matches!(err, StoreError::Codec(CodecError::Deserialize(_))));

        let mut store = mem_store().with_codec(BincodeCodec);
        store.add("/wide", &0x0102_0304u32).unwrap();
        let err = store.get::<u8>("/wide").unwrap_err();
        assert!(matches!(err, StoreError::Codec(CodecError::Deserialize(_))));
        assert_eq!(store.get::<u32>("/wide").unwrap(), Some(0x0102_0304));
    }

    // -----------------------------------------------------------------------
    // Overwrite gating
    // -----------------------------------------------------------------------

    #[test]
    fn overwrite_is_default() {
        let mut store = mem_store();
        store.add("/k", &1u32).unwrap();
        assert!(store.add("/k", &2u32).unwrap());
        assert_eq!(store.get::<u32>("/k").unwrap(), Some(2));
    }

    #[test]
    fn overwrite_off_keeps_original() {
        let mut store = mem_store();
        store.add("/k", &"v1").unwrap();
        let added = store
            .add_with("/k", &"v2", AddOptions::default().overwrite(false))
            .unwrap();
        assert!(!added);
        assert_eq!(store.get::<String>("/k").unwrap().as_deref(), Some("v1"));
    }

    #[test]
    fn overwrite_off_still_writes_new_key() {
        let mut store = mem_store();
        let opts = AddOptions::default().overwrite(false);
        assert!(store.add_with("/fresh", &1u8, opts).unwrap());
    }

    // -----------------------------------------------------------------------
    // Group protection
    // -----------------------------------------------------------------------

    #[test]
    fn add_over_group_refused_by_default() {
        let mut store = mem_store();
        store.add("/p/child", &1u8).unwrap();
        assert!(!store.add("/p", &2u8).unwrap());
        assert_eq!(store.contains("/p").unwrap(), Presence::Group);
        assert_eq!(store.get::<u8>("/p/child").unwrap(), Some(1));
    }

    #[test]
    fn add_over_group_with_permission_replaces_subtree() {
        let mut store = mem_store();
        store.add("/p/child", &1u8).unwrap();
        store.add("/p/deep/er", &1u8).unwrap();
        let opts = AddOptions::default().allow_delete_group(true);
        assert!(store.add_with("/p", &2u8, opts).unwrap());
        assert_eq!(store.contains("/p").unwrap(), Presence::Leaf);
        assert_eq!(store.contains("/p/child").unwrap(), Presence::Absent);
        assert_eq!(store.get::<u8>("/p").unwrap(), Some(2));
        assert_eq!(key_set(&store), BTreeSet::from(["/p".to_string()]));
    }

    #[test]
    fn overwrite_off_wins_over_group_permission() {
        let mut store = mem_store();
        store.add("/p/child", &1u8).unwrap();
        let opts = AddOptions::default()
            .overwrite(false)
            .allow_delete_group(true);
        assert!(!store.add_with("/p", &2u8, opts).unwrap());
        assert_eq!(store.contains("/p").unwrap(), Presence::Group);
    }

    #[test]
    fn invalid_policy_leaves_existing_value() {
        let mut store = mem_store();
        store.add("/k", &1u8).unwrap();
        let opts = AddOptions::default().policy(StoragePolicy::zstd(0));
        let err = store.add_with("/k", &2u8, opts).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Container(ContainerError::InvalidPolicy(_))
        ));
        assert_eq!(store.get::<u8>("/k").unwrap(), Some(1));
    }

    #[test]
    fn per_call_policy_is_recorded() {
        let mut store = mem_store();
        let opts = AddOptions::default().policy(StoragePolicy::stored());
        store.add_with("/k", &vec![0u8; 256], opts).unwrap();
        let qualified = store.qualify("/k");
        let info = store
            .container()
            .unwrap()
            .leaf_info(&qualified)
            .unwrap()
            .unwrap();
        assert_eq!(info.policy, StoragePolicy::stored());
        assert_eq!(info.len, info.stored_len);
    }

    // -----------------------------------------------------------------------
    // Absence and leaf/group distinction
    // -----------------------------------------------------------------------

    #[test]
    fn missing_key() {
        let store = mem_store();
        assert_eq!(store.get::<u8>("/missing").unwrap(), None);
        let presence = store.contains("/missing").unwrap();
        assert!(!presence.exists());
        assert_eq!(presence.is_leaf(), None);
    }

    #[test]
    fn leaf_vs_group() {
        let mut store = mem_store();
        store.add("/a/b", &0u8).unwrap();
        assert_eq!(store.contains("/a").unwrap().is_leaf(), Some(false));
        assert_eq!(store.contains("/a/b").unwrap().is_leaf(), Some(true));
        assert!(store.contains("/a").unwrap().exists());
    }

    #[test]
    fn get_on_group_is_none() {
        let mut store = mem_store();
        store.add("/a/b", &0u8).unwrap();
        assert_eq!(store.get::<u8>("/a").unwrap(), None);
    }

    #[test]
    fn add_below_a_leaf_is_container_error() {
        let mut store = mem_store();
        store.add("/a", &0u8).unwrap();
        let err = store.add("/a/b", &1u8).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Container(ContainerError::NotAGroup { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    #[test]
    fn remove_leaf() {
        let mut store = mem_store();
        store.add("/k", &1u8).unwrap();
        assert!(store.remove("/k").unwrap());
        assert_eq!(store.get::<u8>("/k").unwrap(), None);
        assert!(!store.remove("/k").unwrap());
    }

    #[test]
    fn remove_missing() {
        let mut store = mem_store();
        assert!(!store.remove("/never").unwrap());
    }

    #[test]
    fn remove_group_requires_permission() {
        let mut store = mem_store();
        store.add("/g/a", &1u8).unwrap();
        store.add("/g/b", &2u8).unwrap();
        assert!(!store.remove("/g").unwrap());
        assert_eq!(store.list_keys().unwrap().len(), 2);
        assert!(store.remove_with("/g", true).unwrap());
        assert!(store.list_keys().unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Enumeration
    // -----------------------------------------------------------------------

    #[test]
    fn list_keys_returns_only_leaves() {
        let mut store = mem_store();
        store.add("/x", &1u8).unwrap();
        store.add("/y/z", &2u8).unwrap();
        assert_eq!(
            key_set(&store),
            BTreeSet::from(["/x".to_string(), "/y/z".to_string()])
        );
    }

    #[test]
    fn listed_keys_resolve_back() {
        let mut store = mem_store();
        for key in ["/a", "/b/c", "/b/d/e", "f"] {
            store.add(key, &key.len()).unwrap();
        }
        for key in store.list_keys().unwrap() {
            assert!(store.get::<usize>(&key).unwrap().is_some(), "{key}");
        }
        assert!(key_set(&store).contains("/f"));
    }

    #[test]
    fn list_keys_ignores_data_outside_prefix() {
        let mut store = mem_store();
        store.add("/inside", &1u8).unwrap();
        store
            .container_mut()
            .unwrap()
            .create_leaf("/something_else", &[0, 1, 2, 3], &StoragePolicy::stored())
            .unwrap();
        assert_eq!(store.list_keys().unwrap(), vec!["/inside".to_string()]);
        assert_eq!(store.contains("/something_else").unwrap(), Presence::Absent);
    }

    #[test]
    fn list_keys_empty_store() {
        assert!(mem_store().list_keys().unwrap().is_empty());
    }

    #[test]
    fn key_at_prefix_root() {
        let mut store = mem_store();
        assert!(store.add("/", &5u8).unwrap());
        assert_eq!(store.list_keys().unwrap(), vec!["/".to_string()]);
        assert_eq!(store.get::<u8>("").unwrap(), Some(5));
    }

    // -----------------------------------------------------------------------
    // Key qualification
    // -----------------------------------------------------------------------

    #[test]
    fn qualified_paths_start_with_prefix() {
        let store = Store::with_container(MemoryContainer::new(), "/pickled/").unwrap();
        assert_eq!(store.prefix(), "pickled");
        assert_eq!(store.qualify("/a/b"), "pickled/a/b");
        assert_eq!(store.qualify("a"), "pickled/a");
    }

    #[test]
    fn nested_prefix() {
        let mut store = Store::with_container(MemoryContainer::new(), "cache/v2").unwrap();
        store.add("/k", &1u8).unwrap();
        let container = store.container().unwrap();
        assert_eq!(container.kind_of("/cache/v2/k").unwrap(), Some(NodeKind::Leaf));
        assert_eq!(store.list_keys().unwrap(), vec!["/k".to_string()]);
    }

    #[test]
    fn invalid_prefixes() {
        for prefix in ["", "/", "a/../b"] {
            let err = Store::with_container(MemoryContainer::new(), prefix).unwrap_err();
            assert!(matches!(err, StoreError::InvalidPrefix { .. }), "{prefix:?}");
        }
    }

    #[test]
    fn separate_prefixes_are_isolated() {
        let mut a = Store::with_container(MemoryContainer::new(), "a").unwrap();
        a.add("/k", &1u8).unwrap();
        let b_prefix = "b";
        let b_path = format!("{b_prefix}/k");
        let c = a.container_mut().unwrap();
        c.create_leaf(&b_path, &BincodeCodec.encode(&2u8).unwrap(), &StoragePolicy::stored())
            .unwrap();
        assert_eq!(a.get::<u8>("/k").unwrap(), Some(1));
        assert_eq!(a.list_keys().unwrap(), vec!["/k".to_string()]);
    }

    // -----------------------------------------------------------------------
    // Corruption
    // -----------------------------------------------------------------------

    #[test]
    fn corrupt_payload_is_an_error_not_a_miss() {
        let mut store = mem_store();
        let qualified = store.qualify("/bad");
        store
            .container_mut()
            .unwrap()
            .create_leaf(&qualified, b"garbage", &StoragePolicy::stored())
            .unwrap();
        assert_eq!(store.contains("/bad").unwrap(), Presence::Leaf);
        let err = store.get::<u8>("/bad").unwrap_err();
        assert!(matches!(err, StoreError::Codec(CodecError::Truncated { .. })));
    }

    #[test]
    fn codec_mismatch_is_an_error() {
        let mut store = mem_store();
        store.add("/k", &7u32).unwrap();
        let store = store.with_codec(BincodeCodec);
        let err = store.get::<u32>("/k").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Codec(CodecError::FormatMismatch { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Null and closed stores
    // -----------------------------------------------------------------------

    #[test]
    fn null_store_no_ops() {
        let mut store = Store::open(&StoreConfig::default()).unwrap();
        assert!(!store.is_enabled());
        assert!(!store.add("/k", &sample()).unwrap());
        assert_eq!(store.get::<Sample>("/k").unwrap(), None);
        assert_eq!(store.contains("/k").unwrap(), Presence::Absent);
        assert!(!store.remove_with("/k", true).unwrap());
        assert!(store.list_keys().unwrap().is_empty());
        assert!(store.container().is_none());
        store.flush().unwrap();
        store.close().unwrap();
        store.close().unwrap();
        assert!(!store.is_closed());
    }

    #[test]
    fn disabled_uses_default_prefix() {
        let store = Store::disabled();
        assert_eq!(store.prefix(), DEFAULT_PREFIX);
        assert!(!store.is_enabled());
    }

    #[test]
    fn closed_store_behaves_as_null() {
        let mut store = mem_store();
        store.add("/k", &1u8).unwrap();
        store.close().unwrap();
        assert!(store.is_closed());
        assert!(store.is_enabled());
        assert!(!store.add("/k", &2u8).unwrap());
        assert_eq!(store.get::<u8>("/k").unwrap(), None);
        assert!(store.list_keys().unwrap().is_empty());
        store.close().unwrap();
    }

    #[test]
    fn read_only_container_write_is_error() {
        let mut store =
            Store::with_container(MemoryContainer::with_mode(OpenMode::ReadOnly), "p").unwrap();
        let err = store.add("/k", &1u8).unwrap_err();
        assert!(matches!(err, StoreError::Container(ContainerError::ReadOnly)));
        assert!(store.list_keys().unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // File-backed lifecycle
    // -----------------------------------------------------------------------

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::at(dir.path().join("database.hkv"));

        let mut store = Store::open(&config).unwrap();
        store.add("/something", &sample()).unwrap();
        store.add("/nested/value", &42u64).unwrap();
        store
            .container_mut()
            .unwrap()
            .create_leaf("/something_else", &[0, 1, 2, 3], &StoragePolicy::stored())
            .unwrap();
        store.close().unwrap();

        let store = Store::open(&config.clone().with_mode(OpenMode::ReadOnly)).unwrap();
        assert_eq!(
            store.list_keys().unwrap(),
            vec!["/nested/value".to_string(), "/something".to_string()]
        );
        assert_eq!(store.get::<Sample>("/something").unwrap(), Some(sample()));
        assert_eq!(
            store.container().unwrap().read_leaf("/something_else").unwrap(),
            Some(vec![0, 1, 2, 3])
        );
    }

    #[test]
    fn drop_closes_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::at(dir.path().join("db.hkv"));
        {
            let mut store = Store::open(&config).unwrap();
            store.add("/k", &"kept").unwrap();
        }
        let store = Store::open(&config.with_mode(OpenMode::ReadOnly)).unwrap();
        assert_eq!(store.get::<String>("/k").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn open_read_only_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::at(dir.path().join("absent.hkv")).with_mode(OpenMode::ReadOnly);
        let err = Store::open(&config).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Container(ContainerError::LocationNotFound(_))
        ));
    }

    #[test]
    fn custom_prefix_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::at(dir.path().join("db.hkv")).with_prefix("/objects");
        let mut store = Store::open(&config).unwrap();
        store.add("/a", &1u8).unwrap();
        assert_eq!(store.qualify("/a"), "objects/a");
        assert_eq!(
            store.container().unwrap().kind_of("/objects/a").unwrap(),
            Some(NodeKind::Leaf)
        );
    }

    #[test]
    fn debug_format() {
        let debug = format!("{:?}", mem_store());
        assert!(debug.contains("Store"));
        assert!(debug.contains("open"));
        assert!(debug.contains("pickled"));
    }
}
