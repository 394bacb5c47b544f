//! # Record Store - Player Data Persistence
//!
//! Persistence boundary for the player registry. The registry only needs one
//! capability: exact round-trip of an id-keyed set of [`PlayerRecord`]s under
//! a namespace key. That capability is the [`RecordStore`] trait; everything
//! else about the on-disk format is an implementation detail of the store.
//!
//! Two implementations ship with the crate:
//!
//! - [`SledRecordStore`] - durable, sled-backed, records encoded with bincode.
//!   One tree holds every namespace; the namespace key is the tree key.
//! - [`MemoryRecordStore`] - ephemeral, for adapters that opt out of
//!   durability and for tests.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use covalence::storage::{RecordStore, SledRecordStore};
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = SledRecordStore::open("./data")?;
//!     let records = store.load("covalence")?.unwrap_or_default();
//!     store.save("covalence", &records)?;
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::sync::Mutex;

use indexmap::IndexMap;

use crate::errors::StoreError;
use crate::players::PlayerRecord;

const TREE_RECORDS: &str = "covalence_records";

/// An id-keyed record set as persisted and reloaded by a store.
pub type RecordSet = IndexMap<String, PlayerRecord>;

/// Round-trip persistence for a namespaced player record set.
///
/// `load` returns `Ok(None)` when the namespace has never been saved;
/// corrupt or unreadable data is an `Err`, which the registry downgrades to
/// an empty data set.
pub trait RecordStore {
    /// Load the record set stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<RecordSet>, StoreError>;

    /// Replace the record set stored under `key`.
    fn save(&self, key: &str, records: &RecordSet) -> Result<(), StoreError>;
}

/// Sled-backed persistence for player records.
pub struct SledRecordStore {
    _db: sled::Db,
    records: sled::Tree,
}

impl SledRecordStore {
    /// Open (or create) the store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let records = db.open_tree(TREE_RECORDS)?;
        Ok(Self { _db: db, records })
    }

    /// Write raw bytes under `key`, bypassing serialization. Hook for
    /// exercising a reload from unreadable data.
    #[doc(hidden)]
    pub fn put_raw(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.records.insert(key.as_bytes(), bytes)?;
        self.records.flush()?;
        Ok(())
    }
}

impl RecordStore for SledRecordStore {
    fn load(&self, key: &str) -> Result<Option<RecordSet>, StoreError> {
        match self.records.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save(&self, key: &str, records: &RecordSet) -> Result<(), StoreError> {
        let bytes = bincode::serialize(records)?;
        self.records.insert(key.as_bytes(), bytes)?;
        self.records.flush()?;
        Ok(())
    }
}

/// In-memory store. Nothing survives the process; useful for adapters that
/// do not want durable identity history and for tests.
#[derive(Default)]
pub struct MemoryRecordStore {
    data: Mutex<IndexMap<String, RecordSet>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn load(&self, key: &str) -> Result<Option<RecordSet>, StoreError> {
        let data = self.data.lock().expect("record store lock poisoned");
        Ok(data.get(key).cloned())
    }

    fn save(&self, key: &str, records: &RecordSet) -> Result<(), StoreError> {
        let mut data = self.data.lock().expect("record store lock poisoned");
        data.insert(key.to_string(), records.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> PlayerRecord {
        PlayerRecord {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn sled_store_round_trips_records() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SledRecordStore::open(tmp.path()).unwrap();

        let mut records = RecordSet::new();
        records.insert(
            "76561197960287930".into(),
            record("76561197960287930", "Steve"),
        );
        records.insert("4".into(), record("4", "Alex"));

        store.save("covalence", &records).unwrap();
        let loaded = store.load("covalence").unwrap().expect("saved data");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("4").unwrap().name, "Alex");
    }

    #[test]
    fn sled_store_load_missing_key_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SledRecordStore::open(tmp.path()).unwrap();
        assert!(store.load("never-saved").unwrap().is_none());
    }

    #[test]
    fn sled_store_rejects_garbage_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SledRecordStore::open(tmp.path()).unwrap();
        store.put_raw("covalence", b"\xff\xfe not bincode").unwrap();
        assert!(store.load("covalence").is_err());
    }

    #[test]
    fn memory_store_namespaces_are_independent() {
        let store = MemoryRecordStore::new();
        let mut records = RecordSet::new();
        records.insert("1".into(), record("1", "Steve"));
        store.save("a", &records).unwrap();
        assert!(store.load("b").unwrap().is_none());
        assert_eq!(store.load("a").unwrap().unwrap().len(), 1);
    }
}
