//! In-memory backing store

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::Storage;
use crate::error::{StorageError, StorageResult};

/// Backing store kept in process memory.
///
/// An optional byte quota counts key and value bytes across all entries;
/// writes that would exceed it fail with [`StorageError::QuotaExceeded`]
/// and leave the store untouched.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<Entries>,
    quota: Option<usize>,
}

/// Map plus the byte total of its keys and values, updated on every write.
#[derive(Debug, Default)]
struct Entries {
    map: BTreeMap<String, String>,
    used: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            quota: Some(quota),
        }
    }

    pub fn quota(&self) -> Option<usize> {
        self.quota
    }

    /// Bytes currently counted against the quota.
    pub fn used_bytes(&self) -> usize {
        self.entries.read().used
    }
}

fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().map.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write();

        let replaced = entries.map.get(key).map_or(0, |old| entry_size(key, old));
        let needed = entries.used - replaced + entry_size(key, value);
        if let Some(quota) = self.quota {
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }

        entries.map.insert(key.to_string(), value.to_string());
        entries.used = needed;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write();
        if let Some(old) = entries.map.remove(key) {
            entries.used -= entry_size(key, &old);
        }
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        let mut entries = self.entries.write();
        entries.map.clear();
        entries.used = 0;
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries.read().map.keys().cloned().collect())
    }

    fn contains_key(&self, key: &str) -> StorageResult<bool> {
        Ok(self.entries.read().map.contains_key(key))
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.entries.read().map.len())
    }
}
