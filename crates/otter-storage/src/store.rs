//! Typed facade over a string-only backing store

use crate::coerce::Coercer;
use crate::config::StoreConfig;
use crate::error::StorageResult;
use crate::storage::Storage;
use crate::value::StoredValue;

/// Reads and writes typed values through a [`Storage`] backend.
///
/// Values are stringified on write and their type is inferred again on
/// read. Inference is heuristic: a string that looks like a number, boolean
/// or JSON container comes back as that type.
#[derive(Debug)]
pub struct TypedStore<S> {
    storage: S,
    coercer: Coercer,
}

impl<S: Storage> TypedStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, StoreConfig::default())
    }

    pub fn with_config(storage: S, config: StoreConfig) -> Self {
        Self::with_coercer(storage, Coercer::new(config))
    }

    /// Use a custom rule list on the read path.
    pub fn with_coercer(storage: S, coercer: Coercer) -> Self {
        Self { storage, coercer }
    }

    /// Value for `key`.
    ///
    /// A key that was never written reads as `Null`, the same as a key
    /// written with `Null`. Use [`get_opt`](Self::get_opt) to tell them apart.
    pub fn get(&self, key: &str) -> StorageResult<StoredValue> {
        Ok(self.get_opt(key)?.unwrap_or(StoredValue::Null))
    }

    /// Value for `key`, `None` when the backing store has no entry.
    pub fn get_opt(&self, key: &str) -> StorageResult<Option<StoredValue>> {
        let raw = self.storage.get_item(key)?;
        Ok(raw.map(|raw| self.coercer.coerce(&raw)))
    }

    /// Stored text for `key` without coercion.
    pub fn raw(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage.get_item(key)
    }

    /// Write `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: &str, value: impl Into<StoredValue>) -> StorageResult<()> {
        let value = value.into();
        let raw = value.to_raw()?;
        self.storage.set_item(key, &raw)?;
        tracing::debug!(key, kind = value.type_name(), "stored value");
        Ok(())
    }

    pub fn exists(&self, key: &str) -> StorageResult<bool> {
        self.storage.contains_key(key)
    }

    /// Delete `key`. Missing keys are ignored.
    pub fn remove(&self, key: &str) -> StorageResult<()> {
        self.storage.remove_item(key)?;
        tracing::debug!(key, "removed value");
        Ok(())
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.storage.clear()?;
        tracing::debug!("cleared storage");
        Ok(())
    }

    pub fn keys(&self) -> StorageResult<Vec<String>> {
        self.storage.keys()
    }

    pub fn len(&self) -> StorageResult<usize> {
        self.storage.len()
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        self.storage.is_empty()
    }

    pub fn config(&self) -> &StoreConfig {
        self.coercer.config()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }
}
