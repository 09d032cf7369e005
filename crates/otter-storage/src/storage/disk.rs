//! Persistent backing store using redb

use std::path::Path;
use std::sync::Arc;

use redb::backends::InMemoryBackend;
use redb::{Database, ReadableTable, TableDefinition};

use super::Storage;
use crate::error::{StorageError, StorageResult};

// Table definition for stored entries
const TABLE: TableDefinition<&str, &str> = TableDefinition::new("storage");

/// Backing store that survives process restarts
pub struct RedbStorage {
    db: Arc<Database>,
    is_memory: bool,
}

impl RedbStorage {
    /// Open or create a store
    ///
    /// # Arguments
    /// * `path` - Database path. Use `:memory:` for a store that lives only
    ///   as long as this handle, or a file path for persistent storage
    pub fn open(path: &str) -> StorageResult<Self> {
        let is_memory = path == ":memory:";

        let db = if is_memory {
            Database::builder()
                .create_with_backend(InMemoryBackend::new())
                .map_err(StorageError::backend)?
        } else {
            let path = Path::new(path);
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Database::create(path).map_err(StorageError::backend)?
        };

        // Create the table up front so readers never miss it
        {
            let write_txn = db.begin_write().map_err(StorageError::backend)?;
            {
                write_txn.open_table(TABLE).map_err(StorageError::backend)?;
            }
            write_txn.commit().map_err(StorageError::backend)?;
        }

        tracing::debug!(path, "opened redb storage");

        Ok(Self {
            db: Arc::new(db),
            is_memory,
        })
    }

    /// Check if this store lives only in memory
    pub fn is_memory(&self) -> bool {
        self.is_memory
    }
}

impl std::fmt::Debug for RedbStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStorage")
            .field("is_memory", &self.is_memory)
            .finish_non_exhaustive()
    }
}

impl Storage for RedbStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read().map_err(StorageError::backend)?;
        let table = read_txn.open_table(TABLE).map_err(StorageError::backend)?;

        let value = table
            .get(key)
            .map_err(StorageError::backend)?
            .map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write().map_err(StorageError::backend)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(StorageError::backend)?;
            table.insert(key, value).map_err(StorageError::backend)?;
        }
        write_txn.commit().map_err(StorageError::backend)?;

        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write().map_err(StorageError::backend)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(StorageError::backend)?;
            table.remove(key).map_err(StorageError::backend)?;
        }
        write_txn.commit().map_err(StorageError::backend)?;

        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write().map_err(StorageError::backend)?;
        write_txn.delete_table(TABLE).map_err(StorageError::backend)?;
        {
            write_txn.open_table(TABLE).map_err(StorageError::backend)?;
        }
        write_txn.commit().map_err(StorageError::backend)?;

        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let read_txn = self.db.begin_read().map_err(StorageError::backend)?;
        let table = read_txn.open_table(TABLE).map_err(StorageError::backend)?;

        let mut keys = Vec::new();
        for item in table.iter().map_err(StorageError::backend)? {
            let (key, _) = item.map_err(StorageError::backend)?;
            keys.push(key.value().to_string());
        }

        Ok(keys)
    }

    fn contains_key(&self, key: &str) -> StorageResult<bool> {
        let read_txn = self.db.begin_read().map_err(StorageError::backend)?;
        let table = read_txn.open_table(TABLE).map_err(StorageError::backend)?;

        Ok(table.get(key).map_err(StorageError::backend)?.is_some())
    }

    fn len(&self) -> StorageResult<usize> {
        let read_txn = self.db.begin_read().map_err(StorageError::backend)?;
        let table = read_txn.open_table(TABLE).map_err(StorageError::backend)?;

        // Count by iterating; entries are small
        Ok(table.iter().map_err(StorageError::backend)?.count())
    }
}
