//! Backing store abstraction.
//!
//! A backing store holds plain strings under string keys, in the shape of
//! the Web Storage API (`getItem`, `setItem`, `removeItem`, `clear`, key
//! enumeration). [`TypedStore`](crate::TypedStore) layers typed values on
//! top of any implementation.

mod disk;
mod memory;

pub use disk::RedbStorage;
pub use memory::MemoryStorage;

use std::sync::Arc;

use crate::error::StorageResult;

/// String-keyed store of string values.
///
/// Methods take `&self`; implementations use interior mutability. Errors
/// returned here reach the caller of the facade unchanged.
pub trait Storage {
    /// Raw value for `key`, `None` when absent.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Insert or overwrite `key`.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`. Absent keys are not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Delete every entry.
    fn clear(&self) -> StorageResult<()>;

    /// Keys currently held by the store.
    fn keys(&self) -> StorageResult<Vec<String>>;

    /// Whether the store itself holds `key`.
    fn contains_key(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get_item(key)?.is_some())
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.keys()?.len())
    }

    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

macro_rules! forward_storage {
    ($($ptr:ty),* $(,)?) => {
        $(
            impl<S: Storage + ?Sized> Storage for $ptr {
                fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
                    (**self).get_item(key)
                }

                fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
                    (**self).set_item(key, value)
                }

                fn remove_item(&self, key: &str) -> StorageResult<()> {
                    (**self).remove_item(key)
                }

                fn clear(&self) -> StorageResult<()> {
                    (**self).clear()
                }

                fn keys(&self) -> StorageResult<Vec<String>> {
                    (**self).keys()
                }

                fn contains_key(&self, key: &str) -> StorageResult<bool> {
                    (**self).contains_key(key)
                }

                fn len(&self) -> StorageResult<usize> {
                    (**self).len()
                }
            }
        )*
    };
}

forward_storage!(&S, Box<S>, Arc<S>);

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(storage: &dyn Storage) {
        assert!(storage.is_empty().unwrap());
        storage.set_item("a", "1").unwrap();
        assert!(storage.contains_key("a").unwrap());
        assert_eq!(storage.len().unwrap(), 1);
    }

    #[test]
    fn test_forwarding_impls() {
        let shared = Arc::new(MemoryStorage::new());
        exercise(&shared);
        assert_eq!(shared.get_item("a").unwrap(), Some("1".to_string()));

        let boxed: Box<dyn Storage> = Box::new(MemoryStorage::new());
        exercise(&boxed);
        assert_eq!(boxed.get_item("a").unwrap(), Some("1".to_string()));
    }
}
