//! Integration tests for the typed storage facade

use otter_storage::{
    MemoryStorage, RedbStorage, Storage, StorageError, StorageResult, StoredValue, TypedStore,
    ops,
};
use serde_json::json;
use std::sync::Arc;

/// Backend that rejects every write, like a full or disabled host store.
struct ReadOnlyStorage;

#[derive(Debug)]
struct Unavailable;

impl std::fmt::Display for Unavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "storage is unavailable")
    }
}

impl std::error::Error for Unavailable {}

impl Storage for ReadOnlyStorage {
    fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::backend(Unavailable))
    }

    fn remove_item(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        Err(StorageError::backend(Unavailable))
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(Vec::new())
    }
}

fn check_round_trips<S: Storage>(store: &TypedStore<S>) {
    store.set("count", 5).unwrap();
    assert_eq!(store.raw("count").unwrap().as_deref(), Some("5"));
    assert_eq!(store.get("count").unwrap(), StoredValue::Integer(5));

    store.set("pi", 3.25).unwrap();
    assert_eq!(store.get("pi").unwrap(), StoredValue::Float(3.25));

    store.set("on", true).unwrap();
    assert_eq!(store.get("on").unwrap(), StoredValue::Bool(true));

    store.set("none", StoredValue::Null).unwrap();
    assert_eq!(store.get("none").unwrap(), StoredValue::Null);

    store.set("undef", StoredValue::Undefined).unwrap();
    assert_eq!(store.get("undef").unwrap(), StoredValue::Undefined);

    store.set("obj", json!({"a": 1})).unwrap();
    assert_eq!(store.raw("obj").unwrap().as_deref(), Some(r#"{"a":1}"#));
    assert_eq!(store.get("obj").unwrap().into_json(), json!({"a": 1}));

    store.set("arr", json!([1, "b", {"c": [true]}])).unwrap();
    assert_eq!(
        store.get("arr").unwrap().into_json(),
        json!([1, "b", {"c": [true]}])
    );

    store.set("greeting", "hello").unwrap();
    assert_eq!(store.get("greeting").unwrap(), StoredValue::from("hello"));
}

fn check_lifecycle<S: Storage>(store: &TypedStore<S>) {
    assert!(!store.exists("k").unwrap());
    store.set("k", "v").unwrap();
    assert!(store.exists("k").unwrap());
    store.remove("k").unwrap();
    assert!(!store.exists("k").unwrap());

    for key in ["a", "b", "c"] {
        store.set(key, 1).unwrap();
    }
    store.clear().unwrap();
    for key in ["a", "b", "c"] {
        assert!(!store.exists(key).unwrap());
    }
}

#[test]
fn test_memory_round_trips() {
    check_round_trips(&TypedStore::new(MemoryStorage::new()));
}

#[test]
fn test_redb_round_trips() {
    check_round_trips(&TypedStore::new(RedbStorage::open(":memory:").unwrap()));
}

#[test]
fn test_memory_lifecycle() {
    check_lifecycle(&TypedStore::new(MemoryStorage::new()));
}

#[test]
fn test_redb_lifecycle() {
    check_lifecycle(&TypedStore::new(RedbStorage::open(":memory:").unwrap()));
}

#[test]
fn test_string_that_looks_like_float_reads_as_float() {
    let store = TypedStore::new(MemoryStorage::new());
    store.set("k", "3.0").unwrap();
    assert_eq!(store.get("k").unwrap(), StoredValue::Float(3.0));
}

#[test]
fn test_values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("typed.redb");
    let path = path.to_str().unwrap();

    {
        let store = TypedStore::new(RedbStorage::open(path).unwrap());
        store.set("settings", json!({"theme": "dark", "size": 14})).unwrap();
        store.set("visits", 12).unwrap();
    }

    let store = TypedStore::new(RedbStorage::open(path).unwrap());
    assert_eq!(
        store.get("settings").unwrap().into_json(),
        json!({"theme": "dark", "size": 14})
    );
    assert_eq!(store.get("visits").unwrap(), StoredValue::Integer(12));
    assert_eq!(store.keys().unwrap(), vec!["settings", "visits"]);
}

#[test]
fn test_backend_errors_pass_through() {
    let store = TypedStore::new(ReadOnlyStorage);

    let err = store.set("k", 1).unwrap_err();
    assert!(matches!(err, StorageError::Backend(_)));
    assert_eq!(err.to_string(), "storage is unavailable");

    assert!(store.clear().is_err());
    store.remove("k").unwrap();
}

#[test]
fn test_instances_are_independent() {
    let first = TypedStore::new(MemoryStorage::new());
    let second = TypedStore::new(MemoryStorage::new());

    first.set("k", 1).unwrap();
    assert!(!second.exists("k").unwrap());
}

#[test]
fn test_shared_backend() {
    let backend = Arc::new(MemoryStorage::new());
    let writer = TypedStore::new(Arc::clone(&backend));
    let reader = TypedStore::new(Arc::clone(&backend));

    writer.set("k", json!(["x"])).unwrap();
    assert_eq!(reader.get("k").unwrap(), StoredValue::Array(vec![json!("x")]));
}

#[test]
fn test_ops_reject_non_string_key_without_writing() {
    let store = TypedStore::new(MemoryStorage::new());

    let err = ops::call(&store, "set", &[json!({ "key": 123, "value": "x" })]).unwrap_err();
    assert!(matches!(err, StorageError::InvalidKeyType { .. }));
    assert_eq!(store.len().unwrap(), 0);
}
