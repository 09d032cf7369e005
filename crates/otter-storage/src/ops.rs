//! JSON-argument ops for host bindings.
//!
//! Scripts call into the store with loosely typed arguments, so the key's
//! type is only known at runtime. Each op takes `[{ "key": ..., "value": ... }]`
//! and answers with a JSON value.

use serde_json::{Value as JsonValue, json};

use crate::error::{StorageError, StorageResult};
use crate::storage::Storage;
use crate::store::TypedStore;
use crate::value::StoredValue;

/// Op names accepted by [`call`].
pub const OP_NAMES: &[&str] = &[
    "get", "set", "exists", "remove", "clear", "keys", "len",
];

/// Dispatch an op by name.
pub fn call<S: Storage>(
    store: &TypedStore<S>,
    name: &str,
    args: &[JsonValue],
) -> StorageResult<JsonValue> {
    match name {
        "get" => op_get(store, args),
        "set" => op_set(store, args),
        "exists" => op_exists(store, args),
        "remove" => op_remove(store, args),
        "clear" => op_clear(store, args),
        "keys" => op_keys(store, args),
        "len" => op_len(store, args),
        other => Err(StorageError::UnknownOp(other.to_string())),
    }
}

/// Helper to get the key of the first argument
fn get_key(args: &[JsonValue]) -> StorageResult<&str> {
    let key = args
        .first()
        .and_then(|arg| arg.get("key"))
        .ok_or(StorageError::MissingArgument("key"))?;

    key.as_str().ok_or(StorageError::InvalidKeyType {
        found: json_type_name(key),
    })
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Get a value
pub fn op_get<S: Storage>(store: &TypedStore<S>, args: &[JsonValue]) -> StorageResult<JsonValue> {
    let key = get_key(args)?;
    Ok(store.get(key)?.into_json())
}

/// Set a value. An absent `value` stores undefined.
pub fn op_set<S: Storage>(store: &TypedStore<S>, args: &[JsonValue]) -> StorageResult<JsonValue> {
    let key = get_key(args)?;
    let value = args
        .first()
        .and_then(|arg| arg.get("value"))
        .cloned()
        .map_or(StoredValue::Undefined, StoredValue::from);

    store.set(key, value)?;
    Ok(json!(true))
}

/// Check if a key exists
pub fn op_exists<S: Storage>(
    store: &TypedStore<S>,
    args: &[JsonValue],
) -> StorageResult<JsonValue> {
    let key = get_key(args)?;
    Ok(json!(store.exists(key)?))
}

/// Delete a key
pub fn op_remove<S: Storage>(
    store: &TypedStore<S>,
    args: &[JsonValue],
) -> StorageResult<JsonValue> {
    let key = get_key(args)?;
    store.remove(key)?;
    Ok(json!(true))
}

/// Clear all keys
pub fn op_clear<S: Storage>(
    store: &TypedStore<S>,
    _args: &[JsonValue],
) -> StorageResult<JsonValue> {
    store.clear()?;
    Ok(json!(true))
}

/// Get all keys
pub fn op_keys<S: Storage>(
    store: &TypedStore<S>,
    _args: &[JsonValue],
) -> StorageResult<JsonValue> {
    Ok(json!(store.keys()?))
}

/// Get the number of keys
pub fn op_len<S: Storage>(store: &TypedStore<S>, _args: &[JsonValue]) -> StorageResult<JsonValue> {
    Ok(json!(store.len()?))
}
