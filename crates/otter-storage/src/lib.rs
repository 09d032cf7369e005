//! Otter Storage - Type-preserving key-value storage for Otter runtime
//!
//! Wraps a string-only store (the `localStorage` model) and restores value
//! types on read: null, undefined, integers, floats, booleans, JSON objects
//! and arrays, and plain strings.
//!
//! # Usage
//!
//! ```typescript
//! import { storage } from "otter";
//!
//! storage.set("count", 5);
//! storage.get("count");              // 5
//! storage.set("user", { id: 1 });
//! storage.get("user");               // { id: 1 }
//! storage.exists("user");            // true
//! storage.remove("user");
//! storage.clear();
//! ```
//!
//! Type inference is a heuristic over the stored text, so strings that look
//! like numbers, booleans or JSON read back as those types.

pub mod coerce;
pub mod ops;
pub mod storage;

mod config;
mod error;
mod store;
mod value;

pub use coerce::{Coercer, RULES, Rule};
pub use config::{MalformedNumbers, StoreConfig};
pub use error::{BackendError, StorageError, StorageResult};
pub use storage::{MemoryStorage, RedbStorage, Storage};
pub use store::TypedStore;
pub use value::StoredValue;
