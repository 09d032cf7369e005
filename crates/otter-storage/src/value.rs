//! Typed values carried through a string-only store

use serde_json::{Map, Value as JsonValue};

use crate::error::StorageResult;

/// A value as seen by callers of [`TypedStore`](crate::TypedStore).
///
/// Objects and arrays are kept apart from the scalar variants so that a
/// value decoded from JSON is always a container.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Null,
    Undefined,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Object(Map<String, JsonValue>),
    Array(Vec<JsonValue>),
    String(String),
}

impl StoredValue {
    pub fn is_null(&self) -> bool {
        matches!(self, StoredValue::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, StoredValue::Undefined)
    }

    /// Null or undefined.
    pub fn is_nullish(&self) -> bool {
        matches!(self, StoredValue::Null | StoredValue::Undefined)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StoredValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StoredValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StoredValue::Float(f) => Some(*f),
            StoredValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoredValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map<String, JsonValue>> {
        match self {
            StoredValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            StoredValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Short type tag, used in logs and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            StoredValue::Null => "null",
            StoredValue::Undefined => "undefined",
            StoredValue::Bool(_) => "boolean",
            StoredValue::Integer(_) => "integer",
            StoredValue::Float(_) => "float",
            StoredValue::Object(_) => "object",
            StoredValue::Array(_) => "array",
            StoredValue::String(_) => "string",
        }
    }

    /// Render the text written to the backing store.
    ///
    /// Containers are JSON-encoded; everything else takes its natural
    /// string form.
    pub fn to_raw(&self) -> StorageResult<String> {
        let raw = match self {
            StoredValue::Null => "null".to_string(),
            StoredValue::Undefined => "undefined".to_string(),
            StoredValue::Bool(b) => b.to_string(),
            StoredValue::Integer(i) => i.to_string(),
            StoredValue::Float(f) => format_float(*f),
            StoredValue::Object(map) => serde_json::to_string(map)?,
            StoredValue::Array(items) => serde_json::to_string(items)?,
            StoredValue::String(s) => s.clone(),
        };
        Ok(raw)
    }

    /// Convert to JSON. Undefined and non-finite floats become `null`.
    pub fn into_json(self) -> JsonValue {
        match self {
            StoredValue::Null | StoredValue::Undefined => JsonValue::Null,
            StoredValue::Bool(b) => JsonValue::Bool(b),
            StoredValue::Integer(i) => JsonValue::Number(i.into()),
            StoredValue::Float(f) => serde_json::Number::from_f64(f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            StoredValue::Object(map) => JsonValue::Object(map),
            StoredValue::Array(items) => JsonValue::Array(items),
            StoredValue::String(s) => JsonValue::String(s),
        }
    }
}

/// Float text that reads back as a float: integral values keep a `.0`,
/// non-finite values use the host names.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl From<JsonValue> for StoredValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => StoredValue::Null,
            JsonValue::Bool(b) => StoredValue::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    StoredValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    StoredValue::Float(f)
                } else {
                    StoredValue::String(n.to_string())
                }
            }
            JsonValue::String(s) => StoredValue::String(s),
            JsonValue::Array(items) => StoredValue::Array(items),
            JsonValue::Object(map) => StoredValue::Object(map),
        }
    }
}

impl From<()> for StoredValue {
    fn from(_: ()) -> Self {
        StoredValue::Undefined
    }
}

impl From<bool> for StoredValue {
    fn from(b: bool) -> Self {
        StoredValue::Bool(b)
    }
}

impl From<i32> for StoredValue {
    fn from(i: i32) -> Self {
        StoredValue::Integer(i as i64)
    }
}

impl From<u32> for StoredValue {
    fn from(i: u32) -> Self {
        StoredValue::Integer(i as i64)
    }
}

impl From<i64> for StoredValue {
    fn from(i: i64) -> Self {
        StoredValue::Integer(i)
    }
}

impl From<f64> for StoredValue {
    fn from(f: f64) -> Self {
        StoredValue::Float(f)
    }
}

impl From<String> for StoredValue {
    fn from(s: String) -> Self {
        StoredValue::String(s)
    }
}

impl From<&str> for StoredValue {
    fn from(s: &str) -> Self {
        StoredValue::String(s.to_string())
    }
}

impl From<Vec<JsonValue>> for StoredValue {
    fn from(items: Vec<JsonValue>) -> Self {
        StoredValue::Array(items)
    }
}

impl From<Map<String, JsonValue>> for StoredValue {
    fn from(map: Map<String, JsonValue>) -> Self {
        StoredValue::Object(map)
    }
}

impl<T: Into<StoredValue>> From<Option<T>> for StoredValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => StoredValue::Null,
        }
    }
}
