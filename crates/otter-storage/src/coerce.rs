//! Read-path type inference.
//!
//! Stored text is matched against an ordered list of rules; the first rule
//! that both matches and decodes wins. Text no rule claims is returned as a
//! string. The inference is heuristic: a string that was written as `"42"`
//! reads back as the integer `42`.

use std::borrow::Cow;
use std::num::IntErrorKind;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::config::{MalformedNumbers, StoreConfig};
use crate::value::StoredValue;

static FLOAT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9.]+$").expect("valid regex"));

static INTEGER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-0-9]+$").expect("valid regex"));

/// One step of the coercion order: a pattern test plus a decoder.
///
/// `decode` returning `None` lets the text fall through to later rules.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    matches: fn(&str) -> bool,
    decode: fn(&str, &StoreConfig) -> Option<StoredValue>,
}

impl Rule {
    pub const fn new(
        name: &'static str,
        matches: fn(&str) -> bool,
        decode: fn(&str, &StoreConfig) -> Option<StoredValue>,
    ) -> Self {
        Self {
            name,
            matches,
            decode,
        }
    }

    pub fn matches(&self, raw: &str) -> bool {
        (self.matches)(raw)
    }

    pub fn apply(&self, raw: &str, config: &StoreConfig) -> Option<StoredValue> {
        if self.matches(raw) {
            (self.decode)(raw, config)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Built-in coercion order.
pub static RULES: &[Rule] = &[
    Rule::new("null", |raw| raw == "null", |_, _| Some(StoredValue::Null)),
    Rule::new(
        "undefined",
        |raw| raw == "undefined",
        |_, _| Some(StoredValue::Undefined),
    ),
    Rule::new("float", |raw| FLOAT_PATTERN.is_match(raw), decode_float),
    Rule::new("integer", |raw| INTEGER_PATTERN.is_match(raw), decode_integer),
    Rule::new(
        "boolean",
        |raw| raw == "true" || raw == "false",
        |raw, _| Some(StoredValue::Bool(raw == "true")),
    ),
    Rule::new(
        "json",
        |raw| raw.starts_with('{') || raw.starts_with('['),
        decode_json,
    ),
];

/// Applies a rule list to stored text.
#[derive(Debug, Clone)]
pub struct Coercer {
    rules: Cow<'static, [Rule]>,
    config: StoreConfig,
}

impl Default for Coercer {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl Coercer {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            rules: Cow::Borrowed(RULES),
            config,
        }
    }

    /// Insert a rule ahead of the rule at `index`. An index past the end
    /// appends.
    pub fn with_rule_at(mut self, index: usize, rule: Rule) -> Self {
        let rules = self.rules.to_mut();
        let index = index.min(rules.len());
        rules.insert(index, rule);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn coerce(&self, raw: &str) -> StoredValue {
        self.decode(raw)
            .map(|(_, value)| value)
            .unwrap_or_else(|| StoredValue::String(raw.to_string()))
    }

    /// Name of the rule that decodes `raw`, or `None` when it stays a string.
    pub fn rule_for(&self, raw: &str) -> Option<&'static str> {
        self.decode(raw).map(|(name, _)| name)
    }

    fn decode(&self, raw: &str) -> Option<(&'static str, StoredValue)> {
        self.rules.iter().find_map(|rule| {
            let value = rule.apply(raw, &self.config)?;
            tracing::trace!(rule = rule.name, "coerced stored value");
            Some((rule.name, value))
        })
    }
}

/// Coerce with the built-in rules.
pub fn coerce(raw: &str, config: &StoreConfig) -> StoredValue {
    Coercer::new(config.clone()).coerce(raw)
}

/// Digits and periods. Text without a period is an integer when it fits.
fn decode_float(raw: &str, config: &StoreConfig) -> Option<StoredValue> {
    if !raw.contains('.') {
        return Some(match raw.parse::<i64>() {
            Ok(i) => StoredValue::Integer(i),
            Err(_) => StoredValue::Float(raw.parse::<f64>().unwrap_or(f64::NAN)),
        });
    }

    match raw.parse::<f64>() {
        Ok(f) => Some(StoredValue::Float(f)),
        Err(_) => match config.malformed_numbers {
            MalformedNumbers::Raw => None,
            MalformedNumbers::HostParse => Some(StoredValue::Float(parse_float_prefix(raw))),
        },
    }
}

/// Digits with minus signs. Overflow widens to a float.
fn decode_integer(raw: &str, config: &StoreConfig) -> Option<StoredValue> {
    match raw.parse::<i64>() {
        Ok(i) => Some(StoredValue::Integer(i)),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            raw.parse::<f64>().ok().map(StoredValue::Float)
        }
        Err(_) => match config.malformed_numbers {
            MalformedNumbers::Raw => None,
            MalformedNumbers::HostParse => Some(parse_int_prefix(raw)),
        },
    }
}

fn decode_json(raw: &str, _config: &StoreConfig) -> Option<StoredValue> {
    match parse_json(raw) {
        Ok(JsonValue::Object(map)) => Some(StoredValue::Object(map)),
        Ok(JsonValue::Array(items)) => Some(StoredValue::Array(items)),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "stored text is not a JSON container");
            None
        }
    }
}

/// Parse JSON of any nesting depth. The stack grows on demand instead of
/// stopping at serde_json's default depth of 128.
fn parse_json(raw: &str) -> serde_json::Result<JsonValue> {
    let mut de = serde_json::Deserializer::from_str(raw);
    de.disable_recursion_limit();
    let value = JsonValue::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Longest prefix that parses as a float, `NaN` when there is none.
fn parse_float_prefix(raw: &str) -> f64 {
    let mut ends: Vec<usize> = raw.char_indices().map(|(i, _)| i).collect();
    ends.push(raw.len());

    ends.iter()
        .rev()
        .filter(|&&end| end > 0)
        .find_map(|&end| raw[..end].parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Optional sign and the digits that follow it; `NaN` when there are none.
fn parse_int_prefix(raw: &str) -> StoredValue {
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return StoredValue::Float(f64::NAN);
    }

    let signed = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };
    match signed.parse::<i64>() {
        Ok(i) => StoredValue::Integer(i),
        Err(_) => StoredValue::Float(signed.parse::<f64>().unwrap_or(f64::NAN)),
    }
}
