//! Configuration for [`TypedStore`](crate::TypedStore).

use serde::{Deserialize, Serialize};

/// What `get` does with text that matches a numeric pattern but is not a
/// well-formed number (`"."`, `"1.2.3"`, `"-"`, `"--5"`, `"5-3"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MalformedNumbers {
    /// Return the stored text unchanged.
    #[default]
    Raw,
    /// Parse the longest valid numeric prefix like `parseFloat`/`parseInt`,
    /// yielding a `NaN` float when there is none.
    HostParse,
}

/// Settings for value coercion on the read path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// Handling of malformed numeric-looking text.
    /// Default: `Raw`
    pub malformed_numbers: MalformedNumbers,
}

impl StoreConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Config that mirrors host numeric parsing for malformed numbers.
    pub fn host_parse() -> Self {
        Self {
            malformed_numbers: MalformedNumbers::HostParse,
        }
    }

    /// Set the malformed number policy.
    pub fn malformed_numbers(mut self, policy: MalformedNumbers) -> Self {
        self.malformed_numbers = policy;
        self
    }

    /// Load configuration from a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.malformed_numbers, MalformedNumbers::Raw);
        assert_eq!(StoreConfig::new(), config);
    }

    #[test]
    fn test_builder() {
        let config = StoreConfig::new().malformed_numbers(MalformedNumbers::HostParse);
        assert_eq!(config, StoreConfig::host_parse());
    }

    #[test]
    fn test_from_json() {
        let config = StoreConfig::from_json(r#"{ "malformedNumbers": "hostParse" }"#).unwrap();
        assert_eq!(config.malformed_numbers, MalformedNumbers::HostParse);

        let config = StoreConfig::from_json("{}").unwrap();
        assert_eq!(config, StoreConfig::default());

        assert!(StoreConfig::from_json(r#"{ "malformedNumbers": "loose" }"#).is_err());
    }
}
