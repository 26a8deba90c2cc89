//! Lint configuration passed to engines.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Option-name to option-value mapping, as found in a `.jshintrc`.
///
/// Resolved once per cycle and never mutated by engines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LintConfig {
    options: Map<String, Value>,
}

impl LintConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from a JSON object.
    pub fn from_map(options: Map<String, Value>) -> Self {
        Self { options }
    }

    /// Returns a boolean option, `None` when absent or not a boolean.
    pub fn bool_option(&self, key: &str) -> Option<bool> {
        self.options.get(key).and_then(Value::as_bool)
    }

    /// Returns an unsigned integer option, `None` when absent or not a number.
    pub fn u64_option(&self, key: &str) -> Option<u64> {
        self.options.get(key).and_then(Value::as_u64)
    }

    /// Sets an option, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.options.insert(key.into(), value)
    }

    /// Computes a hash of the configuration for cache invalidation.
    ///
    /// Keys are serialized in sorted order, so equal configs hash equally.
    pub fn hash(&self) -> String {
        let json = serde_json::to_string(&self.options).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

impl From<Map<String, Value>> for LintConfig {
    fn from(options: Map<String, Value>) -> Self {
        Self::from_map(options)
    }
}
