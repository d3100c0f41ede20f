//! Payload limits shared by the guard and the HTTP boundary.
//!
//! ```rust
//! use stridemcp_core::PayloadLimits;
//!
//! let limits = PayloadLimits::default().with_max_json_depth(10);
//! assert_eq!(limits.max_json_depth, 10);
//! assert_eq!(limits.max_array_length, 2000);
//! ```

use serde::{Deserialize, Serialize};

/// Maximum request body size in bytes (5 MiB)
pub const DEFAULT_MAX_PAYLOAD_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum nesting depth of a JSON document
pub const DEFAULT_MAX_JSON_DEPTH: usize = 20;

/// Maximum number of keys in a single JSON object
pub const DEFAULT_MAX_OBJECT_KEYS: usize = 500;

/// Maximum number of elements in a single JSON array
pub const DEFAULT_MAX_ARRAY_LENGTH: usize = 2000;

/// Maximum length of a JSON string or object key, in characters
pub const DEFAULT_MAX_STRING_LENGTH: usize = 500_000;

/// Limits enforced on untrusted request payloads.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadLimits {
    /// Maximum body size in bytes
    pub max_payload_size: u64,
    /// Maximum nesting depth (root value is depth 0)
    pub max_json_depth: usize,
    /// Maximum keys per object
    pub max_object_keys: usize,
    /// Maximum elements per array
    pub max_array_length: usize,
    /// Maximum characters per string or key
    pub max_string_length: usize,
}

impl Default for PayloadLimits {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            max_json_depth: DEFAULT_MAX_JSON_DEPTH,
            max_object_keys: DEFAULT_MAX_OBJECT_KEYS,
            max_array_length: DEFAULT_MAX_ARRAY_LENGTH,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
        }
    }
}

impl PayloadLimits {
    /// Set the maximum body size in bytes
    #[must_use]
    pub const fn with_max_payload_size(mut self, bytes: u64) -> Self {
        self.max_payload_size = bytes;
        self
    }

    /// Set the maximum nesting depth
    #[must_use]
    pub const fn with_max_json_depth(mut self, depth: usize) -> Self {
        self.max_json_depth = depth;
        self
    }

    /// Set the maximum keys per object
    #[must_use]
    pub const fn with_max_object_keys(mut self, keys: usize) -> Self {
        self.max_object_keys = keys;
        self
    }

    /// Set the maximum elements per array
    #[must_use]
    pub const fn with_max_array_length(mut self, len: usize) -> Self {
        self.max_array_length = len;
        self
    }

    /// Set the maximum characters per string or key
    #[must_use]
    pub const fn with_max_string_length(mut self, len: usize) -> Self {
        self.max_string_length = len;
        self
    }

    /// Body limit in the `usize` form axum's body limit expects.
    ///
    /// Saturates on targets where `usize` is narrower than `u64`.
    pub fn max_payload_size_usize(&self) -> usize {
        usize::try_from(self.max_payload_size).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = PayloadLimits::default();
        assert_eq!(limits.max_payload_size, 5_242_880);
        assert_eq!(limits.max_json_depth, 20);
        assert_eq!(limits.max_object_keys, 500);
        assert_eq!(limits.max_array_length, 2000);
        assert_eq!(limits.max_string_length, 500_000);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let limits: PayloadLimits = serde_json::from_str(r#"{"max_json_depth": 8}"#).unwrap();
        assert_eq!(limits.max_json_depth, 8);
        assert_eq!(limits.max_object_keys, DEFAULT_MAX_OBJECT_KEYS);
        assert_eq!(limits.max_payload_size, DEFAULT_MAX_PAYLOAD_SIZE);
    }
}
