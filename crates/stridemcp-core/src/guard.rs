//! Payload guard: size and structural complexity checks.
//!
//! Both checks run before any request processing. [`PayloadGuard::check_size`]
//! works on a declared length so the body never has to be read when it is
//! oversized; [`PayloadGuard::validate_complexity`] walks a parsed document
//! depth-first and stops at the first violation.

use crate::limits::PayloadLimits;
use serde::Serialize;
use serde_json::Value;

/// Body size violation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// Declared or actual body size above the limit
    #[error("Payload size {size} bytes exceeds maximum of {max} bytes")]
    TooLarge {
        /// Observed size in bytes
        size: u64,
        /// Configured maximum
        max: u64,
    },
}

/// Structural complexity violation, reported for the first offending node
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComplexityError {
    /// A value sits deeper than the maximum depth
    #[error("JSON depth exceeded: {depth} levels (max: {max})")]
    DepthExceeded {
        /// Depth of the offending value
        depth: usize,
        /// Configured maximum
        max: usize,
    },
    /// An object has too many keys
    #[error("Too many object keys: {actual} (max: {max})")]
    TooManyKeys {
        /// Number of keys found
        actual: usize,
        /// Configured maximum
        max: usize,
    },
    /// An object key is longer than the string limit
    #[error("Object key too long: {actual} characters (max: {max})")]
    KeyTooLong {
        /// Key length in characters
        actual: usize,
        /// Configured maximum
        max: usize,
    },
    /// An array has too many elements
    #[error("Array too large: {actual} elements (max: {max})")]
    ArrayTooLarge {
        /// Number of elements found
        actual: usize,
        /// Configured maximum
        max: usize,
    },
    /// A string is longer than the string limit
    #[error("String too long: {actual} characters (max: {max})")]
    StringTooLong {
        /// String length in characters
        actual: usize,
        /// Configured maximum
        max: usize,
    },
}

/// `{valid, error}` summary of a complexity check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexityReport {
    /// Whether the document is within all limits
    pub valid: bool,
    /// Reason for rejection, when invalid
    pub error: Option<String>,
}

impl From<Result<(), ComplexityError>> for ComplexityReport {
    fn from(result: Result<(), ComplexityError>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                error: None,
            },
            Err(err) => Self {
                valid: false,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Validates untrusted payloads against [`PayloadLimits`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadGuard {
    limits: PayloadLimits,
}

impl PayloadGuard {
    /// Create a guard enforcing the given limits
    pub const fn new(limits: PayloadLimits) -> Self {
        Self { limits }
    }

    /// Limits this guard enforces
    pub const fn limits(&self) -> &PayloadLimits {
        &self.limits
    }

    /// Reject a declared body length above the maximum payload size.
    pub fn check_size(&self, declared: u64) -> Result<(), PayloadError> {
        if declared > self.limits.max_payload_size {
            return Err(PayloadError::TooLarge {
                size: declared,
                max: self.limits.max_payload_size,
            });
        }
        Ok(())
    }

    /// Walk `value` and fail on the first node that breaks a limit.
    ///
    /// Objects are visited in key insertion order, arrays in index order.
    pub fn validate_complexity(&self, value: &Value) -> Result<(), ComplexityError> {
        self.walk(value, 0)
    }

    /// Same check as [`validate_complexity`](Self::validate_complexity) in
    /// `{valid, error}` form.
    pub fn complexity_report(&self, value: &Value) -> ComplexityReport {
        self.validate_complexity(value).into()
    }

    /// Depth check on raw JSON text, for documents too deep to parse into a
    /// [`Value`].
    ///
    /// Counts container nesting without recursion; brackets inside strings
    /// are skipped. The reported depth is the first level past the limit,
    /// matching what [`validate_complexity`](Self::validate_complexity) reports.
    pub fn check_raw_depth(&self, bytes: &[u8]) -> Result<(), ComplexityError> {
        let max = self.limits.max_json_depth;
        if raw_nesting(bytes) > max.saturating_add(1) {
            return Err(ComplexityError::DepthExceeded {
                depth: max + 1,
                max,
            });
        }
        Ok(())
    }

    fn walk(&self, value: &Value, depth: usize) -> Result<(), ComplexityError> {
        let limits = &self.limits;
        if depth > limits.max_json_depth {
            return Err(ComplexityError::DepthExceeded {
                depth,
                max: limits.max_json_depth,
            });
        }

        match value {
            Value::Object(map) => {
                if map.len() > limits.max_object_keys {
                    return Err(ComplexityError::TooManyKeys {
                        actual: map.len(),
                        max: limits.max_object_keys,
                    });
                }
                for (key, child) in map {
                    if let Some(actual) = self.overlong(key) {
                        return Err(ComplexityError::KeyTooLong {
                            actual,
                            max: limits.max_string_length,
                        });
                    }
                    self.walk(child, depth + 1)?;
                }
            }
            Value::Array(items) => {
                if items.len() > limits.max_array_length {
                    return Err(ComplexityError::ArrayTooLarge {
                        actual: items.len(),
                        max: limits.max_array_length,
                    });
                }
                for item in items {
                    self.walk(item, depth + 1)?;
                }
            }
            Value::String(s) => {
                if let Some(actual) = self.overlong(s) {
                    return Err(ComplexityError::StringTooLong {
                        actual,
                        max: limits.max_string_length,
                    });
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
        Ok(())
    }

    /// Character count of `s` when it exceeds the string limit.
    fn overlong(&self, s: &str) -> Option<usize> {
        // A UTF-8 string never has more chars than bytes.
        if s.len() <= self.limits.max_string_length {
            return None;
        }
        let chars = s.chars().count();
        (chars > self.limits.max_string_length).then_some(chars)
    }
}

/// Deepest count of simultaneously open `[` / `{` in `bytes`.
fn raw_nesting(bytes: &[u8]) -> usize {
    let mut open = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for &byte in bytes {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                open += 1;
                deepest = deepest.max(open);
            }
            b']' | b'}' => open = open.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}
