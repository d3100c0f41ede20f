//! Error sanitization.
//!
//! Every failure that originates in code the caller does not control is
//! replaced by a fixed message carrying a short correlation id. The full
//! detail (type, message, source chain, backtrace and the call-site context)
//! is written to the server log under the same id.
//!
//! ```rust
//! use stridemcp_core::sanitize;
//!
//! let err = std::io::Error::other("DB failed at /secret/path.py");
//! let sanitized = sanitize(&err, "Tool execution: demo");
//! assert!(sanitized.message.starts_with("An internal error occurred. Error ID: "));
//! assert!(!sanitized.message.contains("/secret/path.py"));
//! ```

use std::any::Any;
use std::backtrace::Backtrace;

/// Prefix of every sanitized client message
pub const GENERIC_ERROR_MESSAGE: &str = "An internal error occurred. Error ID:";

/// Hex characters kept from the UUID
const ERROR_ID_LEN: usize = 8;

/// Client-safe replacement for an internal error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedError {
    /// Correlation id, also present in the server log
    pub error_id: String,
    /// Message safe to send to the client
    pub message: String,
}

impl SanitizedError {
    fn with_new_id() -> Self {
        let mut error_id = uuid::Uuid::new_v4().simple().to_string();
        error_id.truncate(ERROR_ID_LEN);
        let message = format!("{GENERIC_ERROR_MESSAGE} {error_id}");
        Self { error_id, message }
    }
}

/// Log `error` in full and return its client-safe replacement.
///
/// `context` names the boundary, e.g. `"Tool execution: generate_threat_report"`.
pub fn sanitize<E>(error: &E, context: &str) -> SanitizedError
where
    E: std::error::Error + ?Sized,
{
    let sanitized = SanitizedError::with_new_id();

    let mut sources = Vec::new();
    let mut next = error.source();
    while let Some(source) = next {
        sources.push(source.to_string());
        next = source.source();
    }

    tracing::error!(
        error_id = %sanitized.error_id,
        context,
        error_type = std::any::type_name::<E>(),
        error = %error,
        detail = ?error,
        sources = %sources.join(": "),
        backtrace = %Backtrace::capture(),
        "internal error"
    );

    sanitized
}

/// Log a caught panic payload and return its client-safe replacement.
pub fn sanitize_panic(payload: &(dyn Any + Send), context: &str) -> SanitizedError {
    let sanitized = SanitizedError::with_new_id();

    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());

    tracing::error!(
        error_id = %sanitized.error_id,
        context,
        error_type = "panic",
        error = %detail,
        "internal error"
    );

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("DB failed at /secret/path.py")]
    struct DatabaseConnectionError {
        #[source]
        cause: std::io::Error,
    }

    fn db_error() -> DatabaseConnectionError {
        DatabaseConnectionError {
            cause: std::io::Error::other("password=hunter2 rejected by 10.0.0.5"),
        }
    }

    #[test]
    fn test_message_shape() {
        let sanitized = sanitize(&db_error(), "Tool execution: demo");
        assert_eq!(
            sanitized.message,
            format!("An internal error occurred. Error ID: {}", sanitized.error_id)
        );
        assert!(sanitized.message.contains("Error ID:"));
    }

    #[test]
    fn test_error_id_is_8_hex_chars() {
        let sanitized = sanitize(&db_error(), "ctx");
        assert_eq!(sanitized.error_id.len(), 8);
        assert!(sanitized.error_id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_error_ids_differ() {
        let a = sanitize(&db_error(), "ctx");
        let b = sanitize(&db_error(), "ctx");
        assert_ne!(a.error_id, b.error_id);
    }

    #[test]
    fn test_no_detail_leaks() {
        let sanitized = sanitize(&db_error(), "Tool execution: demo");
        assert!(!sanitized.message.contains("/secret/path.py"));
        assert!(!sanitized.message.contains("DB failed"));
        assert!(!sanitized.message.contains("DatabaseConnectionError"));
        assert!(!sanitized.message.contains("hunter2"));
        assert!(!sanitized.message.contains("10.0.0.5"));
        assert!(!sanitized.message.contains("demo"));
    }

    #[test]
    fn test_sanitize_dyn_error() {
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(db_error());
        let sanitized = sanitize(boxed.as_ref(), "ctx");
        assert!(!sanitized.message.contains("secret"));
    }

    #[test]
    fn test_sanitize_panic_payloads() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("index out of bounds at /src/x.rs"));
        let sanitized = sanitize_panic(owned.as_ref(), "HTTP POST request handling");
        assert!(sanitized.message.starts_with(GENERIC_ERROR_MESSAGE));
        assert!(!sanitized.message.contains("/src/x.rs"));

        let other: Box<dyn Any + Send> = Box::new(42_u32);
        let sanitized = sanitize_panic(other.as_ref(), "ctx");
        assert!(sanitized.message.starts_with(GENERIC_ERROR_MESSAGE));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_client_message_never_contains_error_text(
                dir in "[a-z]{3,10}",
                file in "[a-z]{3,10}",
                secret in "[A-Za-z0-9]{12,24}",
            ) {
                let message = format!("failed opening /{dir}/{file}.py with token {secret}");
                let err = std::io::Error::other(message.clone());
                let sanitized = sanitize(&err, "ctx");

                let path = format!("/{}/{}.py", dir, file);
                let debug_brace = "Error {";
                prop_assert!(!sanitized.message.contains(&message));
                prop_assert!(!sanitized.message.contains(&path));
                prop_assert!(!sanitized.message.contains(&secret));
                prop_assert!(!sanitized.message.contains(debug_brace));
                prop_assert!(sanitized.message.contains("Error ID:"));
            }
        }
    }
}
