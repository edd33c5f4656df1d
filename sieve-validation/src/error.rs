//! Error types for sieve operations
//!
//! Validation failures never show up here; they are recorded as messages in a
//! [`MessageBag`](crate::MessageBag). These errors signal that the calling code
//! or its environment is wrong.

use thiserror::Error;

/// Errors that can occur while setting up or driving a validation.
#[derive(Debug, Error)]
pub enum SieveError {
    /// A size or membership rule ran before the value's type was asserted
    #[error("Cannot apply `{rule}` to ambiguous variable `{field}`; assert its type first")]
    AmbiguousType { field: String, rule: &'static str },

    /// Raw input is not a mapping
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON parse error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Form body parse error
    #[error("Form decode error: {0}")]
    UrlEncoded(#[from] serde_urlencoded::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SieveError {
    /// Whether this error is a bug in the calling code rather than bad input
    /// or a broken environment.
    pub fn is_misuse(&self) -> bool {
        matches!(self, SieveError::AmbiguousType { .. })
    }
}
