//! Binding error definitions.

use thiserror::Error;

/// Errors produced while binding request fields to handler inputs.
///
/// Both variants are client errors: the HTTP layer maps them to
/// `400 Bad Request`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A required field is absent and has no default.
    #[error("Required request parameter '{name}' is not present")]
    Missing { name: String },

    /// A field is present but cannot be parsed as the declared type.
    #[error("Failed to convert value '{value}' of parameter '{name}' to {expected}")]
    InvalidFormat {
        name: String,
        value: String,
        expected: &'static str,
    },
}

impl BindError {
    pub fn missing(name: impl Into<String>) -> Self {
        Self::Missing { name: name.into() }
    }

    pub fn invalid(name: impl Into<String>, value: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidFormat {
            name: name.into(),
            value: value.into(),
            expected,
        }
    }

    /// Name of the offending parameter.
    pub fn parameter(&self) -> &str {
        match self {
            BindError::Missing { name } => name,
            BindError::InvalidFormat { name, .. } => name,
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BindError::Missing { .. } => "missing",
            BindError::InvalidFormat { .. } => "invalid_format",
        }
    }
}

/// Result type for binding operations.
pub type BindResult<T> = Result<T, BindError>;

/// Errors detected while building binding rules, before any request is served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The default value of a rule does not parse as the rule's target type.
    #[error("Default value '{default}' of parameter '{name}' is not a valid {expected}")]
    InvalidDefault {
        name: String,
        default: String,
        expected: &'static str,
    },

    /// A record schema declares the same field twice.
    #[error("Field '{name}' is declared more than once in record '{record}'")]
    DuplicateField { record: &'static str, name: &'static str },

    /// A record reads a field that its schema does not declare, or reads it
    /// as a type that does not match the declared kind.
    #[error("Field '{name}' of record '{record}' is read as a type its schema does not declare")]
    FieldMismatch { record: &'static str, name: String },
}
