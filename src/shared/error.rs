//! Shared Error Types
//!
//! This module defines the validation errors raised by the domain layer.
//! The backend converts them into `400 Bad Request` responses.
//!
//! # Error Categories
//!
//! - `ValidationError` - A field failed a domain rule
//! - `DisallowedFields` - A patch referenced fields outside its whitelist
//! - `MalformedPayload` - A payload did not have the expected shape
//!
//! # Usage
//!
//! ```rust
//! use homeshare::shared::error::SharedError;
//!
//! let error = SharedError::validation("price", "must not be negative");
//! assert!(error.to_string().contains("price"));
//! ```
use thiserror::Error;

/// Validation errors that can occur while building or patching documents
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Update payload names fields outside the allowed set
    #[error("Fields not allowed in this update: {}", fields.join(", "))]
    DisallowedFields {
        /// The offending field names, in payload order
        fields: Vec<String>,
    },

    /// Payload could not be read as the expected document
    #[error("Malformed payload: {message}")]
    MalformedPayload {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new malformed payload error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err.to_string())
    }
}

/// Fail with a validation error when `value` is blank after trimming
pub fn require_non_blank(field: &str, value: &str) -> Result<(), SharedError> {
    if value.trim().is_empty() {
        return Err(SharedError::validation(field, "is required"));
    }
    Ok(())
}

/// Fail with a validation error when `value` is longer than `max` characters
pub fn require_max_chars(field: &str, value: &str, max: usize) -> Result<(), SharedError> {
    if value.chars().count() > max {
        return Err(SharedError::validation(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = SharedError::validation("email", "Invalid email format");
        match error {
            SharedError::ValidationError { field, message } => {
                assert_eq!(field, "email");
                assert_eq!(message, "Invalid email format");
            }
            _ => panic!("Expected ValidationError"),
        }
    }

    #[test]
    fn test_disallowed_fields_display() {
        let error = SharedError::DisallowedFields {
            fields: vec!["role".to_string(), "email".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Fields not allowed in this update: role, email"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{ invalid json }");
        let shared_error: SharedError = result.unwrap_err().into();
        assert!(matches!(shared_error, SharedError::MalformedPayload { .. }));
    }

    #[test]
    fn test_require_non_blank() {
        assert!(require_non_blank("title", "Sunny room").is_ok());
        assert_eq!(
            require_non_blank("title", "   "),
            Err(SharedError::validation("title", "is required"))
        );
    }

    #[test]
    fn test_require_max_chars_counts_characters() {
        assert!(require_max_chars("bio", "héllo", 5).is_ok());
        assert!(require_max_chars("bio", "héllo!", 5).is_err());
    }
}
