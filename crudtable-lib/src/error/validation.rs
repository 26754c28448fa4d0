//! Validation error types

use std::fmt;

/// Error information for a specific field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Human-readable validation error message.
    pub message: String,
}

impl FieldValidationError {
    /// Creates a new field validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The server rejected submitted data.
///
/// Servers answer either with a single message or with a mapping of field
/// name to messages; both shapes end up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// HTTP status the rejection came with.
    pub status: u16,
    /// Form-level message, if any.
    pub message: Option<String>,
    /// Per-field messages, in server order.
    pub fields: Vec<FieldValidationError>,
}

impl ValidationError {
    /// Creates a validation error with only a form-level message.
    pub fn message(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            fields: Vec::new(),
        }
    }

    /// Creates a validation error from per-field messages.
    pub fn with_fields(status: u16, fields: Vec<FieldValidationError>) -> Self {
        Self {
            status,
            message: None,
            fields,
        }
    }

    /// Returns the messages reported for one field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |f| f.field == field)
            .map(|f| f.message.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.message.iter().cloned().collect();
        parts.extend(self.fields.iter().map(|e| e.to_string()));
        if parts.is_empty() {
            write!(f, "{}", super::GENERIC_ERROR_MESSAGE)
        } else {
            write!(f, "{}", parts.join("; "))
        }
    }
}

impl std::error::Error for ValidationError {}
