//! Error types for the table controller.

use thiserror::Error;

/// Errors raised by [`TableController`](crate::TableController) operations.
///
/// Server failures are also turned into error notices on the table, so a
/// host may ignore `Api` errors and simply re-render.
#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Api(#[from] crudtable_lib::error::Error),

    #[error("Missing required fields: {}", .fields.join(", "))]
    MissingRequired { fields: Vec<String> },

    #[error("Invalid value for fields: {}", .fields.join(", "))]
    InvalidValue { fields: Vec<String> },

    #[error("No delete is pending")]
    NoPendingDelete,

    #[error("No form is open")]
    NoOpenForm,

    #[error("Not permitted: {0}")]
    PermissionDenied(&'static str),

    #[error("Invalid configuration: {0}")]
    Config(#[source] serde_json::Error),

    #[error("Invalid action: {0}")]
    Action(#[source] serde_json::Error),
}

impl TableError {
    /// Returns `true` if the error came from the server or the transport.
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_message() {
        let err = TableError::MissingRequired {
            fields: vec!["name".into(), "email".into()],
        };
        assert_eq!(err.to_string(), "Missing required fields: name, email");
        assert!(!err.is_api());
    }
}
