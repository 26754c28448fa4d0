//! Error types

mod api;
mod validation;

pub use api::*;
pub use validation::*;

/// Fallback message when the server does not explain a failure.
pub const GENERIC_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Top-level error type for resource API calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport or HTTP level failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The server rejected submitted data.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The resource or item does not exist.
    #[error("Not found: {resource}{}", id_suffix(.id))]
    NotFound {
        /// Resource name.
        resource: String,
        /// Item id, if the request targeted a single item.
        id: Option<String>,
    },

    /// A rison `q` parameter could not be encoded or decoded.
    #[error("Query decode error at offset {offset}: {message}")]
    Decode {
        /// Description of the problem.
        message: String,
        /// Byte offset in the input.
        offset: usize,
    },
}

fn id_suffix(id: &Option<String>) -> String {
    id.as_deref().map(|id| format!("/{id}")).unwrap_or_default()
}

impl Error {
    /// Creates a new decode error.
    pub fn decode(message: impl Into<String>, offset: usize) -> Self {
        Self::Decode {
            message: message.into(),
            offset,
        }
    }

    /// Returns a human-readable message suitable for showing to a user.
    ///
    /// Uses the server-provided message when there is one and falls back to
    /// [`GENERIC_ERROR_MESSAGE`] otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Http { message, .. }) if !message.trim().is_empty() => {
                message.clone()
            }
            Self::Api(ApiError::Network(_)) => "Could not reach the server.".to_string(),
            Self::Api(ApiError::Timeout(_)) => "The server took too long to respond.".to_string(),
            Self::Api(_) => GENERIC_ERROR_MESSAGE.to_string(),
            Self::Validation(err) => err.to_string(),
            Self::NotFound { .. } => "Record not found.".to_string(),
            Self::Decode { .. } => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// Returns `true` if this is a validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` if this is a not-found failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
