//! Error type for REST calls

use atelier_core::AppError;
use atelier_model::FormErrors;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Error Type
// ============================================================================

/// Errors that can occur when talking to the API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned an error response (4xx or 5xx)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the declared schema
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Client-side validation failed; no request was sent
    #[error("Invalid form: {0}")]
    Validation(FormErrors),

    /// Local model or configuration error
    #[error(transparent)]
    App(#[from] AppError),
}

/// Error body the API may send
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: Option<String>,
}

/// What the user was doing when an error happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Loading data: shown inline with a retry button
    Load,
    /// Creating, updating or deleting: shown as a notification
    Mutation,
    /// Caught before sending: shown next to the fields
    Validation,
}

impl ClientError {
    /// Create an `Api` error from a status code and optional server message
    pub(crate) fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Server returned status {}", status));
        Self::Api { status, message }
    }

    /// Whether this is a "not found" (404) error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Whether the server rejected the payload (422)
    pub fn is_unprocessable(&self) -> bool {
        matches!(self, Self::Api { status: 422, .. })
    }

    /// Field errors caught client-side, if any
    pub fn form_errors(&self) -> Option<&FormErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Classify for display, given whether the failing call was a mutation
    pub fn kind(&self, mutation: bool) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::App(e) if e.is_validation() => ErrorKind::Validation,
            _ if mutation => ErrorKind::Mutation,
            _ => ErrorKind::Load,
        }
    }

    /// Get the user-facing error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Request(e) => {
                if e.is_timeout() {
                    "Request timed out. Please try again.".to_string()
                } else if e.is_connect() {
                    "Unable to connect to the server. Please check your connection.".to_string()
                } else {
                    "An unexpected network error occurred.".to_string()
                }
            }
            Self::Api { message, .. } => message.clone(),
            Self::Parse(_) => "Received an unexpected response from the server.".to_string(),
            Self::Validation(_) => "Please correct the highlighted fields.".to_string(),
            Self::App(e) => e.to_string(),
        }
    }
}

/// Result alias for API calls
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_status_uses_server_message() {
        let err = ClientError::from_status(409, Some("Code already used".to_string()));
        assert_eq!(err.user_message(), "Code already used");
        assert_eq!(err.to_string(), "API error (409): Code already used");
    }

    #[test]
    fn test_from_status_falls_back_to_status() {
        let err = ClientError::from_status(500, Some("  ".to_string()));
        assert_eq!(err.user_message(), "Server returned status 500");
        assert!(!err.is_not_found());
        assert!(ClientError::from_status(404, None).is_not_found());
    }

    #[test]
    fn test_kind_classification() {
        let api = ClientError::from_status(500, None);
        assert_eq!(api.kind(false), ErrorKind::Load);
        assert_eq!(api.kind(true), ErrorKind::Mutation);

        let mut errors = FormErrors::new();
        errors.insert("nom", "This field is required");
        let invalid = ClientError::Validation(errors);
        assert_eq!(invalid.kind(true), ErrorKind::Validation);
        assert_eq!(
            invalid.form_errors().and_then(|e| e.get("nom")),
            Some("This field is required")
        );

        let schema = ClientError::from(AppError::invalid_record("ofs", "bad date"));
        assert_eq!(schema.kind(true), ErrorKind::Validation);
    }
}
