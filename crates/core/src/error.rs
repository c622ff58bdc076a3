//! Error types for Atelier
//!
//! This module provides unified error handling for the non-network parts of
//! the workspace: form and record validation, configuration loading, IO and
//! serialization. HTTP failures live in `atelier_api::ClientError`.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Atelier
#[derive(Debug, Error)]
pub enum AppError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Field validation failed
    #[error("Field validation failed for '{resource}.{field}': {message}")]
    FieldValidation {
        resource: String,
        field: String,
        message: String,
    },

    /// A record could not be decoded into its declared schema
    #[error("Invalid '{resource}' record: {message}")]
    InvalidRecord { resource: String, message: String },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Unknown resource name
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// Field not found
    #[error("Field '{field}' not found in resource '{resource}'")]
    FieldNotFound { resource: String, field: String },

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl AppError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Create a field validation error
    pub fn field_validation(
        resource: impl Into<String>,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        AppError::FieldValidation {
            resource: resource.into(),
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create an invalid record error
    pub fn invalid_record(resource: impl Into<String>, msg: impl Into<String>) -> Self {
        AppError::InvalidRecord {
            resource: resource.into(),
            message: msg.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        AppError::InvalidConfig(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        AppError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::FieldValidation { .. }
                | AppError::InvalidRecord { .. }
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::UnknownResource(_) | AppError::FieldNotFound { .. }
        )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, AppError::Io(_) | AppError::FileRead { .. })
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> AppResult<T>;
}

impl<T, E: Into<AppError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> AppResult<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            AppError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
