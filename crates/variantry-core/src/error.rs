//! Unified error handling for Variantry Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Variantry Core operations.
///
/// This enum wraps all possible errors that can occur when using
/// variantry-core, providing a unified interface for error handling.
#[derive(Debug, Error, Clone)]
pub enum VariantryError {
    /// Errors from the domain layer (invalid input).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl VariantryError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Run 'variantry config list' to inspect the effective settings".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Variantry".into(),
                "Re-run with -vvv and include the log when reporting it".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(
                ApplicationError::StoreLockError | ApplicationError::SubscriptionLookupFailed { .. }
            )
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Error categories for UI display and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    Configuration,
    Internal,
}

impl ErrorCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Unauthorized => "unauthorized",
            Self::Configuration => "configuration",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convenient result type alias.
pub type VariantryResult<T> = Result<T, VariantryError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> VariantryResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> VariantryResult<T> {
        self.map_err(|e| VariantryError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VersionId;

    #[test]
    fn categories_flow_through_layers() {
        let domain: VariantryError = DomainError::MissingRequiredField {
            field: "code_preview",
        }
        .into();
        assert_eq!(domain.category(), ErrorCategory::Validation);

        let missing: VariantryError = ApplicationError::VersionNotFound {
            id: VersionId::generate(),
        }
        .into();
        assert_eq!(missing.category(), ErrorCategory::NotFound);

        let denied: VariantryError = ApplicationError::Unauthorized {
            operation: "delete",
            reason: "admin role required".into(),
        }
        .into();
        assert_eq!(denied.category(), ErrorCategory::Unauthorized);
    }

    #[test]
    fn context_wraps_as_internal() {
        let io: Result<(), std::io::Error> = Err(std::io::Error::other("disk full"));
        let err = io.context("saving snapshot").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(err.to_string().contains("saving snapshot: disk full"));
    }

    #[test]
    fn lock_errors_are_retryable() {
        assert!(VariantryError::from(ApplicationError::StoreLockError).is_retryable());
        assert!(!VariantryError::internal("boom").is_retryable());
    }
}
