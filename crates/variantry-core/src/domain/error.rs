// ============================================================================
// domain/error.rs - VALIDATION ERROR DOMAIN
// ============================================================================

use thiserror::Error;

use crate::error::ErrorCategory;

/// Root domain error type.
///
/// Everything the pure domain layer can reject: malformed payloads,
/// unknown variant tags, bad identifiers and path violations.
///
/// All errors are:
/// - Cloneable (batch reports keep them per item)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Unknown {axis} '{value}'")]
    UnknownVariant { axis: &'static str, value: String },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Duplicate file path in version: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Invalid page request: {0}")]
    InvalidPage(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingRequiredField { field } => vec![
                format!("Provide a value for '{}'", field),
                "Preview code and component id are always required".into(),
            ],
            Self::UnknownVariant { axis, value } => vec![
                format!("'{}' is not a supported {}", value, axis),
                match *axis {
                    "framework" => "Supported: react, vue, angular, svelte, html".into(),
                    "css framework" => "Supported: tailwind_v3, tailwind_v4, vanilla".into(),
                    _ => "Check documentation for supported values".into(),
                },
            ],
            Self::DuplicatePath { path } => vec![
                format!("'{}' appears more than once in the files list", path),
                "Each bundled file needs a unique relative path".into(),
            ],
            Self::AbsolutePathNotAllowed { path } => vec![
                format!("'{}' is absolute", path),
                "Use paths relative to the component root, e.g. components/Button.tsx".into(),
            ],
            Self::InvalidIdentifier(msg) => vec![
                format!("Details: {}", msg),
                "Version ids are UUIDs as printed by 'variantry version list'".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    ///
    /// Every domain error is a validation failure of caller input.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }
}
