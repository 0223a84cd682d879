//! Application layer errors.
//!
//! These errors represent failures in orchestration, not input validation.
//! Validation errors are `DomainError` from `crate::domain`.

use thiserror::Error;

use crate::domain::{ComponentId, CssFramework, Framework, VersionId};
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Caller is anonymous or lacks the admin role.
    #[error("Not authorized to {operation}: {reason}")]
    Unauthorized {
        operation: &'static str,
        reason: String,
    },

    #[error("Version not found: {id}")]
    VersionNotFound { id: VersionId },

    #[error("Component not found: {id}")]
    ComponentNotFound { id: ComponentId },

    /// Component exists but has no versions to fall back on.
    #[error("Component {component_id} has no versions")]
    NoVersions { component_id: ComponentId },

    /// No version stored for an explicitly requested variant.
    /// `variant` reads `framework/css`, with `*` for an unconstrained axis.
    #[error("No {variant} version of component {component_id}")]
    VariantUnavailable {
        component_id: ComponentId,
        variant: String,
    },

    #[error("Version {id} is the default version and cannot be deleted")]
    DefaultVersionDeletion { id: VersionId },

    #[error(
        "Version {version_number} already exists for {component_id} ({framework}/{css_framework})"
    )]
    DuplicateVersion {
        component_id: ComponentId,
        framework: Framework,
        css_framework: CssFramework,
        version_number: String,
    },

    /// Store access failed (lock poisoned, etc.).
    #[error("Version store error")]
    StoreLockError,

    #[error("Repository error: {reason}")]
    RepositoryError { reason: String },

    #[error("Storage error at {path}: {reason}")]
    StorageError { path: String, reason: String },

    #[error("Subscription lookup failed: {reason}")]
    SubscriptionLookupFailed { reason: String },
}

impl ApplicationError {
    pub fn unauthorized(operation: &'static str) -> Self {
        Self::Unauthorized {
            operation,
            reason: "admin role required".into(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Unauthorized { .. } => vec![
                "Mutations require an authenticated admin".into(),
                "Set identity.user and identity.role = \"admin\" in your config".into(),
            ],
            Self::VersionNotFound { .. } => vec![
                "Try: variantry version list <component> to see stored versions".into(),
            ],
            Self::ComponentNotFound { id } => vec![
                format!("Register it first: variantry component add {} <name>", id),
                "Try: variantry component list".into(),
            ],
            Self::NoVersions { component_id } => vec![format!(
                "Create one with: variantry version create {} --framework react ...",
                component_id
            )],
            Self::VariantUnavailable { component_id, .. } => vec![format!(
                "Try: variantry variants {} to see which pairings exist",
                component_id
            )],
            Self::DefaultVersionDeletion { .. } => vec![
                "Promote another version first with 'variantry version set-default'".into(),
            ],
            Self::DuplicateVersion { .. } => vec![
                "Another writer created this version concurrently".into(),
                "Re-run the command to pick up the next version number".into(),
            ],
            Self::StoreLockError => vec![
                "The version store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::StorageError { path, .. } => vec![
                format!("Failed to write: {}", path),
                "Check that you have write permissions".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized { .. } => ErrorCategory::Unauthorized,
            Self::VersionNotFound { .. }
            | Self::ComponentNotFound { .. }
            | Self::NoVersions { .. }
            | Self::VariantUnavailable { .. } => ErrorCategory::NotFound,
            Self::DefaultVersionDeletion { .. } | Self::DuplicateVersion { .. } => {
                ErrorCategory::Conflict
            }
            Self::StoreLockError
            | Self::RepositoryError { .. }
            | Self::StorageError { .. }
            | Self::SubscriptionLookupFailed { .. } => ErrorCategory::Internal,
        }
    }
}
