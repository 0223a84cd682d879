//! Application layer for Variantry.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (versions, access, variants,
//!   previews, batches)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business rules itself. Numbering, diffing and access policy live in
//! `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    AccessService, BatchError, BatchOperation, BatchReport, BatchService, CreateOutcome,
    PreviewService, PublishedPreview, VariantService, VersionService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    ComponentCatalog, IdentityProvider, PreviewStorage, SubscriptionLookup, VersionRepository,
};

pub use error::ApplicationError;
