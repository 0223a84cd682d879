//! Variantry Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Variantry
//! component version engine, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          variantry-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (VersionService, AccessService, ...)   │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Repository, Catalog, Licenses, Store)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   variantry-adapters (Infrastructure)   │
//! │ (InMemoryVersionRepository, Snapshot)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (VersionNumber, ChangeSet, Preview)    │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use variantry_core::prelude::*;
//!
//! # fn demo(service: VersionService, admin: Principal) -> VariantryResult<()> {
//! let draft = VersionDraft::new("hero-1", Framework::React, CssFramework::TailwindV4, "<Hero/>")
//!     .with_full_code("export function Hero() { return <section/> }");
//!
//! let outcome = service.create(draft, Some(&admin), false)?;
//! println!("{} -> {}", outcome.kind(), outcome.version().version_number);
//! # Ok(())
//! # }
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        AccessService, BatchOperation, BatchReport, BatchService, CreateOutcome, PreviewService,
        VariantService, VersionService,
        ports::{
            ComponentCatalog, IdentityProvider, PreviewStorage, SubscriptionLookup,
            VersionRepository,
        },
    };
    pub use crate::domain::{
        AccessDecision, Component, ComponentId, ComponentVersion, CssFramework, Framework, Page,
        PageRequest, Principal, PrincipalId, VariantCell, VersionDraft, VersionId, VersionPatch,
    };
    pub use crate::error::{ErrorCategory, VariantryError, VariantryResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
