//! Infrastructure adapters for Variantry.
//!
//! This crate implements the ports defined in
//! `variantry_core::application::ports`. It contains all external
//! dependencies and I/O operations.

pub mod catalog;
pub mod identity;
pub mod licenses;
pub mod repository;
pub mod snapshot;
pub mod storage;

// Re-export commonly used adapters
pub use catalog::InMemoryCatalog;
pub use identity::StaticIdentity;
pub use licenses::{InMemoryLicenses, LicenseGrant, LicenseTier};
pub use repository::InMemoryVersionRepository;
pub use snapshot::{Snapshot, SnapshotStore};
pub use storage::{LocalStorage, MemoryStorage};
