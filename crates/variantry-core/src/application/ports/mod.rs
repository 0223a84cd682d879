//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `variantry-adapters` implement
//! these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `VersionRepository`: Version persistence
//!   - `ComponentCatalog`: Component lookup
//!   - `SubscriptionLookup`: License tier checks
//!   - `IdentityProvider`: Current caller
//!   - `PreviewStorage`: Compiled preview sink
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    ComponentCatalog, IdentityProvider, PreviewStorage, SubscriptionLookup, VersionRepository,
};

#[cfg(test)]
pub use output::{
    MockComponentCatalog, MockIdentityProvider, MockPreviewStorage, MockSubscriptionLookup,
    MockVersionRepository,
};
