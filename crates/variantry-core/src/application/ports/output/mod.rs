//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `variantry-adapters` crate provides implementations.
//!
//! ## Design Notes
//!
//! - Absence is a value (`Ok(None)` / `Ok(false)`), never an error
//! - `Err` is reserved for infrastructure failures
//! - All ports are `Send + Sync` so services can share them behind `Arc`

use crate::domain::{
    Component, ComponentId, ComponentVersion, CssFramework, Framework, Page, PageRequest,
    Principal, PrincipalId, RelativePath, VersionId, VersionStats,
};
use crate::error::VariantryResult;

/// Port for version persistence.
///
/// Implemented by:
/// - `variantry_adapters::repository::InMemoryVersionRepository`
///
/// The repository is the serialization point for concurrent writers.
/// `set_as_default` must clear and set the default flag atomically, and
/// `create` must reject a second version with the same
/// `(component, framework, css_framework, version_number)`.
#[cfg_attr(test, mockall::automock)]
pub trait VersionRepository: Send + Sync {
    fn find_by_id(&self, id: &VersionId) -> VariantryResult<Option<ComponentVersion>>;

    /// The version flagged default for a component, if any.
    fn find_default(&self, component_id: &ComponentId) -> VariantryResult<Option<ComponentVersion>>;

    /// Most recently created version of a component, across all variants.
    fn find_latest(&self, component_id: &ComponentId) -> VariantryResult<Option<ComponentVersion>>;

    /// Versions of one framework, newest first. `css_framework = None`
    /// returns the whole `(component, framework)` lineage.
    fn find_by_framework(
        &self,
        component_id: &ComponentId,
        framework: Framework,
        css_framework: Option<CssFramework>,
    ) -> VariantryResult<Vec<ComponentVersion>>;

    /// Every version of a component, newest first.
    fn find_by_component(&self, component_id: &ComponentId)
    -> VariantryResult<Vec<ComponentVersion>>;

    fn create(&self, version: ComponentVersion) -> VariantryResult<ComponentVersion>;

    /// Replace a stored version. `Ok(None)` when it no longer exists.
    fn update(&self, version: ComponentVersion) -> VariantryResult<Option<ComponentVersion>>;

    /// `Ok(false)` when nothing was deleted.
    fn delete(&self, id: &VersionId) -> VariantryResult<bool>;

    /// Flag `id` as the only default of its component.
    fn set_as_default(&self, id: &VersionId) -> VariantryResult<Option<ComponentVersion>>;

    fn paginate(
        &self,
        component_id: &ComponentId,
        request: PageRequest,
    ) -> VariantryResult<Page<ComponentVersion>>;

    fn version_stats(&self, component_id: &ComponentId) -> VariantryResult<VersionStats>;
}

/// Port for the component catalog (owned by another subsystem).
#[cfg_attr(test, mockall::automock)]
pub trait ComponentCatalog: Send + Sync {
    fn find_component(&self, id: &ComponentId) -> VariantryResult<Option<Component>>;
}

/// Port for license/subscription state.
///
/// Callers treat `Err` as "no access".
#[cfg_attr(test, mockall::automock)]
pub trait SubscriptionLookup: Send + Sync {
    fn has_sufficient_tier(&self, user: &PrincipalId) -> VariantryResult<bool>;
}

/// Port for the authenticated caller. `None` means anonymous.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityProvider: Send + Sync {
    fn current_principal(&self) -> Option<Principal>;
}

/// Port for compiled preview output.
///
/// Implemented by:
/// - `variantry_adapters::storage::LocalStorage` (production)
/// - `variantry_adapters::storage::MemoryStorage` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait PreviewStorage: Send + Sync {
    /// Write `contents` at `path`, returning a displayable location.
    fn write(&self, path: &RelativePath, contents: &str) -> VariantryResult<String>;
}
