//! Access Service - the code visibility gate.
//!
//! Decides, for a caller, whether the full code of a version may be shown.
//! The gate never fails: a broken license lookup is logged and treated as
//! "no access".

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{ComponentCatalog, SubscriptionLookup, VersionRepository},
    },
    domain::{AccessDecision, AccessReason, Component, ComponentVersion, Principal, VersionId},
    error::VariantryResult,
};

/// Service for access decisions.
#[derive(Clone)]
pub struct AccessService {
    subscriptions: Arc<dyn SubscriptionLookup>,
    repository: Arc<dyn VersionRepository>,
    catalog: Arc<dyn ComponentCatalog>,
}

impl AccessService {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionLookup>,
        repository: Arc<dyn VersionRepository>,
        catalog: Arc<dyn ComponentCatalog>,
    ) -> Self {
        Self {
            subscriptions,
            repository,
            catalog,
        }
    }

    /// Evaluate access in order: free component, anonymous caller, license
    /// lookup.
    #[instrument(
        skip_all,
        fields(component = %component.id, version = %version.version_number)
    )]
    pub fn resolve_access(
        &self,
        component: &Component,
        version: &ComponentVersion,
        caller: Option<&Principal>,
    ) -> AccessDecision {
        if component.is_free() {
            return AccessDecision::full(version, AccessReason::FreeComponent);
        }

        let Some(caller) = caller else {
            return AccessDecision::preview_only(version, AccessReason::Anonymous);
        };

        match self.subscriptions.has_sufficient_tier(&caller.id) {
            Ok(true) => AccessDecision::full(version, AccessReason::Licensed),
            Ok(false) => {
                debug!(user = %caller.id, "Caller lacks a sufficient tier");
                AccessDecision::preview_only(version, AccessReason::InsufficientTier)
            }
            Err(e) => {
                warn!(user = %caller.id, error = %e, "License lookup failed, denying access");
                AccessDecision::preview_only(version, AccessReason::LookupFailed)
            }
        }
    }

    /// Load a version and its component, then run the gate.
    ///
    /// Unlike [`resolve_access`](Self::resolve_access) this can fail, but only
    /// because the version or component does not exist.
    pub fn resolve_access_for_version(
        &self,
        version_id: &VersionId,
        caller: Option<&Principal>,
    ) -> VariantryResult<AccessDecision> {
        let version = self
            .repository
            .find_by_id(version_id)?
            .ok_or(ApplicationError::VersionNotFound { id: *version_id })?;
        let component = self
            .catalog
            .find_component(&version.component_id)?
            .ok_or_else(|| ApplicationError::ComponentNotFound {
                id: version.component_id.clone(),
            })?;
        Ok(self.resolve_access(&component, &version, caller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        MockComponentCatalog, MockSubscriptionLookup, MockVersionRepository,
    };
    use crate::domain::{CssFramework, Framework, Pricing, VersionDraft};
    use crate::error::{ErrorCategory, VariantryError};
    use chrono::Utc;

    fn version() -> ComponentVersion {
        let draft = VersionDraft::new("C1", Framework::Vue, CssFramework::Vanilla, "<p>preview</p>")
            .with_full_code("<template><p>full</p></template>");
        ComponentVersion::from_draft(&draft, "1.0.0".into(), Utc::now())
    }

    fn paid() -> Component {
        Component::new("C1", "Pricing table").with_pricing(Pricing::Paid)
    }

    fn gate(subscriptions: MockSubscriptionLookup) -> AccessService {
        AccessService::new(
            Arc::new(subscriptions),
            Arc::new(MockVersionRepository::new()),
            Arc::new(MockComponentCatalog::new()),
        )
    }

    #[test]
    fn free_component_grants_everyone() {
        let free = Component::new("C1", "Badge");

        for caller in [None, Some(Principal::member("ann"))] {
            let mut subs = MockSubscriptionLookup::new();
            subs.expect_has_sufficient_tier().never();
            let d = gate(subs).resolve_access(&free, &version(), caller.as_ref());
            assert!(d.has_access && d.can_view_code && d.can_copy && d.can_download);
            assert_eq!(d.code_to_show, "<template><p>full</p></template>");
        }
    }

    #[test]
    fn free_component_without_full_code_shows_preview() {
        let draft = VersionDraft::new("C1", Framework::Html, CssFramework::Vanilla, "<p>only</p>");
        let v = ComponentVersion::from_draft(&draft, "1.0.0".into(), Utc::now());
        let d = gate(MockSubscriptionLookup::new()).resolve_access(&Component::new("C1", "X"), &v, None);
        assert!(d.has_access);
        assert_eq!(d.code_to_show, "<p>only</p>");
    }

    #[test]
    fn paid_component_anonymous_gets_preview() {
        let d = gate(MockSubscriptionLookup::new()).resolve_access(&paid(), &version(), None);
        assert!(!d.has_access && !d.can_view_code && !d.can_copy && !d.can_download);
        assert_eq!(d.code_to_show, "<p>preview</p>");
        assert_eq!(d.reason, AccessReason::Anonymous);
    }

    #[test]
    fn licensed_caller_gets_full_code() {
        let mut subs = MockSubscriptionLookup::new();
        subs.expect_has_sufficient_tier().returning(|_| Ok(true));
        let d = gate(subs).resolve_access(&paid(), &version(), Some(&Principal::member("ann")));
        assert!(d.has_access);
        assert_eq!(d.reason, AccessReason::Licensed);
    }

    #[test]
    fn insufficient_tier_is_preview_only() {
        let mut subs = MockSubscriptionLookup::new();
        subs.expect_has_sufficient_tier().returning(|_| Ok(false));
        let d = gate(subs).resolve_access(&paid(), &version(), Some(&Principal::member("ann")));
        assert!(!d.has_access);
        assert_eq!(d.reason, AccessReason::InsufficientTier);
    }

    #[test]
    fn lookup_failure_fails_closed() {
        let mut subs = MockSubscriptionLookup::new();
        subs.expect_has_sufficient_tier().returning(|_| {
            Err(ApplicationError::SubscriptionLookupFailed {
                reason: "timeout".into(),
            }
            .into())
        });
        let d = gate(subs).resolve_access(&paid(), &version(), Some(&Principal::member("ann")));
        assert!(!d.has_access);
        assert_eq!(d.code_to_show, "<p>preview</p>");
        assert_eq!(d.reason, AccessReason::LookupFailed);
    }

    #[test]
    fn unknown_version_is_not_found() {
        let mut repo = MockVersionRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let svc = AccessService::new(
            Arc::new(MockSubscriptionLookup::new()),
            Arc::new(repo),
            Arc::new(MockComponentCatalog::new()),
        );

        let err = svc
            .resolve_access_for_version(&VersionId::generate(), None)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(matches!(
            err,
            VariantryError::Application(ApplicationError::VersionNotFound { .. })
        ));
    }

    #[test]
    fn resolves_through_repository_and_catalog() {
        let v = version();
        let id = v.id;
        let mut repo = MockVersionRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(v.clone())));
        let mut catalog = MockComponentCatalog::new();
        catalog.expect_find_component().returning(|_| Ok(Some(paid())));

        let svc = AccessService::new(
            Arc::new(MockSubscriptionLookup::new()),
            Arc::new(repo),
            Arc::new(catalog),
        );
        let d = svc.resolve_access_for_version(&id, None).unwrap();
        assert_eq!(d.reason, AccessReason::Anonymous);
    }
}
