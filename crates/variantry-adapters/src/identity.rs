//! Fixed identity provider.

use variantry_core::{application::ports::IdentityProvider, domain::Principal};

/// Reports the same caller on every request (or nobody).
///
/// The CLI builds one from its `[identity]` config section.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    principal: Option<Principal>,
}

impl StaticIdentity {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_principal(&self) -> Option<Principal> {
        self.principal.clone()
    }
}
