//! Catalog-side entities the engine reads but never owns.

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::common::{ComponentId, PrincipalId},
    value_objects::{AccessType, Pricing, Role},
};

/// Pricing and access metadata of a catalog component.
///
/// The catalog subsystem owns this record; the engine resolves it by id
/// through the `ComponentCatalog` port and reads the pricing flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub access_type: AccessType,
}

impl Component {
    pub fn new(id: impl Into<ComponentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pricing: Pricing::Free,
            access_type: AccessType::OneTime,
        }
    }

    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_access_type(mut self, access_type: AccessType) -> Self {
        self.access_type = access_type;
        self
    }

    pub fn is_free(&self) -> bool {
        self.pricing == Pricing::Free
    }
}

/// An authenticated caller as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub role: Role,
}

impl Principal {
    pub fn new(id: impl Into<PrincipalId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn admin(id: impl Into<PrincipalId>) -> Self {
        Self::new(id, Role::Admin)
    }

    pub fn member(id: impl Into<PrincipalId>) -> Self {
        Self::new(id, Role::Member)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
