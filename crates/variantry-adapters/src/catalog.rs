//! In-memory component catalog.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use variantry_core::{
    application::{ApplicationError, ports::ComponentCatalog},
    domain::{Component, ComponentId},
    error::VariantryResult,
};

/// Thread-safe in-memory catalog keyed by component id.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    inner: Arc<RwLock<BTreeMap<ComponentId, Component>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_components(components: impl IntoIterator<Item = Component>) -> Self {
        let map = components.into_iter().map(|c| (c.id.clone(), c)).collect();
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Insert or replace a component. Returns the previous record, if any.
    pub fn upsert(&self, component: Component) -> VariantryResult<Option<Component>> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.insert(component.id.clone(), component))
    }

    pub fn remove(&self, id: &ComponentId) -> VariantryResult<Option<Component>> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.remove(id))
    }

    /// All components ordered by id.
    pub fn list(&self) -> VariantryResult<Vec<Component>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.values().cloned().collect())
    }
}

impl ComponentCatalog for InMemoryCatalog {
    fn find_component(&self, id: &ComponentId) -> VariantryResult<Option<Component>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use variantry_core::domain::Pricing;

    #[test]
    fn upsert_replaces() {
        let catalog = InMemoryCatalog::new();
        assert!(catalog.upsert(Component::new("C1", "Card")).unwrap().is_none());
        let previous = catalog
            .upsert(Component::new("C1", "Card").with_pricing(Pricing::Paid))
            .unwrap();
        assert!(previous.unwrap().is_free());

        let found = catalog.find_component(&ComponentId::new("C1")).unwrap().unwrap();
        assert!(!found.is_free());
        assert_eq!(catalog.list().unwrap().len(), 1);
    }

    #[test]
    fn unknown_component_is_none() {
        let catalog = InMemoryCatalog::from_components([Component::new("C1", "Card")]);
        assert!(catalog.find_component(&ComponentId::new("nope")).unwrap().is_none());
    }
}
