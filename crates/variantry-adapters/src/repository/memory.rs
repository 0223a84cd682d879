//! In-memory version repository.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;
use variantry_core::{
    application::{ApplicationError, ports::VersionRepository},
    domain::{
        ComponentId, ComponentVersion, CssFramework, Framework, Page, PageRequest, VersionId,
        VersionStats,
    },
    error::VariantryResult,
};

/// Thread-safe in-memory version store.
///
/// Every write takes the single write lock, which makes this the
/// serialization point for concurrent writers: the triple uniqueness check
/// in `create` and the clear-then-set in `set_as_default` cannot interleave
/// with other writes.
#[derive(Clone, Default)]
pub struct InMemoryVersionRepository {
    inner: Arc<RwLock<Vec<ComponentVersion>>>,
}

impl InMemoryVersionRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from previously stored versions, oldest first.
    pub fn from_versions(versions: Vec<ComponentVersion>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(versions)),
        }
    }

    /// Copy of every stored version in insertion order.
    pub fn all(&self) -> VariantryResult<Vec<ComponentVersion>> {
        Ok(self.read()?.clone())
    }

    pub fn len(&self) -> VariantryResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> VariantryResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> VariantryResult<RwLockReadGuard<'_, Vec<ComponentVersion>>> {
        Ok(self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }

    fn write(&self) -> VariantryResult<RwLockWriteGuard<'_, Vec<ComponentVersion>>> {
        Ok(self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }
}

/// Versions matching `keep`, newest first. Ties on `created_at` go to the
/// later insertion.
fn newest_first<F>(versions: &[ComponentVersion], keep: F) -> Vec<ComponentVersion>
where
    F: Fn(&ComponentVersion) -> bool,
{
    let mut matching: Vec<(usize, &ComponentVersion)> = versions
        .iter()
        .enumerate()
        .filter(|(_, v)| keep(v))
        .collect();
    matching.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
    matching.into_iter().map(|(_, v)| v.clone()).collect()
}

impl VersionRepository for InMemoryVersionRepository {
    fn find_by_id(&self, id: &VersionId) -> VariantryResult<Option<ComponentVersion>> {
        Ok(self.read()?.iter().find(|v| v.id == *id).cloned())
    }

    fn find_default(&self, component_id: &ComponentId) -> VariantryResult<Option<ComponentVersion>> {
        Ok(self
            .read()?
            .iter()
            .find(|v| v.component_id == *component_id && v.is_default)
            .cloned())
    }

    fn find_latest(&self, component_id: &ComponentId) -> VariantryResult<Option<ComponentVersion>> {
        Ok(self.find_by_component(component_id)?.into_iter().next())
    }

    fn find_by_framework(
        &self,
        component_id: &ComponentId,
        framework: Framework,
        css_framework: Option<CssFramework>,
    ) -> VariantryResult<Vec<ComponentVersion>> {
        let inner = self.read()?;
        Ok(newest_first(&inner, |v| {
            v.component_id == *component_id
                && v.framework == framework
                && css_framework.is_none_or(|css| v.css_framework == css)
        }))
    }

    fn find_by_component(
        &self,
        component_id: &ComponentId,
    ) -> VariantryResult<Vec<ComponentVersion>> {
        let inner = self.read()?;
        Ok(newest_first(&inner, |v| v.component_id == *component_id))
    }

    fn create(&self, version: ComponentVersion) -> VariantryResult<ComponentVersion> {
        let mut inner = self.write()?;

        if inner.iter().any(|v| v.id == version.id) {
            return Err(ApplicationError::RepositoryError {
                reason: format!("version id {} already stored", version.id),
            }
            .into());
        }
        let duplicate = inner.iter().any(|v| {
            v.component_id == version.component_id
                && v.lineage() == version.lineage()
                && v.version_number == version.version_number
        });
        if duplicate {
            return Err(ApplicationError::DuplicateVersion {
                component_id: version.component_id.clone(),
                framework: version.framework,
                css_framework: version.css_framework,
                version_number: version.version_number.clone(),
            }
            .into());
        }

        debug!(id = %version.id, "Storing version");
        inner.push(version.clone());
        Ok(version)
    }

    fn update(&self, mut version: ComponentVersion) -> VariantryResult<Option<ComponentVersion>> {
        let mut inner = self.write()?;
        let Some(slot) = inner.iter_mut().find(|v| v.id == version.id) else {
            return Ok(None);
        };
        // The default flag only moves through `set_as_default`.
        version.is_default = slot.is_default;
        *slot = version.clone();
        Ok(Some(version))
    }

    fn delete(&self, id: &VersionId) -> VariantryResult<bool> {
        let mut inner = self.write()?;
        let before = inner.len();
        inner.retain(|v| v.id != *id);
        Ok(inner.len() != before)
    }

    fn set_as_default(&self, id: &VersionId) -> VariantryResult<Option<ComponentVersion>> {
        let mut inner = self.write()?;
        let Some(component_id) = inner
            .iter()
            .find(|v| v.id == *id)
            .map(|v| v.component_id.clone())
        else {
            return Ok(None);
        };

        let mut promoted = None;
        for v in inner.iter_mut().filter(|v| v.component_id == component_id) {
            v.is_default = v.id == *id;
            if v.is_default {
                promoted = Some(v.clone());
            }
        }
        Ok(promoted)
    }

    fn paginate(
        &self,
        component_id: &ComponentId,
        request: PageRequest,
    ) -> VariantryResult<Page<ComponentVersion>> {
        Ok(Page::from_sorted(
            self.find_by_component(component_id)?,
            request,
        ))
    }

    fn version_stats(&self, component_id: &ComponentId) -> VariantryResult<VersionStats> {
        Ok(VersionStats::from_newest_first(
            &self.find_by_component(component_id)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use variantry_core::domain::VersionDraft;

    fn version(component: &str, css: CssFramework, number: &str) -> ComponentVersion {
        let draft = VersionDraft::new(component, Framework::React, css, "<x/>");
        ComponentVersion::from_draft(&draft, number.into(), Utc::now())
    }

    #[test]
    fn triple_is_unique() {
        let repo = InMemoryVersionRepository::new();
        repo.create(version("C1", CssFramework::Vanilla, "1.0.0"))
            .unwrap();

        let err = repo
            .create(version("C1", CssFramework::Vanilla, "1.0.0"))
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));

        // Same number under another CSS framework or component is fine.
        repo.create(version("C1", CssFramework::TailwindV3, "1.0.0"))
            .unwrap();
        repo.create(version("C2", CssFramework::Vanilla, "1.0.0"))
            .unwrap();
        assert_eq!(repo.len().unwrap(), 3);
    }

    #[test]
    fn newest_first_breaks_ties_by_insertion() {
        let now = Utc::now();
        let mut a = version("C1", CssFramework::Vanilla, "1.0.0");
        let mut b = version("C1", CssFramework::Vanilla, "1.0.1");
        let mut old = version("C1", CssFramework::Vanilla, "0.9.0");
        a.created_at = now;
        b.created_at = now;
        old.created_at = now - Duration::days(1);
        let repo = InMemoryVersionRepository::from_versions(vec![old, a, b]);

        let numbers: Vec<String> = repo
            .find_by_component(&ComponentId::new("C1"))
            .unwrap()
            .into_iter()
            .map(|v| v.version_number)
            .collect();
        assert_eq!(numbers, ["1.0.1", "1.0.0", "0.9.0"]);
    }

    #[test]
    fn set_as_default_leaves_exactly_one() {
        let repo = InMemoryVersionRepository::new();
        let a = repo.create(version("C1", CssFramework::Vanilla, "1.0.0")).unwrap();
        let b = repo.create(version("C1", CssFramework::TailwindV4, "1.0.1")).unwrap();
        let other = repo.create(version("C2", CssFramework::Vanilla, "1.0.0")).unwrap();
        repo.set_as_default(&other.id).unwrap();

        repo.set_as_default(&a.id).unwrap();
        let promoted = repo.set_as_default(&b.id).unwrap().unwrap();
        assert!(promoted.is_default);

        let c1 = repo.find_by_component(&ComponentId::new("C1")).unwrap();
        assert_eq!(c1.iter().filter(|v| v.is_default).count(), 1);
        assert_eq!(repo.find_default(&ComponentId::new("C1")).unwrap().unwrap().id, b.id);
        // Other components keep their default.
        assert!(repo.find_by_id(&other.id).unwrap().unwrap().is_default);
    }

    #[test]
    fn set_as_default_on_missing_is_none() {
        let repo = InMemoryVersionRepository::new();
        assert!(repo.set_as_default(&VersionId::generate()).unwrap().is_none());
    }

    #[test]
    fn update_preserves_default_flag() {
        let repo = InMemoryVersionRepository::new();
        let v = repo.create(version("C1", CssFramework::Vanilla, "1.0.0")).unwrap();
        repo.set_as_default(&v.id).unwrap();

        let mut stale = v.clone();
        stale.code_full = Some("full".into());
        let stored = repo.update(stale).unwrap().unwrap();
        assert!(stored.is_default);
        assert_eq!(stored.code_full.as_deref(), Some("full"));
    }

    #[test]
    fn absence_is_not_an_error() {
        let repo = InMemoryVersionRepository::new();
        let id = VersionId::generate();
        assert!(repo.find_by_id(&id).unwrap().is_none());
        assert!(!repo.delete(&id).unwrap());
        assert!(
            repo.update(version("C1", CssFramework::Vanilla, "1.0.0"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn poisoned_lock_is_an_error_not_empty() {
        let repo = InMemoryVersionRepository::new();
        repo.create(version("C1", CssFramework::Vanilla, "1.0.0"))
            .unwrap();

        let inner = Arc::clone(&repo.inner);
        let _ = std::thread::spawn(move || {
            let _guard = inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(
            repo.len(),
            Err(variantry_core::error::VariantryError::Application(
                ApplicationError::StoreLockError
            ))
        ));
        assert!(repo.is_empty().is_err());
    }

    #[test]
    fn paginates_newest_first() {
        let repo = InMemoryVersionRepository::new();
        let base = Utc::now();
        for i in 0..5 {
            let mut v = version("C1", CssFramework::Vanilla, &format!("1.0.{i}"));
            v.created_at = base + Duration::seconds(i);
            repo.create(v).unwrap();
        }
        let page = repo
            .paginate(&ComponentId::new("C1"), PageRequest::new(2, 2).unwrap())
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        let numbers: Vec<_> = page.items.iter().map(|v| v.version_number.as_str()).collect();
        assert_eq!(numbers, ["1.0.2", "1.0.1"]);
    }
}
