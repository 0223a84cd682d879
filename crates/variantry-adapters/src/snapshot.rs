//! JSON snapshot persistence.
//!
//! The CLI keeps all state in one JSON document: catalog components, license
//! grants and versions. A run loads the snapshot into the in-memory adapters,
//! works against them, and writes the snapshot back.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use variantry_core::{
    application::ApplicationError,
    domain::{Component, ComponentVersion, DomainValidator},
    error::{VariantryError, VariantryResult},
};

use crate::{
    catalog::InMemoryCatalog,
    licenses::{InMemoryLicenses, LicenseGrant},
    repository::InMemoryVersionRepository,
};

/// Current on-disk format.
pub const SNAPSHOT_FORMAT: u32 = 1;

const fn current_format() -> u32 {
    SNAPSHOT_FORMAT
}

/// Serializable image of every store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "current_format")]
    pub format: u32,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub licenses: Vec<LicenseGrant>,
    #[serde(default)]
    pub versions: Vec<ComponentVersion>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            format: SNAPSHOT_FORMAT,
            components: Vec::new(),
            licenses: Vec::new(),
            versions: Vec::new(),
        }
    }
}

impl Snapshot {
    /// Read a snapshot. A missing file is an empty snapshot.
    pub fn load(path: &Path) -> VariantryResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No snapshot yet, starting empty");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|e| store_error(path, e))?;
        let snapshot: Snapshot = serde_json::from_str(&raw).map_err(|e| store_error(path, e))?;

        if snapshot.format > SNAPSHOT_FORMAT {
            return Err(store_error(
                path,
                format!(
                    "format {} is newer than supported format {}",
                    snapshot.format, SNAPSHOT_FORMAT
                ),
            ));
        }
        for version in &snapshot.versions {
            DomainValidator::validate_version(version).map_err(|e| {
                store_error(path, format!("version {} is invalid: {}", version.id, e))
            })?;
        }
        Ok(snapshot)
    }

    /// Write the snapshot through a temporary sibling file, then rename it
    /// over the target.
    pub fn save(&self, path: &Path) -> VariantryResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| store_error(parent, e))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| store_error(path, e))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| store_error(&tmp, e))?;
        std::fs::rename(&tmp, path).map_err(|e| store_error(path, e))?;
        Ok(())
    }

    /// Copy the current contents of the in-memory stores.
    pub fn capture(
        repository: &InMemoryVersionRepository,
        catalog: &InMemoryCatalog,
        licenses: &InMemoryLicenses,
    ) -> VariantryResult<Self> {
        Ok(Self {
            format: SNAPSHOT_FORMAT,
            components: catalog.list()?,
            licenses: licenses.grants()?,
            versions: repository.all()?,
        })
    }
}

fn store_error(path: &Path, reason: impl std::fmt::Display) -> VariantryError {
    ApplicationError::RepositoryError {
        reason: format!("snapshot {}: {}", path.display(), reason),
    }
    .into()
}

/// The in-memory stores, backed by one snapshot file.
#[derive(Clone)]
pub struct SnapshotStore {
    path: PathBuf,
    repository: InMemoryVersionRepository,
    catalog: InMemoryCatalog,
    licenses: InMemoryLicenses,
}

impl SnapshotStore {
    /// Load the snapshot at `path` (or start empty).
    pub fn open(path: impl Into<PathBuf>) -> VariantryResult<Self> {
        let path = path.into();
        let snapshot = Snapshot::load(&path)?;
        info!(
            path = %path.display(),
            components = snapshot.components.len(),
            versions = snapshot.versions.len(),
            "Opened store"
        );

        Ok(Self {
            repository: InMemoryVersionRepository::from_versions(snapshot.versions),
            catalog: InMemoryCatalog::from_components(snapshot.components),
            licenses: InMemoryLicenses::from_grants(snapshot.licenses),
            path,
        })
    }

    /// Write the current state back to disk.
    pub fn persist(&self) -> VariantryResult<()> {
        Snapshot::capture(&self.repository, &self.catalog, &self.licenses)?.save(&self.path)?;
        debug!(path = %self.path.display(), "Persisted store");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repository(&self) -> &InMemoryVersionRepository {
        &self.repository
    }

    pub fn catalog(&self) -> &InMemoryCatalog {
        &self.catalog
    }

    pub fn licenses(&self) -> &InMemoryLicenses {
        &self.licenses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::licenses::LicenseTier;
    use chrono::Utc;
    use variantry_core::application::ports::{ComponentCatalog, VersionRepository};
    use variantry_core::domain::{ComponentId, CssFramework, Framework, Pricing, VersionDraft};

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = Snapshot::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/store.json");

        let store = SnapshotStore::open(&path).unwrap();
        store
            .catalog()
            .upsert(Component::new("C1", "Card").with_pricing(Pricing::Paid))
            .unwrap();
        store.licenses().grant("ann".into(), LicenseTier::Pro).unwrap();
        let draft = VersionDraft::new("C1", Framework::Svelte, CssFramework::TailwindV4, "<Card/>");
        let v = store
            .repository()
            .create(ComponentVersion::from_draft(&draft, "1.0.0".into(), Utc::now()))
            .unwrap();
        store.persist().unwrap();

        let reopened = SnapshotStore::open(&path).unwrap();
        assert_eq!(reopened.repository().find_by_id(&v.id).unwrap(), Some(v));
        assert!(
            reopened
                .catalog()
                .find_component(&ComponentId::new("C1"))
                .unwrap()
                .is_some()
        );
        assert_eq!(
            reopened.licenses().tier_of(&"ann".into()).unwrap(),
            Some(LicenseTier::Pro)
        );
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Snapshot::load(&path).unwrap_err();
        assert!(err.to_string().contains("snapshot"));
    }

    #[test]
    fn newer_format_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{"format": 99}"#).unwrap();
        assert!(Snapshot::load(&path).is_err());
    }
}
