//! Version Service - the version lifecycle manager.
//!
//! This service coordinates every write to the version store:
//! 1. Authorize the requester (admin only)
//! 2. Validate the payload
//! 3. Diff against the latest version of the variant and apply the policy
//! 4. Persist, then promote to default when asked
//!
//! Reads (default resolution, listings, stats) are open to everyone.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{ComponentCatalog, VersionRepository},
    },
    domain::{
        self, ChangeDecision, Component, ComponentId, ComponentVersion, DomainValidator as validator,
        Framework, Page, PageRequest, Principal, VersionDraft, VersionId, VersionNumber,
        VersionPatch, VersionStats,
    },
    error::VariantryResult,
};

/// What `create` ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new version number was minted.
    Created(ComponentVersion),
    /// The latest version was rewritten in place.
    Updated(ComponentVersion),
    /// Nothing tracked changed; this is the existing version.
    Unchanged(ComponentVersion),
}

impl CreateOutcome {
    pub fn version(&self) -> &ComponentVersion {
        match self {
            Self::Created(v) | Self::Updated(v) | Self::Unchanged(v) => v,
        }
    }

    pub fn into_version(self) -> ComponentVersion {
        match self {
            Self::Created(v) | Self::Updated(v) | Self::Unchanged(v) => v,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Updated(_) => "updated",
            Self::Unchanged(_) => "unchanged",
        }
    }
}

impl fmt::Display for CreateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.version();
        write!(
            f,
            "{} {} {}/{} v{}",
            self.kind(),
            v.component_id,
            v.framework,
            v.css_framework,
            v.version_number
        )
    }
}

/// Version lifecycle manager.
#[derive(Clone)]
pub struct VersionService {
    repository: Arc<dyn VersionRepository>,
    catalog: Arc<dyn ComponentCatalog>,
}

impl VersionService {
    /// Create a new version service with the given adapters.
    pub fn new(repository: Arc<dyn VersionRepository>, catalog: Arc<dyn ComponentCatalog>) -> Self {
        Self {
            repository,
            catalog,
        }
    }

    /// Create a version, or update/return the latest one when the diff
    /// policy says the payload is not worth a new number.
    #[instrument(
        skip_all,
        fields(
            component = %draft.component_id,
            framework = %draft.framework,
            css = %draft.css_framework,
            force_new = force_new
        )
    )]
    pub fn create(
        &self,
        draft: VersionDraft,
        requester: Option<&Principal>,
        force_new: bool,
    ) -> VariantryResult<CreateOutcome> {
        require_admin(requester, "create versions")?;
        validator::validate_draft(&draft)?;
        self.require_component(&draft.component_id)?;

        let lineage = self.repository.find_by_framework(
            &draft.component_id,
            draft.framework,
            Some(draft.css_framework),
        )?;

        if let Some(latest) = lineage.first() {
            let changes = domain::diff::compare(latest, &draft);
            let decision = changes.decide(force_new);
            debug!(
                changed = ?changes.changed_fields,
                hash = %changes.content_hash,
                ?decision,
                "Compared against {}",
                latest.version_number
            );

            match decision {
                ChangeDecision::Unchanged => {
                    info!(version = %latest.version_number, "No changes, keeping existing version");
                    return Ok(CreateOutcome::Unchanged(latest.clone()));
                }
                ChangeDecision::UpdateInPlace => {
                    let mut updated = latest.clone();
                    updated.absorb(&draft, Utc::now());
                    let id = updated.id;
                    let stored = self
                        .repository
                        .update(updated)?
                        .ok_or(ApplicationError::VersionNotFound { id })?;
                    info!(version = %stored.version_number, "Updated version in place");
                    return Ok(CreateOutcome::Updated(stored));
                }
                ChangeDecision::CreateNew => {}
            }
        }

        let number = self
            .next_version_number(&draft.component_id, draft.framework)?
            .to_string();

        if lineage.iter().any(|v| v.version_number == number) {
            return Err(ApplicationError::DuplicateVersion {
                component_id: draft.component_id.clone(),
                framework: draft.framework,
                css_framework: draft.css_framework,
                version_number: number,
            }
            .into());
        }

        let created = self
            .repository
            .create(ComponentVersion::from_draft(&draft, number, Utc::now()))?;
        info!(id = %created.id, version = %created.version_number, "Created version");

        if draft.is_default {
            let promoted = self
                .repository
                .set_as_default(&created.id)?
                .ok_or(ApplicationError::VersionNotFound { id: created.id })?;
            info!(id = %promoted.id, "Marked new version as default");
            return Ok(CreateOutcome::Created(promoted));
        }

        Ok(CreateOutcome::Created(created))
    }

    /// Apply a whitelisted patch to an existing version.
    #[instrument(skip(self, patch, requester), fields(id = %id))]
    pub fn update(
        &self,
        id: &VersionId,
        patch: VersionPatch,
        requester: Option<&Principal>,
    ) -> VariantryResult<ComponentVersion> {
        require_admin(requester, "update versions")?;
        let current = self.get_version(id)?;

        let mut merged = validator::validate_patch(&current, &patch)?;
        merged.updated_at = Utc::now();

        let stored = self
            .repository
            .update(merged)?
            .ok_or(ApplicationError::VersionNotFound { id: *id })?;
        info!(version = %stored.version_number, "Updated version");
        Ok(stored)
    }

    /// Delete a non-default version.
    #[instrument(skip(self, requester), fields(id = %id))]
    pub fn delete(&self, id: &VersionId, requester: Option<&Principal>) -> VariantryResult<()> {
        require_admin(requester, "delete versions")?;
        let current = self.get_version(id)?;

        if current.is_default {
            return Err(ApplicationError::DefaultVersionDeletion { id: *id }.into());
        }

        if !self.repository.delete(id)? {
            return Err(ApplicationError::VersionNotFound { id: *id }.into());
        }
        info!(version = %current.version_number, "Deleted version");
        Ok(())
    }

    /// Make `id` the single default version of its component.
    #[instrument(skip(self, requester), fields(id = %id))]
    pub fn set_as_default(
        &self,
        id: &VersionId,
        requester: Option<&Principal>,
    ) -> VariantryResult<ComponentVersion> {
        require_admin(requester, "change the default version")?;

        let promoted = self
            .repository
            .set_as_default(id)?
            .ok_or(ApplicationError::VersionNotFound { id: *id })?;
        info!(component = %promoted.component_id, "Default version changed");
        Ok(promoted)
    }

    /// The flagged default, else the most recently created version.
    #[instrument(skip(self))]
    pub fn get_default_version(&self, component_id: &ComponentId) -> VariantryResult<ComponentVersion> {
        if let Some(default) = self.repository.find_default(component_id)? {
            return Ok(default);
        }
        debug!("No flagged default, falling back to latest");
        self.repository
            .find_latest(component_id)?
            .ok_or_else(|| {
                ApplicationError::NoVersions {
                    component_id: component_id.clone(),
                }
                .into()
            })
    }

    pub fn get_version(&self, id: &VersionId) -> VariantryResult<ComponentVersion> {
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| ApplicationError::VersionNotFound { id: *id }.into())
    }

    pub fn list_versions(
        &self,
        component_id: &ComponentId,
        request: PageRequest,
    ) -> VariantryResult<Page<ComponentVersion>> {
        self.repository.paginate(component_id, request)
    }

    pub fn version_stats(&self, component_id: &ComponentId) -> VariantryResult<VersionStats> {
        self.repository.version_stats(component_id)
    }

    /// Number the next version of a `(component, framework)` lineage would get.
    pub fn next_version_number(
        &self,
        component_id: &ComponentId,
        framework: Framework,
    ) -> VariantryResult<VersionNumber> {
        let lineage = self
            .repository
            .find_by_framework(component_id, framework, None)?;
        Ok(domain::next_version_number(
            lineage.iter().map(|v| v.version_number.as_str()),
        ))
    }

    fn require_component(&self, id: &ComponentId) -> VariantryResult<Component> {
        self.catalog
            .find_component(id)?
            .ok_or_else(|| ApplicationError::ComponentNotFound { id: id.clone() }.into())
    }
}

pub(crate) fn require_admin(
    requester: Option<&Principal>,
    operation: &'static str,
) -> VariantryResult<()> {
    match requester {
        None => Err(ApplicationError::Unauthorized {
            operation,
            reason: "no authenticated user".into(),
        }
        .into()),
        Some(p) if !validator::is_admin(Some(p)) => {
            Err(ApplicationError::unauthorized(operation).into())
        }
        Some(_) => Ok(()),
    }
}
