use crate::domain::{
    entities::{
        component::Principal,
        version::{ComponentVersion, VersionDraft, VersionPatch},
    },
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_draft(draft: &VersionDraft) -> Result<(), DomainError> {
        draft.validate()
    }

    pub fn validate_version(version: &ComponentVersion) -> Result<(), DomainError> {
        version.validate()
    }

    /// A patch must carry at least one field and keep the version valid once
    /// merged.
    pub fn validate_patch(
        current: &ComponentVersion,
        patch: &VersionPatch,
    ) -> Result<ComponentVersion, DomainError> {
        if patch.is_empty() {
            return Err(DomainError::InvalidPayload(
                "update payload contains no updatable fields".into(),
            ));
        }
        let mut merged = current.clone();
        merged.apply(patch, current.updated_at);
        merged.validate()?;
        Ok(merged)
    }

    pub fn is_admin(principal: Option<&Principal>) -> bool {
        principal.is_some_and(Principal::is_admin)
    }
}
