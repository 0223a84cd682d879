//! The `ComponentVersion` aggregate and the payloads that create or modify it.
//!
//! # Payload types
//!
//! | Type | Used by | Can touch |
//! |------|---------|-----------|
//! | [`VersionDraft`] | create | everything except id, number and timestamps |
//! | [`VersionPatch`] | update | the content whitelist only |
//!
//! The whitelist is enforced by the type itself: `VersionPatch` has no field
//! for the component, the framework pair, the version number or the default
//! flag, and unknown keys are rejected when a patch is deserialized.
//!
//! # Metadata
//!
//! Dependencies, required configuration, integrations and bundled files are
//! explicit structures rather than opaque JSON. The engine never interprets
//! them beyond validation and equality; they pass through to storage as-is.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::common::{ComponentId, RelativePath, VersionId},
    error::DomainError,
    value_objects::{CssFramework, Framework},
};

// ── Metadata structures ───────────────────────────────────────────────────────

/// npm-style dependency map: package name → version range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dependencies(BTreeMap<String, String>);

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, package: impl Into<String>, range: impl Into<String>) -> Self {
        self.insert(package, range);
        self
    }

    pub fn insert(&mut self, package: impl Into<String>, range: impl Into<String>) {
        self.0.insert(package.into(), range.into());
    }

    pub fn get(&self, package: &str) -> Option<&str> {
        self.0.get(package).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dependencies {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Where a required configuration value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKind {
    EnvVar,
    File,
    Setting,
}

/// A configuration value the variant needs before it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRequirement {
    pub name: String,
    pub kind: ConfigKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ConfigRequirement {
    pub fn env_var(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ConfigKind::EnvVar,
            description: None,
        }
    }
}

/// A third-party service the variant talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

/// An extra source file shipped alongside the main code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFile {
    pub path: RelativePath,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl VersionFile {
    pub fn new(path: impl Into<std::path::PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: RelativePath::new(path),
            content: content.into(),
            language: None,
        }
    }
}

// ── Aggregate ─────────────────────────────────────────────────────────────────

/// One version of one variant of a component.
///
/// Identity is `id`. Within a component the triple
/// `(framework, css_framework, version_number)` is unique, and version
/// numbers only grow within a `(component_id, framework)` lineage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentVersion {
    pub id: VersionId,
    pub component_id: ComponentId,
    pub version_number: String,
    pub framework: Framework,
    pub css_framework: CssFramework,

    pub code_preview: String,
    pub code_full: Option<String>,
    pub code_encrypted: Option<String>,

    #[serde(default)]
    pub dependencies: Dependencies,
    #[serde(default)]
    pub config_required: Vec<ConfigRequirement>,
    #[serde(default)]
    pub integrations: Vec<Integration>,
    #[serde(default)]
    pub integration_code: Option<String>,
    #[serde(default)]
    pub files: Vec<VersionFile>,

    #[serde(default)]
    pub supports_dark_mode: bool,
    #[serde(default)]
    pub dark_mode_code: Option<String>,

    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ComponentVersion {
    /// Materialize a draft as a brand-new, non-default version.
    ///
    /// The default flag is never copied from the draft; making a version the
    /// default goes through the repository's atomic `set_as_default`.
    pub fn from_draft(draft: &VersionDraft, version_number: String, now: DateTime<Utc>) -> Self {
        Self {
            id: VersionId::generate(),
            component_id: draft.component_id.clone(),
            version_number,
            framework: draft.framework,
            css_framework: draft.css_framework,
            code_preview: draft.code_preview.clone(),
            code_full: draft.code_full.clone(),
            code_encrypted: draft.code_encrypted.clone(),
            dependencies: draft.dependencies.clone(),
            config_required: draft.config_required.clone(),
            integrations: draft.integrations.clone(),
            integration_code: draft.integration_code.clone(),
            files: draft.files.clone(),
            supports_dark_mode: draft.supports_dark_mode,
            dark_mode_code: draft.dark_mode_code.clone(),
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// `(framework, css_framework)` pair this version belongs to.
    pub const fn lineage(&self) -> (Framework, CssFramework) {
        (self.framework, self.css_framework)
    }

    /// Overwrite every content field with the draft's values.
    ///
    /// Used for in-place updates decided by the diff policy: identity, lineage,
    /// number, default flag and creation time are kept.
    pub fn absorb(&mut self, draft: &VersionDraft, now: DateTime<Utc>) {
        self.code_preview = draft.code_preview.clone();
        self.code_full = draft.code_full.clone();
        self.code_encrypted = draft.code_encrypted.clone();
        self.dependencies = draft.dependencies.clone();
        self.config_required = draft.config_required.clone();
        self.integrations = draft.integrations.clone();
        self.integration_code = draft.integration_code.clone();
        self.files = draft.files.clone();
        self.supports_dark_mode = draft.supports_dark_mode;
        self.dark_mode_code = draft.dark_mode_code.clone();
        self.updated_at = now;
    }

    /// Apply a whitelisted patch. Returns `true` if any field was supplied.
    pub fn apply(&mut self, patch: &VersionPatch, now: DateTime<Utc>) -> bool {
        if patch.is_empty() {
            return false;
        }
        if let Some(v) = &patch.code_preview {
            self.code_preview = v.clone();
        }
        if let Some(v) = &patch.code_full {
            self.code_full = v.clone();
        }
        if let Some(v) = &patch.code_encrypted {
            self.code_encrypted = v.clone();
        }
        if let Some(v) = &patch.dependencies {
            self.dependencies = v.clone();
        }
        if let Some(v) = &patch.config_required {
            self.config_required = v.clone();
        }
        if let Some(v) = &patch.integrations {
            self.integrations = v.clone();
        }
        if let Some(v) = &patch.integration_code {
            self.integration_code = v.clone();
        }
        if let Some(v) = &patch.files {
            self.files = v.clone();
        }
        if let Some(v) = patch.supports_dark_mode {
            self.supports_dark_mode = v;
            // Turning dark mode off drops the dark variant unless the patch
            // supplies one explicitly.
            if !v && patch.dark_mode_code.is_none() {
                self.dark_mode_code = None;
            }
        }
        if let Some(v) = &patch.dark_mode_code {
            self.dark_mode_code = v.clone();
        }
        self.updated_at = now;
        true
    }

    /// Re-check content invariants (after a patch or deserialization).
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_content(ContentView {
            code_preview: &self.code_preview,
            supports_dark_mode: self.supports_dark_mode,
            dark_mode_code: self.dark_mode_code.as_deref(),
            dependencies: &self.dependencies,
            config_required: &self.config_required,
            integrations: &self.integrations,
            files: &self.files,
        })
    }
}

// ── Create payload ────────────────────────────────────────────────────────────

/// Candidate content for a version, as submitted by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDraft {
    pub component_id: ComponentId,
    pub framework: Framework,
    pub css_framework: CssFramework,
    pub code_preview: String,
    #[serde(default)]
    pub code_full: Option<String>,
    #[serde(default)]
    pub code_encrypted: Option<String>,
    #[serde(default)]
    pub dependencies: Dependencies,
    #[serde(default)]
    pub config_required: Vec<ConfigRequirement>,
    #[serde(default)]
    pub integrations: Vec<Integration>,
    #[serde(default)]
    pub integration_code: Option<String>,
    #[serde(default)]
    pub files: Vec<VersionFile>,
    #[serde(default)]
    pub supports_dark_mode: bool,
    #[serde(default)]
    pub dark_mode_code: Option<String>,
    /// Ask for the created version to become the component default.
    #[serde(default)]
    pub is_default: bool,
}

impl VersionDraft {
    pub fn new(
        component_id: impl Into<ComponentId>,
        framework: Framework,
        css_framework: CssFramework,
        code_preview: impl Into<String>,
    ) -> Self {
        Self {
            component_id: component_id.into(),
            framework,
            css_framework,
            code_preview: code_preview.into(),
            code_full: None,
            code_encrypted: None,
            dependencies: Dependencies::default(),
            config_required: Vec::new(),
            integrations: Vec::new(),
            integration_code: None,
            files: Vec::new(),
            supports_dark_mode: false,
            dark_mode_code: None,
            is_default: false,
        }
    }

    pub fn with_full_code(mut self, code: impl Into<String>) -> Self {
        self.code_full = Some(code.into());
        self
    }

    pub fn with_encrypted_code(mut self, code: impl Into<String>) -> Self {
        self.code_encrypted = Some(code.into());
        self
    }

    pub fn with_dependency(mut self, package: impl Into<String>, range: impl Into<String>) -> Self {
        self.dependencies.insert(package, range);
        self
    }

    pub fn with_dependencies(mut self, dependencies: Dependencies) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_dark_mode(mut self, code: impl Into<String>) -> Self {
        self.supports_dark_mode = true;
        self.dark_mode_code = Some(code.into());
        self
    }

    pub fn with_file(mut self, file: VersionFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_integration(mut self, integration: Integration) -> Self {
        self.integrations.push(integration);
        self
    }

    pub fn with_config(mut self, requirement: ConfigRequirement) -> Self {
        self.config_required.push(requirement);
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_content(ContentView {
            code_preview: &self.code_preview,
            supports_dark_mode: self.supports_dark_mode,
            dark_mode_code: self.dark_mode_code.as_deref(),
            dependencies: &self.dependencies,
            config_required: &self.config_required,
            integrations: &self.integrations,
            files: &self.files,
        })
    }
}

// ── Update payload ────────────────────────────────────────────────────────────

/// Whitelisted partial update. `None` leaves a field untouched.
///
/// The optional code fields are doubly optional: an absent key keeps the
/// current value, an explicit JSON `null` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VersionPatch {
    pub code_preview: Option<String>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub code_full: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub code_encrypted: Option<Option<String>>,
    pub dependencies: Option<Dependencies>,
    pub config_required: Option<Vec<ConfigRequirement>>,
    pub integrations: Option<Vec<Integration>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub integration_code: Option<Option<String>>,
    pub files: Option<Vec<VersionFile>>,
    pub supports_dark_mode: Option<bool>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dark_mode_code: Option<Option<String>>,
}

/// A key that is present maps to `Some`, even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl VersionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn code_preview(mut self, code: impl Into<String>) -> Self {
        self.code_preview = Some(code.into());
        self
    }

    pub fn code_full(mut self, code: impl Into<String>) -> Self {
        self.code_full = Some(Some(code.into()));
        self
    }

    pub fn clear_code_full(mut self) -> Self {
        self.code_full = Some(None);
        self
    }

    pub fn dependencies(mut self, dependencies: Dependencies) -> Self {
        self.dependencies = Some(dependencies);
        self
    }

    pub fn dark_mode(mut self, code: impl Into<String>) -> Self {
        self.supports_dark_mode = Some(true);
        self.dark_mode_code = Some(Some(code.into()));
        self
    }

    /// Turn dark mode off and drop the dark variant.
    pub fn no_dark_mode(mut self) -> Self {
        self.supports_dark_mode = Some(false);
        self.dark_mode_code = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// ── Shared validation ─────────────────────────────────────────────────────────

struct ContentView<'a> {
    code_preview: &'a str,
    supports_dark_mode: bool,
    dark_mode_code: Option<&'a str>,
    dependencies: &'a Dependencies,
    config_required: &'a [ConfigRequirement],
    integrations: &'a [Integration],
    files: &'a [VersionFile],
}

fn validate_content(view: ContentView<'_>) -> Result<(), DomainError> {
    if view.code_preview.trim().is_empty() {
        return Err(DomainError::MissingRequiredField {
            field: "code_preview",
        });
    }

    if view.dark_mode_code.is_some() && !view.supports_dark_mode {
        return Err(DomainError::InvalidPayload(
            "dark_mode_code supplied but supports_dark_mode is false".into(),
        ));
    }

    if let Some((_, range)) = view.dependencies.iter().find(|(k, _)| k.trim().is_empty()) {
        return Err(DomainError::InvalidPayload(format!(
            "dependency with blank package name (range '{range}')"
        )));
    }

    if view.config_required.iter().any(|c| c.name.trim().is_empty()) {
        return Err(DomainError::MissingRequiredField {
            field: "config_required.name",
        });
    }

    if view.integrations.iter().any(|i| i.name.trim().is_empty()) {
        return Err(DomainError::MissingRequiredField {
            field: "integrations.name",
        });
    }

    let mut seen = HashSet::new();
    for file in view.files {
        if !seen.insert(file.path.as_path()) {
            return Err(DomainError::DuplicatePath {
                path: file.path.to_string(),
            });
        }
    }

    Ok(())
}
