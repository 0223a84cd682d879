//! Coarse content diffing between a stored version and a candidate draft.
//!
//! This is not a source-code diff. It answers one question for the lifecycle
//! manager: did anything that matters change, and how much? The answer feeds
//! a fixed policy (see [`ChangeSet::decide`]) that keeps trivial metadata
//! edits from minting new version numbers while still creating a new,
//! auditable version whenever the visible preview changes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::entities::version::{ComponentVersion, VersionDraft};

/// Fields compared by the diff engine. Anything else is carried along but
/// never counts as a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedField {
    CodePreview,
    CodeFull,
    Dependencies,
    SupportsDarkMode,
    DarkModeCode,
}

impl TrackedField {
    pub const ALL: [TrackedField; 5] = [
        Self::CodePreview,
        Self::CodeFull,
        Self::Dependencies,
        Self::SupportsDarkMode,
        Self::DarkModeCode,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CodePreview => "code_preview",
            Self::CodeFull => "code_full",
            Self::Dependencies => "dependencies",
            Self::SupportsDarkMode => "supports_dark_mode",
            Self::DarkModeCode => "dark_mode_code",
        }
    }

    fn differs(self, existing: &ComponentVersion, candidate: &VersionDraft) -> bool {
        match self {
            Self::CodePreview => existing.code_preview != candidate.code_preview,
            Self::CodeFull => existing.code_full != candidate.code_full,
            Self::Dependencies => existing.dependencies != candidate.dependencies,
            Self::SupportsDarkMode => existing.supports_dark_mode != candidate.supports_dark_mode,
            Self::DarkModeCode => existing.dark_mode_code != candidate.dark_mode_code,
        }
    }
}

impl fmt::Display for TrackedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of comparing a candidate against the latest version of its lineage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub has_changes: bool,
    pub changed_fields: Vec<TrackedField>,
    /// Hint for logs and idempotence checks. Not a security primitive.
    pub content_hash: String,
}

/// What the lifecycle manager should do with a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDecision {
    /// Nothing tracked changed; hand back the existing version.
    Unchanged,
    /// Small metadata-only change; rewrite the existing version.
    UpdateInPlace,
    /// Mint a new version number.
    CreateNew,
}

impl ChangeSet {
    /// Largest number of changed fields still treated as an in-place edit.
    pub const IN_PLACE_LIMIT: usize = 2;

    /// Apply the update-vs-new-version policy.
    ///
    /// | Condition | Decision |
    /// |-----------|----------|
    /// | caller forced a new version | `CreateNew` |
    /// | no tracked field changed | `Unchanged` |
    /// | 1–2 fields changed, preview untouched | `UpdateInPlace` |
    /// | anything else | `CreateNew` |
    pub fn decide(&self, force_new: bool) -> ChangeDecision {
        if force_new {
            return ChangeDecision::CreateNew;
        }
        if !self.has_changes {
            return ChangeDecision::Unchanged;
        }
        if self.changed_fields.len() <= Self::IN_PLACE_LIMIT && !self.touches_preview() {
            return ChangeDecision::UpdateInPlace;
        }
        ChangeDecision::CreateNew
    }

    pub fn touches_preview(&self) -> bool {
        self.changed_fields.contains(&TrackedField::CodePreview)
    }
}

/// Compare a candidate draft with an existing version of the same
/// `(framework, css_framework)` pairing.
pub fn compare(existing: &ComponentVersion, candidate: &VersionDraft) -> ChangeSet {
    let changed_fields: Vec<TrackedField> = TrackedField::ALL
        .into_iter()
        .filter(|field| field.differs(existing, candidate))
        .collect();

    ChangeSet {
        has_changes: !changed_fields.is_empty(),
        changed_fields,
        content_hash: content_hash(
            &candidate.code_preview,
            candidate.code_full.as_deref(),
            candidate.code_encrypted.as_deref(),
        ),
    }
}

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a fold over preview, full and encrypted code, as 16 hex digits.
pub fn content_hash(preview: &str, full: Option<&str>, encrypted: Option<&str>) -> String {
    let mut h = FNV_OFFSET;
    for part in [preview, full.unwrap_or(""), encrypted.unwrap_or("")] {
        for byte in part.bytes() {
            h ^= u64::from(byte);
            h = h.wrapping_mul(FNV_PRIME);
        }
    }
    format!("{h:016x}")
}
