//! Code visibility decisions.
//!
//! An [`AccessDecision`] is always computed, never stored: it is a pure
//! function of the component's pricing flag, the caller's license state and
//! the version's code fields. "No access" is an ordinary value here, not an
//! error.

use serde::{Deserialize, Serialize};

use crate::domain::entities::version::ComponentVersion;

/// Why a decision came out the way it did. Useful in logs and CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    FreeComponent,
    Anonymous,
    Licensed,
    InsufficientTier,
    LookupFailed,
}

impl AccessReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FreeComponent => "free_component",
            Self::Anonymous => "anonymous",
            Self::Licensed => "licensed",
            Self::InsufficientTier => "insufficient_tier",
            Self::LookupFailed => "lookup_failed",
        }
    }
}

impl std::fmt::Display for AccessReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a caller may do with a version's code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    pub has_access: bool,
    pub can_view_code: bool,
    pub can_copy: bool,
    pub can_download: bool,
    pub code_to_show: String,
    pub reason: AccessReason,
}

impl AccessDecision {
    /// Full access: show the complete code, falling back to the preview.
    pub fn full(version: &ComponentVersion, reason: AccessReason) -> Self {
        Self {
            has_access: true,
            can_view_code: true,
            can_copy: true,
            can_download: true,
            code_to_show: version
                .code_full
                .clone()
                .unwrap_or_else(|| version.code_preview.clone()),
            reason,
        }
    }

    /// Preview only. The preview is public, so it is always shown.
    pub fn preview_only(version: &ComponentVersion, reason: AccessReason) -> Self {
        Self {
            has_access: false,
            can_view_code: false,
            can_copy: false,
            can_download: false,
            code_to_show: version.code_preview.clone(),
            reason,
        }
    }
}
