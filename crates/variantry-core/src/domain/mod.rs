// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Variantry.
//!
//! This module contains pure business logic: version numbering, content
//! diffing, access decisions, the variant matrix and preview compilation.
//! All I/O (persistence, license lookups, identity, storage) is reached via
//! ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **No logging**: Observability belongs to the application layer
//! - **Value semantics**: All domain objects are Clone + PartialEq
//! - **Rich domain model**: Behavior lives in entities, not services
//!
// Public API - what the world sees
pub mod access;
pub mod diff;
pub mod entities;
pub mod error;
pub mod listing;
pub mod preview;
pub mod value_objects;
pub mod variants;
pub mod version_number;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use access::{AccessDecision, AccessReason};
pub use diff::{ChangeDecision, ChangeSet, TrackedField};
pub use entities::{
    common::{ComponentId, PrincipalId, RelativePath, VersionId},
    component::{Component, Principal},
    version::{
        ComponentVersion, ConfigKind, ConfigRequirement, Dependencies, Integration, VersionDraft,
        VersionFile, VersionPatch,
    },
};
pub use error::DomainError;
pub use listing::{Page, PageRequest, VersionStats};
pub use preview::{PreviewDocument, PreviewOptions};
pub use validation::DomainValidator;
pub use value_objects::{AccessType, CssFramework, Framework, Pricing, Role};
pub use variants::{VariantCell, VariantKey};
pub use version_number::{VersionNumber, next_version_number};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Utc;

    use super::*;

    // ========================================================================
    // Value Object Tests
    // ========================================================================

    #[test]
    fn framework_parses_correctly() {
        assert_eq!(Framework::from_str("react").unwrap(), Framework::React);
        assert_eq!(Framework::from_str("VUE").unwrap(), Framework::Vue);
        assert_eq!(Framework::from_str("tsx").unwrap(), Framework::React);
        assert!(Framework::from_str("ember").is_err());
    }

    #[test]
    fn css_framework_parses_spellings() {
        assert_eq!(
            CssFramework::from_str("tailwind_v4").unwrap(),
            CssFramework::TailwindV4
        );
        assert_eq!(
            CssFramework::from_str("tailwind-v3").unwrap(),
            CssFramework::TailwindV3
        );
        assert_eq!(CssFramework::from_str("css").unwrap(), CssFramework::Vanilla);
        assert!(matches!(
            CssFramework::from_str("bootstrap"),
            Err(DomainError::UnknownVariant { axis: "css framework", .. })
        ));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for fw in Framework::ALL {
            assert_eq!(Framework::from_str(&fw.to_string()).unwrap(), fw);
        }
        for css in CssFramework::ALL {
            assert_eq!(CssFramework::from_str(&css.to_string()).unwrap(), css);
        }
    }

    #[test]
    fn only_angular_and_svelte_need_a_build() {
        let needs: Vec<_> = Framework::ALL
            .into_iter()
            .filter(|f| f.requires_build_step())
            .collect();
        assert_eq!(needs, vec![Framework::Angular, Framework::Svelte]);
    }

    #[test]
    fn serde_uses_wire_tags() {
        assert_eq!(
            serde_json::to_string(&CssFramework::TailwindV4).unwrap(),
            "\"tailwind_v4\""
        );
        assert_eq!(serde_json::to_string(&Framework::React).unwrap(), "\"react\"");
    }

    // ========================================================================
    // Identifier Tests
    // ========================================================================

    #[test]
    fn component_id_rejects_blank() {
        assert!(ComponentId::try_new("  ").is_err());
        assert!(serde_json::from_str::<ComponentId>("\"\"").is_err());
    }

    #[test]
    #[should_panic]
    fn component_id_new_panics_on_blank() {
        ComponentId::new("");
    }

    #[test]
    fn version_id_parses_uuid() {
        let id = VersionId::generate();
        assert_eq!(VersionId::from_str(&id.to_string()).unwrap(), id);
        assert!(VersionId::from_str("not-a-uuid").is_err());
        assert!(VersionId::from_str("00000000-0000-0000-0000-000000000000").is_err());
    }

    #[test]
    fn relative_path_rejects_escapes() {
        assert!(RelativePath::try_new("src/Button.tsx").is_ok());
        assert!(RelativePath::try_new("/etc/passwd").is_err());
        assert!(RelativePath::try_new("../outside.ts").is_err());
        assert!(RelativePath::try_new("").is_err());
    }

    // ========================================================================
    // Draft / Patch Tests
    // ========================================================================

    fn draft() -> VersionDraft {
        VersionDraft::new("C1", Framework::React, CssFramework::TailwindV4, "<Card/>")
    }

    #[test]
    fn draft_requires_preview_code() {
        let mut d = draft();
        d.code_preview = "   ".into();
        assert_eq!(
            DomainValidator::validate_draft(&d),
            Err(DomainError::MissingRequiredField {
                field: "code_preview"
            })
        );
    }

    #[test]
    fn draft_rejects_dark_code_without_flag() {
        let mut d = draft();
        d.dark_mode_code = Some("<Card dark/>".into());
        assert!(matches!(
            d.validate(),
            Err(DomainError::InvalidPayload(_))
        ));
    }

    #[test]
    fn draft_rejects_duplicate_files() {
        let d = draft()
            .with_file(VersionFile::new("Card.tsx", "a"))
            .with_file(VersionFile::new("Card.tsx", "b"));
        assert!(matches!(
            d.validate(),
            Err(DomainError::DuplicatePath { .. })
        ));
    }

    #[test]
    fn draft_deserializes_with_defaults() {
        let json = r#"{
            "component_id": "C1",
            "framework": "vue",
            "css_framework": "vanilla",
            "code_preview": "<div/>"
        }"#;
        let d: VersionDraft = serde_json::from_str(json).unwrap();
        assert_eq!(d.framework, Framework::Vue);
        assert!(d.dependencies.is_empty());
        assert!(!d.is_default);
    }

    #[test]
    fn patch_rejects_non_whitelisted_fields() {
        for forbidden in [
            r#"{"framework": "vue"}"#,
            r#"{"component_id": "C2"}"#,
            r#"{"version_number": "9.9.9"}"#,
            r#"{"css_framework": "vanilla"}"#,
            r#"{"is_default": true}"#,
        ] {
            assert!(
                serde_json::from_str::<VersionPatch>(forbidden).is_err(),
                "{forbidden} should be rejected"
            );
        }
        let ok: VersionPatch = serde_json::from_str(r#"{"dependencies": {"clsx": "^2"}}"#).unwrap();
        assert_eq!(ok.dependencies.unwrap().get("clsx"), Some("^2"));
    }

    #[test]
    fn empty_patch_is_invalid() {
        let v = ComponentVersion::from_draft(&draft(), "1.0.0".into(), Utc::now());
        assert!(DomainValidator::validate_patch(&v, &VersionPatch::new()).is_err());
    }

    #[test]
    fn patch_merge_is_revalidated() {
        let v = ComponentVersion::from_draft(&draft(), "1.0.0".into(), Utc::now());
        let mut patch = VersionPatch::new();
        patch.dark_mode_code = Some(Some("<Card dark/>".into()));
        assert!(DomainValidator::validate_patch(&v, &patch).is_err());

        let merged =
            DomainValidator::validate_patch(&v, &VersionPatch::new().dark_mode("<Card dark/>"))
                .unwrap();
        assert!(merged.supports_dark_mode);
    }

    #[test]
    fn turning_dark_mode_off_drops_dark_code() {
        let v = ComponentVersion::from_draft(
            &draft().with_dark_mode("<Card dark/>"),
            "1.0.0".into(),
            Utc::now(),
        );

        let mut off = VersionPatch::new();
        off.supports_dark_mode = Some(false);
        let merged = DomainValidator::validate_patch(&v, &off).unwrap();
        assert!(!merged.supports_dark_mode);
        assert_eq!(merged.dark_mode_code, None);

        let merged = DomainValidator::validate_patch(&v, &VersionPatch::new().no_dark_mode()).unwrap();
        assert_eq!(merged.dark_mode_code, None);
    }

    #[test]
    fn patch_null_clears_optional_code() {
        let v = ComponentVersion::from_draft(
            &draft().with_full_code("<Card full/>").with_encrypted_code("x9"),
            "1.0.0".into(),
            Utc::now(),
        );

        let patch: VersionPatch =
            serde_json::from_str(r#"{"code_full": null, "integration_code": "init()"}"#).unwrap();
        assert_eq!(patch.code_full, Some(None));
        assert_eq!(patch.code_encrypted, None);

        let merged = DomainValidator::validate_patch(&v, &patch).unwrap();
        assert_eq!(merged.code_full, None);
        assert_eq!(merged.code_encrypted.as_deref(), Some("x9"));
        assert_eq!(merged.integration_code.as_deref(), Some("init()"));
    }

    #[test]
    fn principal_accepts_owned_ids() {
        let user = String::from("ann");
        let p = Principal::member(user);
        assert_eq!(p.id.as_str(), "ann");
        assert!(!p.is_admin());
    }

    #[test]
    fn from_draft_never_copies_default_flag() {
        let v = ComponentVersion::from_draft(&draft().as_default(), "1.0.0".into(), Utc::now());
        assert!(!v.is_default);
        assert_eq!(v.created_at, v.updated_at);
    }

    #[test]
    fn absorb_keeps_identity() {
        let mut v = ComponentVersion::from_draft(&draft(), "1.0.4".into(), Utc::now());
        let id = v.id;
        v.absorb(&draft().with_dependency("clsx", "^2"), Utc::now());
        assert_eq!(v.id, id);
        assert_eq!(v.version_number, "1.0.4");
        assert_eq!(v.dependencies.len(), 1);
    }

    #[test]
    fn principal_roles() {
        assert!(DomainValidator::is_admin(Some(&Principal::admin("root"))));
        assert!(!DomainValidator::is_admin(Some(&Principal::member("ann"))));
        assert!(!DomainValidator::is_admin(None));
    }
}
