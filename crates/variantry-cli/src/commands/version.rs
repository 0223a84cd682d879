//! `variantry version`: The version lifecycle from the command line.
//!
//! Mutations pass the configured identity to the version service, which
//! enforces the admin role, and save the store when they succeed.

use tracing::{debug, instrument};

use variantry_core::{
    application::CreateOutcome,
    domain::{ComponentId, ComponentVersion, Dependencies, PageRequest, VersionDraft, VersionPatch},
};

use crate::{
    cli::{CreateArgs, PatchArgs, UpdateArgs, VersionCommands},
    commands::{Context, VERSION_HEADERS, confirm, parse_id, read_json, version_row},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    cmd: VersionCommands,
    ctx: Context,
    config: &AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        VersionCommands::Create(args) => create(args, &ctx, &output),
        VersionCommands::Update(args) => update(args, &ctx, &output),
        VersionCommands::Delete { id, yes } => delete(&id, yes, &ctx, &output),
        VersionCommands::SetDefault { id } => {
            let promoted = ctx
                .versions
                .set_as_default(&parse_id(&id)?, ctx.principal().as_ref())?;
            ctx.persist()?;
            if output.is_json() {
                return Ok(output.json(&promoted)?);
            }
            output.success(&format!(
                "{} v{} ({}/{}) is now the default of {}",
                promoted.id,
                promoted.version_number,
                promoted.framework,
                promoted.css_framework,
                promoted.component_id
            ))?;
            Ok(())
        }
        VersionCommands::Show { id } => {
            let version = ctx.versions.get_version(&parse_id(&id)?)?;
            show(&version, &output)
        }
        VersionCommands::List {
            component,
            page,
            per_page,
        } => {
            let per_page = per_page.unwrap_or(config.catalog.default_page_size);
            let request = PageRequest::new(page, per_page)?;
            let listing = ctx
                .versions
                .list_versions(&ComponentId::try_new(component)?, request)?;

            if output.is_json() {
                return Ok(output.json(&listing)?);
            }
            let rows: Vec<Vec<String>> = listing.items.iter().map(version_row).collect();
            output.table(&VERSION_HEADERS, &rows)?;
            output.info(&format!(
                "Page {} of {} ({} versions)",
                listing.page,
                listing.total_pages.max(1),
                listing.total
            ))?;
            Ok(())
        }
        VersionCommands::Default { component } => {
            let version = ctx
                .versions
                .get_default_version(&ComponentId::try_new(component)?)?;
            show(&version, &output)
        }
        VersionCommands::Next {
            component,
            framework,
        } => {
            let component = ComponentId::try_new(component)?;
            let next = ctx
                .versions
                .next_version_number(&component, framework.into())?;
            if output.is_json() {
                return Ok(output.json(&serde_json::json!({
                    "component_id": component,
                    "framework": variantry_core::domain::Framework::from(framework),
                    "next": next.to_string(),
                }))?);
            }
            output.data(&next.to_string())?;
            Ok(())
        }
        VersionCommands::Stats { component } => {
            let stats = ctx
                .versions
                .version_stats(&ComponentId::try_new(component)?)?;
            if output.is_json() {
                return Ok(output.json(&stats)?);
            }

            let mut pairs = vec![("total", stats.total.to_string())];
            pairs.push((
                "latest",
                stats.latest_version_number.clone().unwrap_or_else(|| "-".into()),
            ));
            pairs.push((
                "default",
                stats
                    .default_version_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".into()),
            ));
            output.fields(&pairs)?;

            if !stats.by_framework.is_empty() {
                output.header("By framework")?;
                let rows: Vec<Vec<String>> = stats
                    .by_framework
                    .iter()
                    .map(|(fw, n)| vec![fw.to_string(), n.to_string()])
                    .collect();
                output.table(&["FRAMEWORK", "COUNT"], &rows)?;
            }
            if !stats.by_css_framework.is_empty() {
                output.header("By CSS framework")?;
                let rows: Vec<Vec<String>> = stats
                    .by_css_framework
                    .iter()
                    .map(|(css, n)| vec![css.to_string(), n.to_string()])
                    .collect();
                output.table(&["CSS", "COUNT"], &rows)?;
            }
            Ok(())
        }
    }
}

#[instrument(skip_all, fields(force = args.force))]
fn create(args: CreateArgs, ctx: &Context, output: &OutputManager) -> CliResult<()> {
    let force = args.force;
    let draft = build_draft(args)?;
    debug!(
        component = %draft.component_id,
        framework = %draft.framework,
        css = %draft.css_framework,
        "Draft assembled"
    );

    let outcome = ctx
        .versions
        .create(draft, ctx.principal().as_ref(), force)?;
    if !matches!(outcome, CreateOutcome::Unchanged(_)) {
        ctx.persist()?;
    }

    if output.is_json() {
        return Ok(output.json(&serde_json::json!({
            "outcome": outcome.kind(),
            "version": outcome.version(),
        }))?);
    }

    let v = outcome.version();
    let summary = format!(
        "{} {}/{} v{} ({})",
        v.component_id, v.framework, v.css_framework, v.version_number, v.id
    );
    match outcome {
        CreateOutcome::Created(_) => output.success(&format!("Created {summary}"))?,
        CreateOutcome::Updated(_) => output.success(&format!("Updated in place {summary}"))?,
        CreateOutcome::Unchanged(_) => {
            output.info(&format!("No changes; kept {summary}"))?;
            output.info("Use --force to create a new version anyway")?;
        }
    }
    Ok(())
}

/// Draft from `--file`, then the explicit flags on top.
fn build_draft(args: CreateArgs) -> CliResult<VersionDraft> {
    let mut draft = match &args.file {
        Some(path) => read_json::<VersionDraft>(path)?,
        None => {
            let missing = |flag: &str| CliError::InvalidInput {
                message: format!("{flag} is required without --file"),
                source: None,
            };
            VersionDraft::new(
                ComponentId::try_new(args.component.ok_or_else(|| missing("--component"))?)?,
                args.framework.ok_or_else(|| missing("--framework"))?.into(),
                args.css.ok_or_else(|| missing("--css"))?.into(),
                args.preview.ok_or_else(|| missing("--preview"))?,
            )
        }
    };

    if let Some(full) = args.full {
        draft = draft.with_full_code(full);
    }
    for (package, range) in args.dependencies {
        draft = draft.with_dependency(package, range);
    }
    if let Some(dark) = args.dark_mode {
        draft = draft.with_dark_mode(dark);
    }
    if args.default {
        draft = draft.as_default();
    }
    Ok(draft)
}

/// Patch from `--file`, then the explicit flags on top.
pub(crate) fn build_patch(args: PatchArgs) -> CliResult<VersionPatch> {
    let mut patch = match &args.file {
        Some(path) => read_json::<VersionPatch>(path)?,
        None => VersionPatch::new(),
    };

    if let Some(preview) = args.preview {
        patch = patch.code_preview(preview);
    }
    if let Some(full) = args.full {
        patch = patch.code_full(full);
    }
    if !args.dependencies.is_empty() {
        let dependencies = args
            .dependencies
            .into_iter()
            .fold(Dependencies::new(), |deps, (package, range)| {
                deps.with(package, range)
            });
        patch = patch.dependencies(dependencies);
    }
    if let Some(dark) = args.dark_mode {
        patch = patch.dark_mode(dark);
    }
    if args.no_dark_mode {
        patch = patch.no_dark_mode();
    }
    Ok(patch)
}

#[instrument(skip_all, fields(id = %args.id))]
fn update(args: UpdateArgs, ctx: &Context, output: &OutputManager) -> CliResult<()> {
    let id = parse_id(&args.id)?;
    let patch = build_patch(args.patch)?;

    let updated = ctx.versions.update(&id, patch, ctx.principal().as_ref())?;
    ctx.persist()?;

    if output.is_json() {
        return Ok(output.json(&updated)?);
    }
    output.success(&format!(
        "Updated {} v{} ({}/{})",
        updated.id, updated.version_number, updated.framework, updated.css_framework
    ))?;
    Ok(())
}

fn delete(raw_id: &str, yes: bool, ctx: &Context, output: &OutputManager) -> CliResult<()> {
    let id = parse_id(raw_id)?;
    let version = ctx.versions.get_version(&id)?;
    confirm(
        &format!(
            "delete {} v{} ({}/{})",
            version.component_id, version.version_number, version.framework, version.css_framework
        ),
        yes,
    )?;

    ctx.versions.delete(&id, ctx.principal().as_ref())?;
    ctx.persist()?;

    if output.is_json() {
        return Ok(output.json(&serde_json::json!({ "deleted": id }))?);
    }
    output.success(&format!("Deleted {id}"))?;
    Ok(())
}

fn show(version: &ComponentVersion, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        return Ok(output.json(version)?);
    }

    let dependencies = if version.dependencies.is_empty() {
        "-".to_string()
    } else {
        version
            .dependencies
            .iter()
            .map(|(package, range)| format!("{package}@{range}"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    output.fields(&[
        ("id", version.id.to_string()),
        ("component", version.component_id.to_string()),
        ("version", version.version_number.clone()),
        ("framework", version.framework.to_string()),
        ("css", version.css_framework.to_string()),
        ("default", version.is_default.to_string()),
        ("full code", version.code_full.is_some().to_string()),
        ("dark mode", version.supports_dark_mode.to_string()),
        ("dependencies", dependencies),
        ("files", version.files.len().to_string()),
        ("created", version.created_at.to_rfc3339()),
        ("updated", version.updated_at.to_rfc3339()),
    ])?;
    output.header("Preview")?;
    output.data(&version.code_preview)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CssFramework, Framework};
    use variantry_core::domain::{CssFramework as CoreCss, Framework as CoreFramework};

    fn flag_args() -> CreateArgs {
        CreateArgs {
            file: None,
            component: Some("C1".into()),
            framework: Some(Framework::Vue),
            css: Some(CssFramework::Vanilla),
            preview: Some("<my-btn/>".into()),
            full: None,
            dependencies: vec![("vue".into(), "^3".into())],
            dark_mode: None,
            default: true,
            force: false,
        }
    }

    #[test]
    fn draft_from_flags() {
        let draft = build_draft(flag_args()).unwrap();
        assert_eq!(draft.component_id.as_str(), "C1");
        assert_eq!(draft.framework, CoreFramework::Vue);
        assert_eq!(draft.css_framework, CoreCss::Vanilla);
        assert_eq!(draft.dependencies.get("vue"), Some("^3"));
        assert!(draft.is_default);
    }

    #[test]
    fn draft_file_gets_flag_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");
        let base = VersionDraft::new("C2", CoreFramework::React, CoreCss::TailwindV4, "<A/>");
        std::fs::write(&path, serde_json::to_string(&base).unwrap()).unwrap();

        let args = CreateArgs {
            file: Some(path),
            component: None,
            framework: None,
            css: None,
            preview: None,
            full: Some("<A full/>".into()),
            dependencies: Vec::new(),
            dark_mode: None,
            default: false,
            force: false,
        };
        let draft = build_draft(args).unwrap();
        assert_eq!(draft.component_id.as_str(), "C2");
        assert_eq!(draft.code_full.as_deref(), Some("<A full/>"));
    }

    #[test]
    fn unreadable_draft_file_is_reported() {
        let args = CreateArgs {
            file: Some("/definitely/not/here.json".into()),
            ..flag_args()
        };
        assert!(matches!(build_draft(args), Err(CliError::IoError { .. })));
    }

    #[test]
    fn patch_flags_replace_dependencies() {
        let patch = build_patch(PatchArgs {
            file: None,
            preview: None,
            full: None,
            dependencies: vec![("react".into(), "^19".into())],
            dark_mode: None,
            no_dark_mode: false,
        })
        .unwrap();
        assert_eq!(
            patch.dependencies.as_ref().and_then(|d| d.get("react")),
            Some("^19")
        );
        assert!(patch.code_preview.is_none());
    }

    #[test]
    fn no_dark_mode_flag_clears_dark_code() {
        let patch = build_patch(PatchArgs {
            file: None,
            preview: None,
            full: None,
            dependencies: Vec::new(),
            dark_mode: None,
            no_dark_mode: true,
        })
        .unwrap();
        assert_eq!(patch.supports_dark_mode, Some(false));
        assert_eq!(patch.dark_mode_code, Some(None));
    }

    #[test]
    fn empty_patch_args_give_empty_patch() {
        let patch = build_patch(PatchArgs {
            file: None,
            preview: None,
            full: None,
            dependencies: Vec::new(),
            dark_mode: None,
            no_dark_mode: false,
        })
        .unwrap();
        assert!(patch.is_empty());
    }
}
