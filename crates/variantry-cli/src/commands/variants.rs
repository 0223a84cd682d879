//! `variantry variants`: The framework × CSS matrix of a component.

use tracing::instrument;

use variantry_core::domain::{ComponentId, CssFramework, Framework};

use crate::{
    cli::VariantsArgs,
    commands::{Context, VERSION_HEADERS, version_row},
    error::CliResult,
    output::OutputManager,
};

/// Without axes print the whole matrix; with at least one axis resolve the
/// version that would be served.
#[instrument(skip_all, fields(component = %args.component))]
pub fn execute(args: VariantsArgs, ctx: Context, output: OutputManager) -> CliResult<()> {
    let component = ComponentId::try_new(args.component)?;
    let framework: Option<Framework> = args.framework.map(Into::into);
    let css: Option<CssFramework> = args.css.map(Into::into);

    if framework.is_some() || css.is_some() {
        let version = ctx.variants.resolve_variant(&component, framework, css)?;
        if output.is_json() {
            return Ok(output.json(&version)?);
        }
        output.table(&VERSION_HEADERS, &[version_row(&version)])?;
        return Ok(());
    }

    let cells = ctx.variants.list_variants(&component)?;
    if output.is_json() {
        return Ok(output.json(&cells)?);
    }

    let rows: Vec<Vec<String>> = cells
        .iter()
        .map(|cell| {
            let (version, id) = match &cell.version {
                Some(v) => (v.version_number.clone(), v.id.to_string()),
                None => ("-".to_string(), String::new()),
            };
            vec![
                cell.framework.to_string(),
                cell.css_framework.to_string(),
                if cell.is_available { "yes" } else { "no" }.to_string(),
                version,
                id,
            ]
        })
        .collect();
    output.table(&["FRAMEWORK", "CSS", "AVAILABLE", "LATEST", "ID"], &rows)?;

    let available = cells.iter().filter(|c| c.is_available).count();
    output.info(&format!(
        "{available} of {} variants available for {component}",
        cells.len()
    ))?;
    Ok(())
}
