//! `variantry component`: Register and list catalog components.

use tracing::{info, instrument};

use variantry_core::domain::{Component, ComponentId};

use crate::{
    cli::{ComponentAddArgs, ComponentCommands},
    commands::Context,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(cmd: ComponentCommands, ctx: Context, output: OutputManager) -> CliResult<()> {
    match cmd {
        ComponentCommands::Add(args) => add(args, &ctx, &output),
        ComponentCommands::List => list(&ctx, &output),
    }
}

#[instrument(skip_all, fields(component = %args.id))]
fn add(args: ComponentAddArgs, ctx: &Context, output: &OutputManager) -> CliResult<()> {
    let id = ComponentId::try_new(args.id)?;
    let component = Component::new(id, args.name)
        .with_pricing(args.pricing.into())
        .with_access_type(args.access_type.into());

    let replaced = ctx.store().catalog().upsert(component.clone())?;
    ctx.persist()?;
    info!(replaced = replaced.is_some(), "Component saved");

    if output.is_json() {
        return Ok(output.json(&component)?);
    }
    let verb = if replaced.is_some() { "Updated" } else { "Added" };
    output.success(&format!(
        "{verb} component {} ({}, {})",
        component.id, component.name, component.pricing
    ))?;
    Ok(())
}

fn list(ctx: &Context, output: &OutputManager) -> CliResult<()> {
    let components = ctx.store().catalog().list()?;

    if output.is_json() {
        return Ok(output.json(&components)?);
    }
    if components.is_empty() {
        output.info("No components registered yet")?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = components
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.name.clone(),
                c.pricing.to_string(),
                c.access_type.to_string(),
            ]
        })
        .collect();
    output.table(&["ID", "NAME", "PRICING", "ACCESS"], &rows)?;
    Ok(())
}
