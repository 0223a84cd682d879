//! `variantry preview`: Compile the live preview page of a version.

use std::sync::Arc;

use tracing::instrument;

use variantry_adapters::LocalStorage;
use variantry_core::{application::PreviewService, domain::PreviewOptions};

use crate::{
    cli::PreviewArgs,
    commands::{Context, parse_id},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(id = %args.id, dark = args.dark))]
pub fn execute(
    args: PreviewArgs,
    ctx: Context,
    config: &AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let id = parse_id(&args.id)?;
    let options = PreviewOptions {
        dark_mode: args.dark,
    };
    let root = args
        .out_dir
        .unwrap_or_else(|| config.preview.output_dir.clone());
    let store = ctx.store();
    let previews = PreviewService::new(
        Arc::new(store.repository().clone()),
        Arc::new(store.catalog().clone()),
        Arc::new(LocalStorage::new(root)),
    );

    if args.stdout {
        let (_, document) = previews.compile(&id, options)?;
        output.data(&document.html)?;
        return Ok(());
    }

    let published = previews.publish(&id, options)?;
    if output.is_json() {
        return Ok(output.json(&serde_json::json!({
            "path": published.path,
            "location": published.location,
            "framework": published.document.framework,
            "css_framework": published.document.css_framework,
            "dark_mode": published.document.dark_mode,
        }))?);
    }
    output.success(&format!("Preview written to {}", published.location))?;
    Ok(())
}
