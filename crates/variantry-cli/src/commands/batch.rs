//! `variantry batch`: One operation over many versions.
//!
//! Every id is attempted, malformed ones included, and failures are reported
//! per item. The store is saved when at least one item succeeded, and the
//! command exits non-zero when any item failed.

use tracing::instrument;

use variantry_core::application::{BatchOperation, BatchReport};

use crate::{
    cli::BatchCommands,
    commands::{Context, confirm, version::build_patch},
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(cmd: BatchCommands, ctx: Context, output: OutputManager) -> CliResult<()> {
    let (operation, raw_ids) = match cmd {
        BatchCommands::Delete { ids, yes } => {
            confirm(&format!("delete {} versions", ids.len()), yes)?;
            (BatchOperation::Delete, ids)
        }
        BatchCommands::SetDefault { ids } => (BatchOperation::SetDefault, ids),
        BatchCommands::Update { ids, patch } => (BatchOperation::Update(build_patch(patch)?), ids),
    };

    let report = ctx
        .batch
        .run_batch_raw(&operation, &raw_ids, ctx.principal().as_ref());
    if report.successful > 0 {
        ctx.persist()?;
    }

    render(&operation, &report, &output)?;

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::BatchIncomplete {
            failed: report.failed,
            processed: report.processed,
        })
    }
}

fn render(operation: &BatchOperation, report: &BatchReport, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        return Ok(output.json(report)?);
    }

    output.header(&format!(
        "batch {}: {} processed, {} succeeded, {} failed",
        operation.as_str(),
        report.processed,
        report.successful,
        report.failed
    ))?;
    for id in &report.results {
        output.success(&id.to_string())?;
    }
    for failure in &report.errors {
        output.warning(&format!(
            "{} [{}] {}",
            failure.id, failure.category, failure.error
        ))?;
    }
    Ok(())
}
