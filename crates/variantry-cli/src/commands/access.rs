//! `variantry access`: Run the access gate for a version.

use tracing::instrument;

use variantry_core::domain::{AccessDecision, Principal};

use crate::{
    cli::AccessArgs,
    commands::{Context, parse_id},
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(id = %args.id))]
pub fn execute(args: AccessArgs, ctx: Context, output: OutputManager) -> CliResult<()> {
    let id = parse_id(&args.id)?;
    let caller = if args.anonymous {
        None
    } else if let Some(user) = args.user {
        Some(Principal::member(user))
    } else {
        ctx.principal()
    };

    let decision = ctx.access.resolve_access_for_version(&id, caller.as_ref())?;

    if output.is_json() {
        return Ok(output.json(&decision)?);
    }

    let who = caller
        .as_ref()
        .map_or_else(|| "anonymous".to_string(), |p| p.id.to_string());
    if decision.has_access {
        output.success(&format!("{who} has full access"))?;
    } else {
        output.warning(&format!("{who} sees the preview only"))?;
    }
    output.fields(&flags(&decision))?;

    if args.show_code {
        output.header("Code")?;
        output.data(&decision.code_to_show)?;
    }
    Ok(())
}

fn flags(decision: &AccessDecision) -> [(&'static str, String); 5] {
    [
        ("reason", decision.reason.to_string()),
        ("view code", decision.can_view_code.to_string()),
        ("copy", decision.can_copy.to_string()),
        ("download", decision.can_download.to_string()),
        ("has access", decision.has_access.to_string()),
    ]
}
