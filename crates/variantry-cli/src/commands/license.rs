//! `variantry license`: Manage the local license table that backs the
//! subscription lookup.

use tracing::instrument;

use variantry_adapters::LicenseTier;
use variantry_core::domain::PrincipalId;

use crate::{cli::LicenseCommands, commands::Context, error::CliResult, output::OutputManager};

#[instrument(skip_all)]
pub fn execute(cmd: LicenseCommands, ctx: Context, output: OutputManager) -> CliResult<()> {
    match cmd {
        LicenseCommands::Grant { user, tier } => {
            let tier: LicenseTier = tier.into();
            let user = PrincipalId::new(user);
            ctx.store().licenses().grant(user.clone(), tier)?;
            ctx.persist()?;

            if output.is_json() {
                return Ok(output.json(&serde_json::json!({
                    "user": user,
                    "tier": tier.as_str(),
                    "unlocks_paid": tier.is_sufficient(),
                }))?);
            }
            output.success(&format!("Granted {tier} to {user}"))?;
            if !tier.is_sufficient() {
                output.warning(&format!(
                    "{tier} does not unlock paid components (needs {} or higher)",
                    LicenseTier::SUFFICIENT
                ))?;
            }
        }

        LicenseCommands::Revoke { user } => {
            let user = PrincipalId::new(user);
            let removed = ctx.store().licenses().revoke(&user)?;
            if removed {
                ctx.persist()?;
            }

            if output.is_json() {
                return Ok(output.json(&serde_json::json!({
                    "user": user,
                    "revoked": removed,
                }))?);
            }
            if removed {
                output.success(&format!("Revoked license of {user}"))?;
            } else {
                output.warning(&format!("{user} had no license"))?;
            }
        }
    }

    Ok(())
}
