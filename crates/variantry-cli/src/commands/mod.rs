//! Command handlers.
//!
//! Each handler translates parsed arguments into service calls and renders
//! the result. No business logic lives here.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use variantry_adapters::{SnapshotStore, StaticIdentity};
use variantry_core::{
    application::{
        AccessService, BatchService, VariantService, VersionService,
        ports::{ComponentCatalog, IdentityProvider, VersionRepository},
    },
    domain::{ComponentVersion, Principal, Role, VersionId},
};

use crate::{
    cli::GlobalArgs,
    config::{AppConfig, IdentityConfig},
    error::{CliError, CliResult, IntoCli},
};

pub mod access;
pub mod batch;
pub mod completions;
pub mod component;
pub mod config;
pub mod init;
pub mod license;
pub mod preview;
pub mod variants;
pub mod version;

/// Services wired to the snapshot store for one invocation.
pub struct Context {
    store: SnapshotStore,
    identity: Arc<dyn IdentityProvider>,
    pub versions: VersionService,
    pub access: AccessService,
    pub variants: VariantService,
    pub batch: BatchService,
}

impl Context {
    /// Open the store named by `--store` or `store.path`.
    pub fn open(global: &GlobalArgs, config: &AppConfig) -> CliResult<Self> {
        let path = global
            .store
            .clone()
            .unwrap_or_else(|| config.store.path.clone());
        let store = SnapshotStore::open(path)?;
        let identity: Arc<dyn IdentityProvider> = Arc::new(identity_from(&config.identity)?);

        let repository: Arc<dyn VersionRepository> = Arc::new(store.repository().clone());
        let catalog: Arc<dyn ComponentCatalog> = Arc::new(store.catalog().clone());
        let versions = VersionService::new(Arc::clone(&repository), Arc::clone(&catalog));

        Ok(Self {
            access: AccessService::new(
                Arc::new(store.licenses().clone()),
                Arc::clone(&repository),
                Arc::clone(&catalog),
            ),
            variants: VariantService::new(repository, versions.clone()),
            batch: BatchService::new(versions.clone()),
            versions,
            identity,
            store,
        })
    }

    /// The configured caller, if any.
    pub fn principal(&self) -> Option<Principal> {
        self.identity.current_principal()
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Write every store back to the snapshot file.
    pub fn persist(&self) -> CliResult<()> {
        self.store.persist()?;
        debug!(path = %self.store.path().display(), "Store saved");
        Ok(())
    }
}

fn identity_from(config: &IdentityConfig) -> CliResult<StaticIdentity> {
    let Some(user) = config.user.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(StaticIdentity::anonymous());
    };
    let role: Role = config.role.parse().map_err(|e| CliError::ConfigError {
        message: format!("identity.role: {e}"),
        source: Some(Box::new(e)),
    })?;
    Ok(StaticIdentity::new(Principal::new(user, role)))
}

/// Parse a version id argument.
pub(crate) fn parse_id(raw: &str) -> CliResult<VersionId> {
    Ok(raw.parse::<VersionId>()?)
}

/// Read and deserialize a JSON payload file.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> CliResult<T> {
    let raw = std::fs::read_to_string(path)
        .with_cli_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&raw).with_cli_context(|| format!("Failed to parse '{}'", path.display()))
}

/// Ask before a destructive action unless `yes` was given.
pub(crate) fn confirm(action: &str, yes: bool) -> CliResult<()> {
    if yes {
        return Ok(());
    }
    prompt(action)
}

#[cfg(feature = "interactive")]
fn prompt(action: &str) -> CliResult<()> {
    if !console::Term::stderr().is_term() {
        return Err(CliError::ConfirmationRequired {
            action: action.to_string(),
        });
    }
    let accepted = dialoguer::Confirm::new()
        .with_prompt(format!("Really {action}?"))
        .default(false)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::other(e),
        })?;
    if accepted {
        Ok(())
    } else {
        Err(CliError::Cancelled)
    }
}

#[cfg(not(feature = "interactive"))]
fn prompt(_action: &str) -> CliResult<()> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

/// One table row per version.
pub(crate) fn version_row(v: &ComponentVersion) -> Vec<String> {
    vec![
        v.id.to_string(),
        v.version_number.clone(),
        v.framework.to_string(),
        v.css_framework.to_string(),
        if v.is_default { "*".into() } else { String::new() },
        v.created_at.format("%Y-%m-%d %H:%M").to_string(),
    ]
}

pub(crate) const VERSION_HEADERS: [&str; 6] =
    ["ID", "VERSION", "FRAMEWORK", "CSS", "DEFAULT", "CREATED"];
