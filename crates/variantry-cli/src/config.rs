//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `VARIANTRY__<SECTION>__<KEY>`, e.g.
//!    `VARIANTRY__STORE__PATH`
//! 3. Config file (`--config`, or [`AppConfig::config_path`])
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where state is persisted.
    pub store: StoreConfig,
    /// Who the CLI acts as.
    pub identity: IdentityConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Preview publishing.
    pub preview: PreviewConfig,
    /// Listing defaults.
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON snapshot file.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// `None` means anonymous.
    #[serde(default)]
    pub user: Option<String>,
    /// `admin` or `member`.
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub default_page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                path: Self::default_store_path(),
            },
            identity: IdentityConfig {
                user: None,
                role: "member".into(),
            },
            output: OutputConfig {
                no_color: false,
                format: "auto".into(),
            },
            preview: PreviewConfig {
                output_dir: PathBuf::from("variantry-previews"),
            },
            catalog: CatalogConfig {
                default_page_size: 20,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration, layering file and environment over defaults.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        let defaults = Config::try_from(&Self::default()).map_err(config_error)?;

        let file = match config_file {
            Some(path) => File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(true),
            None => File::from(Self::config_path().as_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                Environment::with_prefix("VARIANTRY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(config_error)?;

        let config: Self = settings.try_deserialize().map_err(config_error)?;
        debug!(store = %config.store.path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `variantry.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "variantry", "variantry")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(Self::LOCAL_FILE))
    }

    /// File name used by `variantry init --local`.
    pub const LOCAL_FILE: &'static str = "variantry.toml";

    fn default_store_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "variantry", "variantry")
            .map(|d| d.data_dir().join("store.json"))
            .unwrap_or_else(|| PathBuf::from("variantry-store.json"))
    }

    /// Read one dotted key, e.g. `identity.user`.
    pub fn get(&self, key: &str) -> CliResult<String> {
        let value = match key {
            "store.path" => path_string(&self.store.path),
            "identity.user" => self.identity.user.clone().unwrap_or_default(),
            "identity.role" => self.identity.role.clone(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            "preview.output_dir" => path_string(&self.preview.output_dir),
            "catalog.default_page_size" => self.catalog.default_page_size.to_string(),
            _ => {
                return Err(CliError::ConfigError {
                    message: format!("Unknown config key: '{key}'"),
                    source: None,
                });
            }
        };
        Ok(value)
    }

    /// Every key [`get`](Self::get) understands.
    pub const KEYS: [&'static str; 7] = [
        "store.path",
        "identity.user",
        "identity.role",
        "output.no_color",
        "output.format",
        "preview.output_dir",
        "catalog.default_page_size",
    ];
}

fn path_string(path: &Path) -> String {
    path.display().to_string()
}

fn config_error(err: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: err.to_string(),
        source: Some(Box::new(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_identity_is_anonymous_member() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.identity.user, None);
        assert_eq!(cfg.identity.role, "member");
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("variantry.toml");
        std::fs::write(
            &path,
            "[identity]\nuser = \"root\"\nrole = \"admin\"\n\n[catalog]\ndefault_page_size = 5\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.identity.user.as_deref(), Some("root"));
        assert_eq!(cfg.identity.role, "admin");
        assert_eq!(cfg.catalog.default_page_size, 5);
        // Untouched sections keep their defaults.
        assert_eq!(cfg.output.format, "auto");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            AppConfig::load(Some(&path)),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn default_round_trips_through_toml() {
        let cfg = AppConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn get_known_and_unknown_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("catalog.default_page_size").unwrap(), "20");
        assert_eq!(cfg.get("identity.user").unwrap(), "");
        assert!(matches!(
            cfg.get("does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn every_listed_key_resolves() {
        let cfg = AppConfig::default();
        for key in AppConfig::KEYS {
            assert!(cfg.get(key).is_ok(), "{key}");
        }
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
