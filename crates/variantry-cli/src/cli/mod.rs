//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use variantry_adapters::LicenseTier as CoreTier;
use variantry_core::domain::{
    AccessType as CoreAccessType, CssFramework as CoreCss, Framework as CoreFramework,
    Pricing as CorePricing,
};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "variantry",
    bin_name = "variantry",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Component versions across frameworks and CSS stacks",
    long_about = "Variantry keeps versioned code for UI components, one lineage \
                  per framework and CSS framework, and decides who may see it.",
    after_help = "EXAMPLES:\n\
        \x20 variantry component add C1 --name Button\n\
        \x20 variantry version create --component C1 --framework react --css tailwind_v4 --preview '<Button/>'\n\
        \x20 variantry variants C1\n\
        \x20 variantry completions bash > /usr/share/bash-completion/completions/variantry",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Register and list catalog components.
    #[command(
        subcommand,
        about = "Manage catalog components",
        after_help = "EXAMPLES:\n\
            \x20 variantry component add C1 --name Button\n\
            \x20 variantry component add P1 --name 'Pricing table' --pricing paid\n\
            \x20 variantry component list"
    )]
    Component(ComponentCommands),

    /// Grant and revoke licenses.
    #[command(
        subcommand,
        about = "Manage user licenses",
        after_help = "EXAMPLES:\n\
            \x20 variantry license grant ann --tier pro\n\
            \x20 variantry license revoke ann"
    )]
    License(LicenseCommands),

    /// Create, inspect and maintain component versions.
    #[command(
        subcommand,
        visible_alias = "v",
        about = "Manage component versions",
        after_help = "EXAMPLES:\n\
            \x20 variantry version create --file draft.json\n\
            \x20 variantry version list C1 --page 2\n\
            \x20 variantry version set-default <ID>\n\
            \x20 variantry version next C1 --framework vue"
    )]
    Version(VersionCommands),

    /// Show the variant matrix, or resolve a single variant.
    #[command(
        about = "Show or resolve framework variants",
        after_help = "EXAMPLES:\n\
            \x20 variantry variants C1\n\
            \x20 variantry variants C1 --framework react --css tailwind_v4\n\
            \x20 variantry variants C1 --framework vue"
    )]
    Variants(VariantsArgs),

    /// Decide what a caller may see of a version's code.
    #[command(
        about = "Check code access for a version",
        after_help = "EXAMPLES:\n\
            \x20 variantry access <ID>\n\
            \x20 variantry access <ID> --user ann\n\
            \x20 variantry access <ID> --anonymous"
    )]
    Access(AccessArgs),

    /// Compile the live preview page of a version.
    #[command(
        about = "Compile a preview page",
        after_help = "EXAMPLES:\n\
            \x20 variantry preview <ID>\n\
            \x20 variantry preview <ID> --dark --stdout > preview.html"
    )]
    Preview(PreviewArgs),

    /// Apply one operation to many versions.
    #[command(
        subcommand,
        about = "Batch operations on versions",
        after_help = "EXAMPLES:\n\
            \x20 variantry batch delete <ID> <ID> --yes\n\
            \x20 variantry batch update <ID> <ID> --dependency react=^19"
    )]
    Batch(BatchCommands),

    /// Initialise a Variantry configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 variantry init            # default location\n\
            \x20 variantry init --local    # ./variantry.toml\n\
            \x20 variantry -c my.toml init # explicit path"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 variantry completions bash > ~/.local/share/bash-completion/completions/variantry\n\
            \x20 variantry completions zsh  > ~/.zfunc/_variantry\n\
            \x20 variantry completions fish > ~/.config/fish/completions/variantry.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Variantry configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 variantry config get store.path\n\
            \x20 variantry config list\n\
            \x20 variantry config path"
    )]
    Config(ConfigCommands),
}

// ── component ─────────────────────────────────────────────────────────────────

/// Subcommands for `variantry component`.
#[derive(Debug, Subcommand)]
pub enum ComponentCommands {
    /// Register a component, or replace an existing one.
    Add(ComponentAddArgs),
    /// List registered components.
    #[command(visible_alias = "ls")]
    List,
}

/// Arguments for `variantry component add`.
#[derive(Debug, Args)]
pub struct ComponentAddArgs {
    /// Component identifier.
    #[arg(value_name = "ID")]
    pub id: String,

    /// Display name.
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: String,

    /// Free components show their full code to everyone.
    #[arg(long = "pricing", value_enum, default_value = "free")]
    pub pricing: Pricing,

    #[arg(long = "access-type", value_enum, default_value = "one_time")]
    pub access_type: AccessType,
}

// ── license ───────────────────────────────────────────────────────────────────

/// Subcommands for `variantry license`.
#[derive(Debug, Subcommand)]
pub enum LicenseCommands {
    /// Give a user a license tier.
    Grant {
        /// User identifier.
        user: String,
        #[arg(short = 't', long = "tier", value_enum, default_value = "pro")]
        tier: Tier,
    },
    /// Remove a user's license.
    Revoke {
        /// User identifier.
        user: String,
    },
}

// ── version ───────────────────────────────────────────────────────────────────

/// Subcommands for `variantry version`.
#[derive(Debug, Subcommand)]
pub enum VersionCommands {
    /// Create a version, or update the latest one in place.
    Create(CreateArgs),
    /// Patch an existing version.
    Update(UpdateArgs),
    /// Delete a non-default version.
    #[command(visible_alias = "rm")]
    Delete {
        /// Version id.
        id: String,
        /// Skip the confirmation prompt.
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
    /// Make a version its component's default.
    SetDefault {
        /// Version id.
        id: String,
    },
    /// Print one version.
    Show {
        /// Version id.
        id: String,
    },
    /// List a component's versions, newest first.
    #[command(visible_alias = "ls")]
    List {
        /// Component id.
        component: String,
        #[arg(long = "page", default_value_t = 1)]
        page: usize,
        /// Defaults to `catalog.default_page_size`.
        #[arg(long = "per-page")]
        per_page: Option<usize>,
    },
    /// Print the version served when no variant is requested.
    Default {
        /// Component id.
        component: String,
    },
    /// Print the number the next version of a lineage would get.
    Next {
        /// Component id.
        component: String,
        #[arg(short = 'f', long = "framework", value_enum)]
        framework: Framework,
    },
    /// Per-framework counts and the current default.
    Stats {
        /// Component id.
        component: String,
    },
}

/// Arguments for `variantry version create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Read the whole draft from a JSON file.
    #[arg(
        long = "file",
        value_name = "FILE",
        conflicts_with_all = ["component", "framework", "css", "preview"]
    )]
    pub file: Option<PathBuf>,

    #[arg(long = "component", value_name = "ID", required_unless_present = "file")]
    pub component: Option<String>,

    #[arg(short = 'f', long = "framework", value_enum, required_unless_present = "file")]
    pub framework: Option<Framework>,

    #[arg(long = "css", value_enum, required_unless_present = "file")]
    pub css: Option<CssFramework>,

    /// Public preview code.
    #[arg(long = "preview", value_name = "CODE", required_unless_present = "file")]
    pub preview: Option<String>,

    /// Full (paid) code.
    #[arg(long = "full", value_name = "CODE")]
    pub full: Option<String>,

    /// Dependency as `package=range`; repeatable.
    #[arg(short = 'd', long = "dependency", value_name = "PKG=RANGE", value_parser = parse_dependency)]
    pub dependencies: Vec<(String, String)>,

    /// Dark-mode variant of the preview.
    #[arg(long = "dark-mode", value_name = "CODE")]
    pub dark_mode: Option<String>,

    /// Make the new version the component default.
    #[arg(long = "default")]
    pub default: bool,

    /// Always create a new version, even for identical content.
    #[arg(long = "force")]
    pub force: bool,
}

/// Fields that can be patched on a version.
#[derive(Debug, Clone, Args)]
pub struct PatchArgs {
    /// Read the patch from a JSON file.
    #[arg(long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[arg(long = "preview", value_name = "CODE")]
    pub preview: Option<String>,

    #[arg(long = "full", value_name = "CODE")]
    pub full: Option<String>,

    /// Replace the dependency set; repeatable `package=range`.
    #[arg(short = 'd', long = "dependency", value_name = "PKG=RANGE", value_parser = parse_dependency)]
    pub dependencies: Vec<(String, String)>,

    #[arg(long = "dark-mode", value_name = "CODE", conflicts_with = "no_dark_mode")]
    pub dark_mode: Option<String>,

    /// Turn dark mode off and drop the dark-mode code.
    #[arg(long = "no-dark-mode")]
    pub no_dark_mode: bool,
}

/// Arguments for `variantry version update`.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Version id.
    pub id: String,

    #[command(flatten)]
    pub patch: PatchArgs,
}

// ── variants / access / preview ───────────────────────────────────────────────

/// Arguments for `variantry variants`.
#[derive(Debug, Args)]
pub struct VariantsArgs {
    /// Component id.
    pub component: String,

    #[arg(short = 'f', long = "framework", value_enum)]
    pub framework: Option<Framework>,

    #[arg(long = "css", value_enum)]
    pub css: Option<CssFramework>,
}

/// Arguments for `variantry access`.
#[derive(Debug, Args)]
pub struct AccessArgs {
    /// Version id.
    pub id: String,

    /// Evaluate for this user instead of the configured identity.
    #[arg(short = 'u', long = "user", conflicts_with = "anonymous")]
    pub user: Option<String>,

    /// Evaluate for a caller without identity.
    #[arg(long = "anonymous")]
    pub anonymous: bool,

    /// Print the code the caller would see.
    #[arg(long = "show-code")]
    pub show_code: bool,
}

/// Arguments for `variantry preview`.
#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Version id.
    pub id: String,

    /// Render the dark-mode variant.
    #[arg(long = "dark")]
    pub dark: bool,

    /// Print the page instead of writing it.
    #[arg(long = "stdout", conflicts_with = "out_dir")]
    pub stdout: bool,

    /// Directory to publish into; defaults to `preview.output_dir`.
    #[arg(short = 'o', long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

// ── batch ─────────────────────────────────────────────────────────────────────

/// Subcommands for `variantry batch`.
#[derive(Debug, Subcommand)]
pub enum BatchCommands {
    /// Delete several versions.
    Delete {
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,
        /// Skip the confirmation prompt.
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
    /// Promote each version to its component default, in order.
    SetDefault {
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,
    },
    /// Apply the same patch to several versions.
    Update {
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,
        #[command(flatten)]
        patch: PatchArgs,
    },
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `variantry init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `variantry.toml` in the current directory.
    #[arg(long = "local", help = "Create local configuration in current directory")]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `variantry completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `variantry config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `store.path`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// UI frameworks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Framework {
    React,
    Vue,
    Angular,
    Svelte,
    Html,
}

impl From<Framework> for CoreFramework {
    fn from(value: Framework) -> Self {
        match value {
            Framework::React => Self::React,
            Framework::Vue => Self::Vue,
            Framework::Angular => Self::Angular,
            Framework::Svelte => Self::Svelte,
            Framework::Html => Self::Html,
        }
    }
}

/// CSS frameworks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CssFramework {
    #[value(name = "tailwind_v3", alias = "tw3")]
    TailwindV3,
    #[value(name = "tailwind_v4", alias = "tw4")]
    TailwindV4,
    #[value(name = "vanilla", alias = "css")]
    Vanilla,
}

impl From<CssFramework> for CoreCss {
    fn from(value: CssFramework) -> Self {
        match value {
            CssFramework::TailwindV3 => Self::TailwindV3,
            CssFramework::TailwindV4 => Self::TailwindV4,
            CssFramework::Vanilla => Self::Vanilla,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Pricing {
    Free,
    Paid,
}

impl From<Pricing> for CorePricing {
    fn from(value: Pricing) -> Self {
        match value {
            Pricing::Free => Self::Free,
            Pricing::Paid => Self::Paid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum AccessType {
    OneTime,
    Subscription,
    Team,
}

impl From<AccessType> for CoreAccessType {
    fn from(value: AccessType) -> Self {
        match value {
            AccessType::OneTime => Self::OneTime,
            AccessType::Subscription => Self::Subscription,
            AccessType::Team => Self::Team,
        }
    }
}

/// License tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Pro,
    Team,
}

impl From<Tier> for CoreTier {
    fn from(value: Tier) -> Self {
        match value {
            Tier::Free => Self::Free,
            Tier::Pro => Self::Pro,
            Tier::Team => Self::Team,
        }
    }
}

/// Split `package=range` at the first `=`.
fn parse_dependency(raw: &str) -> Result<(String, String), String> {
    let (package, range) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PKG=RANGE, got '{raw}'"))?;
    let package = package.trim();
    if package.is_empty() {
        return Err(format!("missing package name in '{raw}'"));
    }
    Ok((package.to_string(), range.trim().to_string()))
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn framework_conversion() {
        assert_eq!(CoreFramework::from(Framework::Svelte), CoreFramework::Svelte);
        assert_eq!(CoreCss::from(CssFramework::TailwindV4), CoreCss::TailwindV4);
    }

    #[test]
    fn parse_create_with_flags() {
        let cli = Cli::parse_from([
            "variantry",
            "version",
            "create",
            "--component",
            "C1",
            "--framework",
            "react",
            "--css",
            "tailwind_v4",
            "--preview",
            "<Button/>",
            "-d",
            "react=^18",
            "-d",
            "@scope/pkg=>=2 <3",
            "--default",
        ]);

        match cli.command {
            Commands::Version(VersionCommands::Create(args)) => {
                assert_eq!(args.component.as_deref(), Some("C1"));
                assert_eq!(args.framework, Some(Framework::React));
                assert_eq!(args.css, Some(CssFramework::TailwindV4));
                assert_eq!(
                    args.dependencies,
                    vec![
                        ("react".to_string(), "^18".to_string()),
                        ("@scope/pkg".to_string(), ">=2 <3".to_string()),
                    ]
                );
                assert!(args.default);
                assert!(!args.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn create_from_file_needs_no_flags() {
        let cli = Cli::parse_from(["variantry", "version", "create", "--file", "draft.json"]);
        assert!(matches!(
            cli.command,
            Commands::Version(VersionCommands::Create(CreateArgs { file: Some(_), .. }))
        ));
    }

    #[test]
    fn create_without_file_requires_variant() {
        let result = Cli::try_parse_from(["variantry", "version", "create", "--component", "C1"]);
        assert!(result.is_err());
    }

    #[test]
    fn css_aliases() {
        let cli = Cli::parse_from(["variantry", "variants", "C1", "--css", "tw3"]);
        match cli.command {
            Commands::Variants(args) => {
                assert_eq!(args.css, Some(CssFramework::TailwindV3));
                assert_eq!(args.framework, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn batch_requires_ids() {
        assert!(Cli::try_parse_from(["variantry", "batch", "delete"]).is_err());

        let cli = Cli::parse_from(["variantry", "batch", "set-default", "a", "b"]);
        assert!(matches!(
            cli.command,
            Commands::Batch(BatchCommands::SetDefault { ids }) if ids.len() == 2
        ));
    }

    #[test]
    fn access_user_conflicts_with_anonymous() {
        let result =
            Cli::try_parse_from(["variantry", "access", "id", "--user", "ann", "--anonymous"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["variantry", "-q", "-v", "component", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn dependency_parser() {
        assert_eq!(
            parse_dependency("vue=^3.4").unwrap(),
            ("vue".to_string(), "^3.4".to_string())
        );
        assert!(parse_dependency("vue").is_err());
        assert!(parse_dependency("=1.0").is_err());
    }
}
