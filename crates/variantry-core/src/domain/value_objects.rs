//! Domain value objects: Framework, CssFramework, Pricing, AccessType, Role.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! Each carries its canonical string form, a lenient `FromStr` parser and
//! an `ALL` table in declaration order. The variant matrix is the cross
//! product of `Framework::ALL` and `CssFramework::ALL`, so the order here is
//! the order operators see.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm, the `FromStr` arm and the `ALL` entry
//! 3. Teach `domain::preview` which includes it needs
//! 4. Done. The resolver picks it up from `ALL`

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Framework ─────────────────────────────────────────────────────────────────

/// UI framework a component version is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    React,
    Vue,
    Angular,
    Svelte,
    Html,
}

impl Framework {
    pub const ALL: [Framework; 5] = [
        Self::React,
        Self::Vue,
        Self::Angular,
        Self::Svelte,
        Self::Html,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::React => "react",
            Self::Vue => "vue",
            Self::Angular => "angular",
            Self::Svelte => "svelte",
            Self::Html => "html",
        }
    }

    /// Human-readable name used in preview titles and CLI tables.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::React => "React",
            Self::Vue => "Vue",
            Self::Angular => "Angular",
            Self::Svelte => "Svelte",
            Self::Html => "HTML",
        }
    }

    /// Whether source for this framework must be compiled ahead of time.
    ///
    /// Such frameworks cannot be previewed from a CDN runtime; the preview
    /// compiler emits a placeholder instead of script includes.
    pub const fn requires_build_step(self) -> bool {
        matches!(self, Self::Angular | Self::Svelte)
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "react" | "jsx" | "tsx" => Ok(Self::React),
            "vue" | "vuejs" => Ok(Self::Vue),
            "angular" | "ng" => Ok(Self::Angular),
            "svelte" => Ok(Self::Svelte),
            "html" | "vanilla-html" => Ok(Self::Html),
            other => Err(DomainError::UnknownVariant {
                axis: "framework",
                value: other.to_string(),
            }),
        }
    }
}

// ── CssFramework ──────────────────────────────────────────────────────────────

/// Styling approach a component version is written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CssFramework {
    TailwindV3,
    TailwindV4,
    Vanilla,
}

impl CssFramework {
    pub const ALL: [CssFramework; 3] = [Self::TailwindV3, Self::TailwindV4, Self::Vanilla];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TailwindV3 => "tailwind_v3",
            Self::TailwindV4 => "tailwind_v4",
            Self::Vanilla => "vanilla",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::TailwindV3 => "Tailwind CSS v3",
            Self::TailwindV4 => "Tailwind CSS v4",
            Self::Vanilla => "Vanilla CSS",
        }
    }
}

impl fmt::Display for CssFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CssFramework {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "tailwind_v3" | "tailwind3" | "tw3" => Ok(Self::TailwindV3),
            "tailwind_v4" | "tailwind4" | "tw4" | "tailwind" => Ok(Self::TailwindV4),
            "vanilla" | "css" | "plain" => Ok(Self::Vanilla),
            other => Err(DomainError::UnknownVariant {
                axis: "css framework",
                value: other.to_string(),
            }),
        }
    }
}

// ── Pricing / AccessType ──────────────────────────────────────────────────────

/// Pricing flag of a catalog component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pricing {
    #[default]
    Free,
    Paid,
}

impl Pricing {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for Pricing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pricing {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "paid" | "premium" | "pro" => Ok(Self::Paid),
            other => Err(DomainError::InvalidPayload(format!(
                "unknown pricing: {other}"
            ))),
        }
    }
}

/// How a paid component is licensed. Carried for display; the access gate
/// only looks at [`Pricing`] and the caller's tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    #[default]
    OneTime,
    Subscription,
    Team,
}

impl AccessType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneTime => "one_time",
            Self::Subscription => "subscription",
            Self::Team => "team",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "one_time" | "lifetime" => Ok(Self::OneTime),
            "subscription" | "sub" => Ok(Self::Subscription),
            "team" => Ok(Self::Team),
            other => Err(DomainError::InvalidPayload(format!(
                "unknown access type: {other}"
            ))),
        }
    }
}

// ── Role ──────────────────────────────────────────────────────────────────────

/// Role of an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Member,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "member" | "user" => Ok(Self::Member),
            other => Err(DomainError::InvalidPayload(format!("unknown role: {other}"))),
        }
    }
}
