//! In-memory license registry.
//!
//! Stands in for the billing system. A user holds at most one tier; `Pro`
//! and above unlock paid components.

use std::{
    collections::BTreeMap,
    fmt,
    str::FromStr,
    sync::{Arc, RwLock},
};

use serde::{Deserialize, Serialize};
use tracing::debug;
use variantry_core::{
    application::{ApplicationError, ports::SubscriptionLookup},
    domain::{DomainError, PrincipalId},
    error::VariantryResult,
};

/// License tiers, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseTier {
    Free,
    Pro,
    Team,
}

impl LicenseTier {
    /// Lowest tier that unlocks paid components.
    pub const SUFFICIENT: LicenseTier = LicenseTier::Pro;

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Team => "team",
        }
    }

    pub fn is_sufficient(self) -> bool {
        self >= Self::SUFFICIENT
    }
}

impl fmt::Display for LicenseTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            "team" => Ok(Self::Team),
            other => Err(DomainError::UnknownVariant {
                axis: "license tier",
                value: other.to_string(),
            }),
        }
    }
}

/// One user's license, as persisted in snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseGrant {
    pub user: PrincipalId,
    pub tier: LicenseTier,
}

#[derive(Clone, Default)]
pub struct InMemoryLicenses {
    inner: Arc<RwLock<BTreeMap<PrincipalId, LicenseTier>>>,
}

impl InMemoryLicenses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_grants(grants: impl IntoIterator<Item = LicenseGrant>) -> Self {
        let map = grants.into_iter().map(|g| (g.user, g.tier)).collect();
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Set (or replace) a user's tier.
    pub fn grant(&self, user: PrincipalId, tier: LicenseTier) -> VariantryResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(user, tier);
        Ok(())
    }

    /// Returns `false` if the user held no license.
    pub fn revoke(&self, user: &PrincipalId) -> VariantryResult<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.remove(user).is_some())
    }

    pub fn tier_of(&self, user: &PrincipalId) -> VariantryResult<Option<LicenseTier>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.get(user).copied())
    }

    pub fn grants(&self) -> VariantryResult<Vec<LicenseGrant>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner
            .iter()
            .map(|(user, tier)| LicenseGrant {
                user: user.clone(),
                tier: *tier,
            })
            .collect())
    }
}

impl SubscriptionLookup for InMemoryLicenses {
    fn has_sufficient_tier(&self, user: &PrincipalId) -> VariantryResult<bool> {
        let tier = self.tier_of(user)?;
        debug!(%user, tier = ?tier, "License lookup");
        Ok(tier.is_some_and(LicenseTier::is_sufficient))
    }
}
