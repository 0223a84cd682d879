//! Variant Service - resolves the framework × CSS matrix of a component.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::VersionRepository, services::VersionService},
    domain::{ComponentId, ComponentVersion, CssFramework, Framework, VariantCell, VariantKey},
    error::VariantryResult,
};

/// Service for variant lookups.
#[derive(Clone)]
pub struct VariantService {
    repository: Arc<dyn VersionRepository>,
    versions: VersionService,
}

impl VariantService {
    pub fn new(repository: Arc<dyn VersionRepository>, versions: VersionService) -> Self {
        Self {
            repository,
            versions,
        }
    }

    /// One cell per supported pair, in declaration order, each holding the
    /// newest version of that pair.
    #[instrument(skip(self))]
    pub fn list_variants(&self, component_id: &ComponentId) -> VariantryResult<Vec<VariantCell>> {
        let versions = self.repository.find_by_component(component_id)?;

        let cells: Vec<VariantCell> = VariantKey::matrix()
            .map(|key| {
                let newest = versions.iter().find(|v| key.matches(v)).cloned();
                VariantCell::new(key, newest)
            })
            .collect();

        debug!(
            available = cells.iter().filter(|c| c.is_available).count(),
            "Resolved variant matrix"
        );
        Ok(cells)
    }

    /// Pick the version to show for a requested variant.
    ///
    /// - both axes given: newest version of that exact pair
    /// - one axis given: the default version if it matches, otherwise the
    ///   newest version matching that axis
    /// - nothing given: the default version
    #[instrument(skip(self))]
    pub fn resolve_variant(
        &self,
        component_id: &ComponentId,
        framework: Option<Framework>,
        css_framework: Option<CssFramework>,
    ) -> VariantryResult<ComponentVersion> {
        let unavailable = |fw: Option<Framework>, css: Option<CssFramework>| {
            ApplicationError::VariantUnavailable {
                component_id: component_id.clone(),
                variant: format!(
                    "{}/{}",
                    fw.map_or("*", |f| f.as_str()),
                    css.map_or("*", |c| c.as_str())
                ),
            }
        };

        match (framework, css_framework) {
            (Some(fw), Some(css)) => self
                .repository
                .find_by_framework(component_id, fw, Some(css))?
                .into_iter()
                .next()
                .ok_or_else(|| unavailable(Some(fw), Some(css)).into()),
            (None, None) => self.versions.get_default_version(component_id),
            (fw, css) => {
                let matches = |v: &ComponentVersion| {
                    fw.is_none_or(|f| v.framework == f) && css.is_none_or(|c| v.css_framework == c)
                };
                if let Some(default) = self.repository.find_default(component_id)? {
                    if matches(&default) {
                        return Ok(default);
                    }
                }
                self.repository
                    .find_by_component(component_id)?
                    .into_iter()
                    .find(|v| matches(v))
                    .ok_or_else(|| unavailable(fw, css).into())
            }
        }
    }
}
