//! The framework × CSS-framework variant matrix.

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::version::ComponentVersion,
    value_objects::{CssFramework, Framework},
};

/// Coordinates of one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantKey {
    pub framework: Framework,
    pub css_framework: CssFramework,
}

impl VariantKey {
    pub const fn new(framework: Framework, css_framework: CssFramework) -> Self {
        Self {
            framework,
            css_framework,
        }
    }

    /// Every supported pair, frameworks outermost, in declaration order.
    pub fn matrix() -> impl Iterator<Item = VariantKey> {
        Framework::ALL.into_iter().flat_map(|framework| {
            CssFramework::ALL
                .into_iter()
                .map(move |css| VariantKey::new(framework, css))
        })
    }

    pub fn matches(&self, version: &ComponentVersion) -> bool {
        version.framework == self.framework && version.css_framework == self.css_framework
    }
}

impl std::fmt::Display for VariantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.framework, self.css_framework)
    }
}

/// One cell of the matrix with the latest version for that pair, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCell {
    pub framework: Framework,
    pub css_framework: CssFramework,
    pub version: Option<ComponentVersion>,
    pub is_available: bool,
}

impl VariantCell {
    pub fn new(key: VariantKey, version: Option<ComponentVersion>) -> Self {
        Self {
            framework: key.framework,
            css_framework: key.css_framework,
            is_available: version.is_some(),
            version,
        }
    }

    pub const fn key(&self) -> VariantKey {
        VariantKey::new(self.framework, self.css_framework)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_is_full_cross_product() {
        let cells: Vec<_> = VariantKey::matrix().collect();
        assert_eq!(cells.len(), Framework::ALL.len() * CssFramework::ALL.len());
        assert_eq!(cells[0], VariantKey::new(Framework::React, CssFramework::TailwindV3));
        assert_eq!(
            cells.last().copied(),
            Some(VariantKey::new(Framework::Html, CssFramework::Vanilla))
        );
    }

    #[test]
    fn cell_availability_follows_version() {
        let key = VariantKey::new(Framework::Vue, CssFramework::Vanilla);
        let empty = VariantCell::new(key, None);
        assert!(!empty.is_available);
        assert_eq!(empty.key(), key);
    }
}
