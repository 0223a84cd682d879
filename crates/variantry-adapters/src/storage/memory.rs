//! In-memory preview storage for testing.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use variantry_core::{
    application::{ApplicationError, ports::PreviewStorage},
    domain::RelativePath,
    error::VariantryResult,
};

/// In-memory preview sink for testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<RwLock<HashMap<RelativePath, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a stored document (testing helper).
    pub fn read(&self, path: &RelativePath) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.get(path).cloned()
    }

    /// Every stored path, sorted.
    pub fn paths(&self) -> Vec<RelativePath> {
        let mut paths: Vec<RelativePath> = self
            .inner
            .read()
            .map(|inner| inner.keys().cloned().collect())
            .unwrap_or_default();
        paths.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        paths
    }
}

impl PreviewStorage for MemoryStorage {
    fn write(&self, path: &RelativePath, contents: &str) -> VariantryResult<String> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(path.clone(), contents.to_string());
        Ok(format!("memory://{path}"))
    }
}
