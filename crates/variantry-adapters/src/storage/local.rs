//! Local filesystem preview storage using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use variantry_core::{
    application::{ApplicationError, ports::PreviewStorage},
    domain::RelativePath,
    error::{VariantryError, VariantryResult},
};

/// Writes previews below a root directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create a storage adapter rooted at `root`. The directory is created on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PreviewStorage for LocalStorage {
    fn write(&self, path: &RelativePath, contents: &str) -> VariantryResult<String> {
        let target = self.root.join(path);

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| map_io_error(parent, e, "create directory"))?;
        }
        std::fs::write(&target, contents).map_err(|e| map_io_error(&target, e, "write file"))?;

        debug!(path = %target.display(), bytes = contents.len(), "Wrote preview");
        Ok(target.display().to_string())
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> VariantryError {
    ApplicationError::StorageError {
        path: path.display().to_string(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
