//! Preview Service - compiles previews and hands them to storage.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{ComponentCatalog, PreviewStorage, VersionRepository},
    },
    domain::{
        ComponentVersion, PreviewDocument, PreviewOptions, RelativePath, VersionId, preview,
    },
    error::VariantryResult,
};

/// A compiled preview that has been written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPreview {
    pub path: RelativePath,
    /// Where the storage adapter put it (file path, URL, ...).
    pub location: String,
    pub document: PreviewDocument,
}

pub struct PreviewService {
    repository: Arc<dyn VersionRepository>,
    catalog: Arc<dyn ComponentCatalog>,
    storage: Arc<dyn PreviewStorage>,
}

impl PreviewService {
    pub fn new(
        repository: Arc<dyn VersionRepository>,
        catalog: Arc<dyn ComponentCatalog>,
        storage: Arc<dyn PreviewStorage>,
    ) -> Self {
        Self {
            repository,
            catalog,
            storage,
        }
    }

    /// Compile the preview page of a stored version.
    #[instrument(skip(self))]
    pub fn compile(
        &self,
        version_id: &VersionId,
        options: PreviewOptions,
    ) -> VariantryResult<(ComponentVersion, PreviewDocument)> {
        let version = self
            .repository
            .find_by_id(version_id)?
            .ok_or(ApplicationError::VersionNotFound { id: *version_id })?;
        let component = self
            .catalog
            .find_component(&version.component_id)?
            .ok_or_else(|| ApplicationError::ComponentNotFound {
                id: version.component_id.clone(),
            })?;

        let document = preview::compile(&version, &component, options);
        Ok((version, document))
    }

    /// Compile and write the preview under its conventional path.
    #[instrument(skip(self))]
    pub fn publish(
        &self,
        version_id: &VersionId,
        options: PreviewOptions,
    ) -> VariantryResult<PublishedPreview> {
        let (version, document) = self.compile(version_id, options)?;
        let path = document.storage_path(&version)?;
        let location = self.storage.write(&path, &document.html)?;

        info!(%path, %location, "Published preview");
        Ok(PublishedPreview {
            path,
            location,
            document,
        })
    }
}
