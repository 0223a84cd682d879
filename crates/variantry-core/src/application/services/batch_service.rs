//! Batch Service - applies one operation to many versions.
//!
//! Items run one after another in submission order. A failing item never
//! stops the batch; its error is recorded and the next item runs.

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    application::services::VersionService,
    domain::{Principal, VersionId, VersionPatch},
    error::{ErrorCategory, VariantryError, VariantryResult},
};

/// Operation applied to every id of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    Delete,
    SetDefault,
    Update(VersionPatch),
}

impl BatchOperation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::SetDefault => "set_default",
            Self::Update(_) => "update",
        }
    }
}

/// A captured per-item failure.
///
/// `id` is the item as submitted, which may not be a well-formed version id.
#[derive(Debug, Clone)]
pub struct BatchError {
    pub id: String,
    pub error: VariantryError,
    pub category: ErrorCategory,
}

impl Serialize for BatchError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("BatchError", 3)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("error", &self.error.to_string())?;
        s.serialize_field("category", self.category.as_str())?;
        s.end()
    }
}

/// Aggregate outcome of a batch.
///
/// `processed` always equals the number of submitted ids and
/// `successful + failed == processed`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    /// Ids that succeeded, in submission order.
    pub results: Vec<VersionId>,
    pub errors: Vec<BatchError>,
}

impl BatchReport {
    fn record(&mut self, submitted: String, outcome: VariantryResult<VersionId>) {
        self.processed += 1;
        match outcome {
            Ok(id) => {
                self.successful += 1;
                self.results.push(id);
            }
            Err(error) => {
                self.failed += 1;
                self.errors.push(BatchError {
                    id: submitted,
                    category: error.category(),
                    error,
                });
            }
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Batch operation coordinator.
pub struct BatchService {
    versions: VersionService,
}

impl BatchService {
    pub fn new(versions: VersionService) -> Self {
        Self { versions }
    }

    #[instrument(skip_all, fields(operation = operation.as_str(), items = ids.len()))]
    pub fn run_batch(
        &self,
        operation: &BatchOperation,
        ids: &[VersionId],
        requester: Option<&Principal>,
    ) -> BatchReport {
        self.run(
            operation,
            ids.iter().map(|id| (id.to_string(), Ok(*id))),
            requester,
        )
    }

    /// Like [`run_batch`](Self::run_batch), for ids that have not been parsed
    /// yet. A malformed id fails its own item with a validation error.
    #[instrument(skip_all, fields(operation = operation.as_str(), items = ids.len()))]
    pub fn run_batch_raw<S: AsRef<str>>(
        &self,
        operation: &BatchOperation,
        ids: &[S],
        requester: Option<&Principal>,
    ) -> BatchReport {
        self.run(
            operation,
            ids.iter().map(|raw| {
                let raw = raw.as_ref();
                let parsed = raw.trim().parse::<VersionId>().map_err(VariantryError::from);
                (raw.to_string(), parsed)
            }),
            requester,
        )
    }

    fn run(
        &self,
        operation: &BatchOperation,
        items: impl Iterator<Item = (String, VariantryResult<VersionId>)>,
        requester: Option<&Principal>,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for (submitted, parsed) in items {
            let outcome = parsed.and_then(|id| self.apply(operation, &id, requester).map(|()| id));
            if let Err(e) = &outcome {
                warn!(id = %submitted, error = %e, "Batch item failed");
            }
            report.record(submitted, outcome);
        }

        info!(
            successful = report.successful,
            failed = report.failed,
            "Batch finished"
        );
        report
    }

    fn apply(
        &self,
        operation: &BatchOperation,
        id: &VersionId,
        requester: Option<&Principal>,
    ) -> VariantryResult<()> {
        match operation {
            BatchOperation::Delete => self.versions.delete(id, requester),
            BatchOperation::SetDefault => self.versions.set_as_default(id, requester).map(|_| ()),
            BatchOperation::Update(patch) => {
                self.versions.update(id, patch.clone(), requester).map(|_| ())
            }
        }
    }
}
