//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "create a version" or "who may see this code".

pub mod access_service;
pub mod batch_service;
pub mod preview_service;
pub mod variant_service;
pub mod version_service;

pub use access_service::AccessService;
pub use batch_service::{BatchError, BatchOperation, BatchReport, BatchService};
pub use preview_service::{PreviewService, PublishedPreview};
pub use variant_service::VariantService;
pub use version_service::{CreateOutcome, VersionService};
