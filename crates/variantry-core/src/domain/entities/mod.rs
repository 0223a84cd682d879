pub mod common;
pub mod component;
pub mod version;

pub use crate::domain::DomainError;
pub use common::{ComponentId, PrincipalId, RelativePath, VersionId};
pub use component::{Component, Principal};
pub use version::{ComponentVersion, VersionDraft, VersionPatch};
