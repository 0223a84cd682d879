//! Read models for listing and summarizing versions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::{common::VersionId, version::ComponentVersion},
    error::DomainError,
    value_objects::{CssFramework, Framework},
};

/// 1-based page request.
///
/// Only constructed through [`PageRequest::new`], so deserialized requests
/// are bounds-checked too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest")]
pub struct PageRequest {
    page: usize,
    per_page: usize,
}

#[derive(Deserialize)]
struct RawPageRequest {
    page: usize,
    per_page: usize,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = DomainError;

    fn try_from(raw: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(raw.page, raw.per_page)
    }
}

impl PageRequest {
    pub const MAX_PER_PAGE: usize = 100;

    pub fn new(page: usize, per_page: usize) -> Result<Self, DomainError> {
        if page == 0 {
            return Err(DomainError::InvalidPage("page numbers start at 1".into()));
        }
        if per_page == 0 || per_page > Self::MAX_PER_PAGE {
            return Err(DomainError::InvalidPage(format!(
                "per_page must be between 1 and {}",
                Self::MAX_PER_PAGE
            )));
        }
        Ok(Self { page, per_page })
    }

    pub const fn page(&self) -> usize {
        self.page
    }

    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    /// Items to skip. Saturates for pages far past any real result set.
    pub const fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Slice `all` (already in display order) according to `request`.
    pub fn from_sorted(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len();
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(request.per_page)
            .collect();
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
            total_pages: total.div_ceil(request.per_page),
        }
    }
}

/// Per-component version counts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VersionStats {
    pub total: usize,
    pub by_framework: BTreeMap<Framework, usize>,
    pub by_css_framework: BTreeMap<CssFramework, usize>,
    pub default_version_id: Option<VersionId>,
    pub latest_version_number: Option<String>,
}

impl VersionStats {
    /// Summarize versions given newest first.
    pub fn from_newest_first(versions: &[ComponentVersion]) -> Self {
        let mut stats = Self {
            total: versions.len(),
            latest_version_number: versions.first().map(|v| v.version_number.clone()),
            ..Self::default()
        };
        for v in versions {
            *stats.by_framework.entry(v.framework).or_default() += 1;
            *stats.by_css_framework.entry(v.css_framework).or_default() += 1;
            if v.is_default {
                stats.default_version_id = Some(v.id);
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_bounds() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert!(PageRequest::new(1, 101).is_err());
        assert_eq!(PageRequest::new(3, 10).unwrap().offset(), 20);
    }

    #[test]
    fn page_slices_and_counts() {
        let page = Page::from_sorted((1..=7).collect::<Vec<_>>(), PageRequest::new(2, 3).unwrap());
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 3);

        let past_end = Page::from_sorted(vec![1, 2], PageRequest::new(5, 3).unwrap());
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total_pages, 1);
    }

    #[test]
    fn huge_page_number_is_just_empty() {
        let request = PageRequest::new(usize::MAX, 100).unwrap();
        assert_eq!(request.offset(), usize::MAX);

        let page = Page::from_sorted(vec![1, 2, 3], request);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn deserialized_requests_are_validated() {
        let ok: PageRequest = serde_json::from_str(r#"{"page":2,"per_page":5}"#).unwrap();
        assert_eq!((ok.page(), ok.per_page(), ok.offset()), (2, 5, 5));

        assert!(serde_json::from_str::<PageRequest>(r#"{"page":0,"per_page":5}"#).is_err());
        assert!(serde_json::from_str::<PageRequest>(r#"{"page":1,"per_page":1000}"#).is_err());
    }
}
