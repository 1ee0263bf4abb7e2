//! Common types

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Bounds applied when normalizing caller-supplied paging parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Normalized page request. Always has `page_number >= 1` and
/// `1 <= page_size <= max_page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page_number: u32,
    pub page_size: u32,
}

impl Pagination {
    /// Missing or non-positive values fall back to page 1 and the default size.
    pub fn normalize(page_number: Option<i64>, page_size: Option<i64>, limits: PageLimits) -> Self {
        let page_number = match page_number {
            Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
            _ => DEFAULT_PAGE_NUMBER,
        };

        let max = limits.max_page_size.max(1);
        let page_size = match page_size {
            Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX).min(max),
            _ => limits.default_page_size.clamp(1, max),
        };

        Self { page_number, page_size }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page_number - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::normalize(None, None, PageLimits::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl PaginationMetadata {
    pub fn new(pagination: Pagination, total_count: u64) -> Self {
        let page_size = u64::from(pagination.page_size);
        let total_pages = total_count.div_ceil(page_size);
        Self {
            current_page: pagination.page_number,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            page_size: pagination.page_size,
            total_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub metadata: PaginationMetadata,
    pub items: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, pagination: Pagination, total_count: u64) -> Self {
        Self {
            metadata: PaginationMetadata::new(pagination, total_count),
            items,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PaginatedResult<U> {
        PaginatedResult {
            metadata: self.metadata,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}
