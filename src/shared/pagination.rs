//! Pagination
//!
//! All list endpoints take a 1-indexed `page` and a `limit`, and report the
//! current page, the total page count and the total number of matches.

use serde::Deserialize;

use crate::shared::error::SharedError;

/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw `page`/`limit` query parameters as sent by the client
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PaginationParams {
    /// Resolve the parameters against an endpoint's default page size
    pub fn resolve(self, default_limit: u32) -> Result<PageRequest, SharedError> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(default_limit);
        PageRequest::new(page, limit)
    }
}

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Result<Self, SharedError> {
        if page == 0 {
            return Err(SharedError::validation("page", "must be at least 1"));
        }
        if limit == 0 {
            return Err(SharedError::validation("limit", "must be at least 1"));
        }
        Ok(Self {
            page,
            limit: limit.min(MAX_PAGE_SIZE),
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of documents to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// `ceil(total / limit)`
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }

    /// Slice one page out of an already-sorted sequence
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.limit as usize)
            .collect()
    }
}
