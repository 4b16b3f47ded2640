//! Page window arithmetic for the list operation.
//!
//! `offset = (page - 1) * item_per_page`, `limit = item_per_page` and
//! `total_page = ceil(total_item / item_per_page)`, with zero items giving
//! zero pages. Pages past the end are valid and simply select nothing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest offset/limit a SQL `LIMIT ? OFFSET ?` can bind.
const MAX_WINDOW_VALUE: u64 = i64::MAX as u64;

/// Caller-supplied page selection. Both fields are 1-based and non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub item_per_page: u64,
}

impl PageRequest {
    pub fn new(page: u64, item_per_page: u64) -> Self {
        Self {
            page,
            item_per_page,
        }
    }

    pub fn validate(&self) -> Result<(), PaginationError> {
        if self.page == 0 {
            return Err(PaginationError::ZeroPage);
        }
        if self.item_per_page == 0 {
            return Err(PaginationError::ZeroItemPerPage);
        }
        Ok(())
    }
}

/// Rows selected by one page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
    pub total_page: u64,
}

impl PageWindow {
    pub fn compute(total_item: u64, request: &PageRequest) -> Result<Self, PaginationError> {
        request.validate()?;
        let offset = (request.page - 1)
            .checked_mul(request.item_per_page)
            .filter(|offset| *offset <= MAX_WINDOW_VALUE && request.item_per_page <= MAX_WINDOW_VALUE)
            .ok_or(PaginationError::WindowOverflow {
                page: request.page,
                item_per_page: request.item_per_page,
            })?;

        Ok(Self {
            offset,
            limit: request.item_per_page,
            total_page: total_item.div_ceil(request.item_per_page),
        })
    }

    /// Whether the window starts at or past the last row.
    pub fn is_past_end(&self, total_item: u64) -> bool {
        self.offset >= total_item
    }
}

/// Pagination metadata returned alongside a page of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total_item: u64,
    pub page: u64,
    pub item_per_page: u64,
    pub total_page: u64,
}

impl PageMeta {
    pub fn new(total_item: u64, request: &PageRequest, window: &PageWindow) -> Self {
        Self {
            total_item,
            page: request.page,
            item_per_page: request.item_per_page,
            total_page: window.total_page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("page must be at least 1")]
    ZeroPage,
    #[error("item_per_page must be at least 1")]
    ZeroItemPerPage,
    #[error("page {page} with {item_per_page} items per page is out of range")]
    WindowOverflow { page: u64, item_per_page: u64 },
}
