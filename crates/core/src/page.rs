//! Pagination envelope for read operations.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// 1-based page request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub const MAX_PAGE_SIZE: u32 = 500;

    pub fn new(page: u32, page_size: u32) -> EngineResult<Self> {
        if page == 0 {
            return Err(EngineError::validation("page is 1-based"));
        }
        if page_size == 0 || page_size > Self::MAX_PAGE_SIZE {
            return Err(EngineError::validation(format!(
                "page_size must be in 1..={}, got {page_size}",
                Self::MAX_PAGE_SIZE
            )));
        }
        Ok(Self { page, page_size })
    }

    fn offset(&self) -> usize {
        ((self.page - 1) as usize) * (self.page_size as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
        }
    }
}

/// One page of results plus the total row count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Slice an already-ordered full result set into one page.
    pub fn from_all(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len();
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(request.page_size as usize)
            .collect();
        Self {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
        }
    }
}
