//! Pagination types shared by every listing operation.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TripmateError};

/// A 1-based page request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, starting at 1
    pub page: u32,
    /// Number of records per page
    pub size: u32,
}

impl PageRequest {
    /// Default page size used when the request layer does not send one.
    pub const DEFAULT_SIZE: u32 = 20;

    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Rejects page 0 and size 0.
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(TripmateError::invalid_input("page", "Page numbers start at 1"));
        }
        if self.size == 0 {
            return Err(TripmateError::invalid_input(
                "size",
                "Page size must be at least 1",
            ));
        }
        Ok(())
    }

    /// Number of records to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_SIZE)
    }
}

/// One page of an ordered listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    /// Records on this page, in listing order
    pub items: Vec<T>,
    /// Page number that was requested
    pub page: u32,
    /// Page size that was requested
    pub size: u32,
    /// Total number of records across all pages
    pub total: u64,
}

impl<T> Page<T> {
    /// Slices an already ordered, complete listing.
    pub fn from_ordered(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(request.size as usize)
            .collect();
        Self {
            items,
            page: request.page,
            size: request.size,
            total,
        }
    }

    /// Number of the last non-empty page (1 for an empty listing).
    pub fn last_page(&self) -> u32 {
        if self.total == 0 || self.size == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(self.size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}
