//! Page arithmetic for paged reads.
//!
//! Pages are numbered from 1. Nothing here is cached: the total page count
//! is computed from a fresh count on every paged read.

use crate::common::FIRST_PAGE;

/// Number of pages needed to show `matching_count` documents, `page_size`
/// at a time. Never less than 1, so an empty result still has one (empty)
/// page. A zero `page_size` also yields 1.
///
/// # Examples
///
/// ```rust,ignore
/// assert_eq!(total_pages(0, 10), 1);
/// assert_eq!(total_pages(11, 10), 2);
/// ```
pub fn total_pages(matching_count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return FIRST_PAGE;
    }
    matching_count.div_ceil(page_size).max(FIRST_PAGE)
}

/// Raises page numbers below 1 to 1. High page numbers are left alone.
pub fn normalize_page(page: i64) -> u64 {
    if page < FIRST_PAGE as i64 {
        FIRST_PAGE
    } else {
        page as u64
    }
}

/// Number of documents to skip to reach the start of `page`.
pub fn skip_for(page: i64, page_size: u64) -> u64 {
    (normalize_page(page) - FIRST_PAGE).saturating_mul(page_size)
}

/// A requested page: a 1-based page number and a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
}

impl PageRequest {
    /// Builds a request, raising `page` to 1 if it is below 1.
    pub fn new(page: i64, size: u64) -> Self {
        PageRequest {
            page: normalize_page(page),
            size,
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Replaces a zero page size with `default_size`.
    pub fn or_size(self, default_size: u64) -> Self {
        if self.size == 0 {
            PageRequest {
                page: self.page,
                size: default_size,
            }
        } else {
            self
        }
    }

    pub fn skip(&self) -> u64 {
        (self.page - FIRST_PAGE).saturating_mul(self.size)
    }

    pub fn total_pages(&self, matching_count: u64) -> u64 {
        total_pages(matching_count, self.size)
    }
}
