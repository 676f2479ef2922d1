// src/pagination.rs
//! Page number/size normalization and offset arithmetic for paged listings.
//!
//! Page links travel through URLs and get tampered with or go stale, so every
//! malformed input degrades to a usable page instead of failing.
use serde::Serialize;

use crate::error::{ForumError, Result};

pub const FIRST_PAGE_NUMBER: u64 = 1;

/// Page size used when the caller asks for a non-positive one.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page_number: u64,
    page_size: u64,
}

impl PageRequest {
    /// Builds a request from the raw page number text of a link and a page size.
    pub fn new(requested_page_number: &str, requested_page_size: i64) -> Self {
        Self::with_default_size(requested_page_number, requested_page_size, DEFAULT_PAGE_SIZE)
    }

    /// Same as [`PageRequest::new`], falling back to `default_page_size`
    /// for non-positive sizes.
    pub fn with_default_size(
        requested_page_number: &str,
        requested_page_size: i64,
        default_page_size: u64,
    ) -> Self {
        Self {
            page_number: parse_page_number(requested_page_number),
            page_size: prepare_page_size(requested_page_size, default_page_size),
        }
    }

    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Index of the first item on the current page.
    pub fn offset(&self) -> u64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }

    /// Index of the first item on `page_number`.
    pub fn offset_of(&self, page_number: u64) -> Result<u64> {
        if page_number < FIRST_PAGE_NUMBER {
            return Err(ForumError::invalid_argument(format!(
                "page number was less than one: {page_number}"
            )));
        }
        Ok((page_number - 1).saturating_mul(self.page_size))
    }

    /// Page that holds the item at zero-based `index`.
    pub fn page_of_index(&self, index: u64) -> u64 {
        index / self.page_size + 1
    }

    /// Last page that holds anything; an empty collection still has page 1.
    pub fn last_page_number(&self, total_count: u64) -> u64 {
        match total_count {
            0 => FIRST_PAGE_NUMBER,
            total => self.page_of_index(total - 1),
        }
    }

    pub fn total_pages(&self, total_count: u64) -> u64 {
        total_count.div_ceil(self.page_size)
    }

    /// Moves the page number back onto the last page when it points past the end.
    pub fn adjust_page_number(&mut self, total_count: u64) {
        let last_page = self.last_page_number(total_count);
        if self.page_number > last_page {
            self.page_number = last_page;
        }
    }

    /// Cuts the current page out of an in-memory collection.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX).min(items.len());
        let end = start.saturating_add(self.page_size as usize).min(items.len());
        &items[start..end]
    }
}

fn parse_page_number(text: &str) -> u64 {
    let parsed = if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        // digits only, but may still overflow
        text.parse::<u64>().unwrap_or(FIRST_PAGE_NUMBER)
    } else {
        FIRST_PAGE_NUMBER
    };
    parsed.max(FIRST_PAGE_NUMBER)
}

fn prepare_page_size(requested: i64, default_page_size: u64) -> u64 {
    if requested <= 0 {
        default_page_size.max(1)
    } else {
        requested as u64
    }
}

/// One page of a listing together with the numbers needed to render a pager.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page_number: request.page_number(),
            page_size: request.page_size(),
            total_items,
            total_pages: request.total_pages(total_items),
        }
    }

    /// Adjusts `request` against the collection and copies out its page.
    pub fn from_slice(all: &[T], request: &mut PageRequest) -> Self
    where
        T: Clone,
    {
        let total = all.len() as u64;
        request.adjust_page_number(total);
        Self::new(request.slice(all).to_vec(), request, total)
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > FIRST_PAGE_NUMBER
    }
}
