//! Common types

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PAGE_SIZE;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, page_size: DEFAULT_PAGE_SIZE }
    }
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Number of rows to skip before this page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }
}

/// One page of results plus the total number of matching rows.
///
/// `next` / `previous` are page numbers, `None` when there is no such page.
/// A page past the end carries the real `count` and an empty `results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<u32>,
    pub previous: Option<u32>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(count: u64, request: PageRequest, results: Vec<T>) -> Self {
        let seen = u64::from(request.page) * u64::from(request.page_size);
        let next = (seen < count).then(|| request.page + 1);
        let previous = (request.page > 1).then(|| request.page - 1);

        Self { count, next, previous, results }
    }

    /// Empty page for a page number below 1. `next` points at the first page.
    pub fn before_first(count: u64) -> Self {
        Self {
            count,
            next: (count > 0).then_some(1),
            previous: None,
            results: Vec::new(),
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
