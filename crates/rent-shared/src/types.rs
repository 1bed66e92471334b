//! Common types

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Page request. Out-of-range values are clamped, never rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, per_page: DEFAULT_PAGE_SIZE }
    }
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }.normalized()
    }

    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        let p = self.normalized();
        (p.page as u64 - 1) * p.per_page as u64
    }

    pub fn limit(&self) -> u64 {
        self.normalized().per_page as u64
    }
}

/// One page of results plus the totals needed to walk the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub last_page: u32,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, pagination: Pagination, total: u64) -> Self {
        let p = pagination.normalized();
        let last_page = if total == 0 {
            1
        } else {
            total.div_ceil(p.per_page as u64) as u32
        };
        Self {
            data,
            current_page: p.page,
            per_page: p.per_page,
            total,
            last_page,
        }
    }

    /// Slices an already filtered and ordered collection.
    pub fn from_vec(items: Vec<T>, pagination: Pagination) -> Self {
        let total = items.len() as u64;
        let data = items
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect();
        Self::new(data, pagination, total)
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            last_page: self.last_page,
        }
    }
}
