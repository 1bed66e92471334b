//! HTTP handlers

pub mod auth;
pub mod flats;
pub mod floors;
pub mod health;
pub mod houses;
pub mod tenant_users;
pub mod tenants;

use rent_shared::constants::DEFAULT_PAGE_SIZE;
use rent_shared::Pagination;

use crate::error::ApiError;

/// `?page=&per_page=` with defaults; clamped by [`Pagination::new`].
pub(crate) fn pagination(page: Option<u32>, per_page: Option<u32>) -> Pagination {
    Pagination::new(page.unwrap_or(1), per_page.unwrap_or(DEFAULT_PAGE_SIZE))
}

pub(crate) async fn fallback() -> ApiError {
    ApiError::RouteNotFound
}
