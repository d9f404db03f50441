//! `?page=&per_page=` query parameters.

use serde::Deserialize;

use wasil_core::types::PageRequest;

/// Page size used when the client does not ask for one.
pub const DEFAULT_PER_PAGE: u64 = 25;

/// Paging for list endpoints. Missing values fall back to the first page
/// of [`DEFAULT_PER_PAGE`] entries; out-of-range values are clamped by
/// [`PageRequest::new`].
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PaginationParams {
    pub fn into_page_request(self) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(1), self.per_page.unwrap_or(DEFAULT_PER_PAGE))
    }
}
