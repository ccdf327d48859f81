//! Pagination module
//!
//! Numbered-page pagination with a page ceiling and filter-based reset.
//!
//! # Overview
//!
//! `PageNumberPaginator` tracks which page to request next and when a
//! listing is finished. When the page ceiling is hit it hands back a reset
//! cursor instead of another page, and the caller restarts the listing from
//! page 1 with the filter moved forward (see `PageRequest::with_cursor`).

mod page_number;
mod types;

pub use page_number::{PageNumberPaginator, PageStep, PAGE_PARAM, PER_PAGE_PARAM};
pub use types::{PageEvent, PageRequest, DEFAULT_CURSOR_FIELD};
