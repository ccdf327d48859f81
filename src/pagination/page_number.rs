//! Page number pagination with a page ceiling
//!
//! Freshdesk listings are paged with `page` and `per_page`. The API refuses
//! page numbers past a ceiling, so deep listings are walked in segments: when
//! the ceiling is reached the caller restarts at page 1 with the incremental
//! filter moved past the last record seen.

use super::types::{PageRequest, DEFAULT_CURSOR_FIELD};
use crate::state::Cursor;
use crate::types::{JsonValue, QueryParams};
use tracing::warn;

/// Query parameter for the page number
pub const PAGE_PARAM: &str = "page";

/// Query parameter for the page size
pub const PER_PAGE_PARAM: &str = "per_page";

/// Next action for the driver of a paginator
#[derive(Debug, Clone, PartialEq)]
pub enum PageStep {
    /// Fetch a page with these query parameters
    Fetch(QueryParams),
    /// Ceiling reached; restart from this cursor
    Reset(Cursor),
    /// Nothing left to fetch
    Done,
}

/// Pagination context for one listing
///
/// Pure state machine: it decides which page to fetch next and learns from
/// each page it is shown, but performs no I/O.
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    request: PageRequest,
    page: u32,
    per_page: u32,
    page_limit: u32,
    last_cursor: Option<Cursor>,
    done: bool,
}

impl PageNumberPaginator {
    /// Create a paginator starting at page 1
    pub fn new(request: PageRequest, per_page: u32, page_limit: u32) -> Self {
        Self {
            request,
            page: 1,
            per_page: per_page.max(1),
            page_limit: page_limit.max(1),
            last_cursor: None,
            done: false,
        }
    }

    /// The request being paginated
    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    /// Page number that will be fetched next
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Records requested per page
    #[cfg(test)]
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Last record timestamp + 1 second, once a page carried one
    #[cfg(test)]
    pub fn last_cursor(&self) -> Option<Cursor> {
        self.last_cursor
    }

    /// Decide what to do next
    pub fn next_step(&mut self) -> PageStep {
        if self.done {
            return PageStep::Done;
        }

        if self.page > self.page_limit {
            self.done = true;
            return match (&self.request.filter_param, self.last_cursor) {
                (Some(_), Some(cursor)) => PageStep::Reset(cursor),
                _ => {
                    warn!(
                        endpoint = %self.request.endpoint,
                        page_limit = self.page_limit,
                        "Page ceiling reached on a listing without a usable filter; stopping"
                    );
                    PageStep::Done
                }
            };
        }

        let mut params = self.request.params.clone();
        params.insert(PER_PAGE_PARAM.to_string(), self.per_page.to_string());
        params.insert(PAGE_PARAM.to_string(), self.page.to_string());
        PageStep::Fetch(params)
    }

    /// Record a fetched page
    ///
    /// A page shorter than `per_page` is the last one; a full page means one
    /// more fetch is needed to confirm the end.
    pub fn process_page(&mut self, records: &[JsonValue]) {
        if let Some(cursor) = records
            .last()
            .and_then(|r| Cursor::from_record(r, self.cursor_field()).ok().flatten())
        {
            self.last_cursor = Some(cursor.next_second());
        }

        if records.len() < self.per_page as usize {
            self.done = true;
        } else {
            self.page += 1;
        }
    }

    fn cursor_field(&self) -> &str {
        if self.request.cursor_field.is_empty() {
            DEFAULT_CURSOR_FIELD
        } else {
            &self.request.cursor_field
        }
    }
}
