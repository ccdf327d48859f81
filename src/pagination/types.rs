//! Pagination types
//!
//! Defines the request description and the events a pager produces.

use crate::state::Cursor;
use crate::types::{JsonValue, QueryParams};

/// Default field used to carry the cursor across a pagination reset
pub const DEFAULT_CURSOR_FIELD: &str = "updated_at";

/// Outcome of advancing a pager by one step
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// One page of raw records, in API order
    Page(Vec<JsonValue>),
    /// The page ceiling was reached; restart at page 1 filtered from `cursor`
    Reset {
        /// Last seen record timestamp + 1 second
        cursor: Cursor,
    },
    /// No more pages
    Exhausted,
}

impl PageEvent {
    /// Check if this is a page
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page(_))
    }

    /// Check if this is a reset signal
    pub fn is_reset(&self) -> bool {
        matches!(self, Self::Reset { .. })
    }

    /// Check if pagination is over
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

/// Endpoint plus query parameters for a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Endpoint path relative to the API base (e.g. `tickets`)
    pub endpoint: String,
    /// Query parameters sent with every page
    pub params: QueryParams,
    /// Name of the incremental filter parameter, if the listing has one
    pub filter_param: Option<String>,
    /// Record field whose last value seeds a reset cursor
    pub cursor_field: String,
}

impl PageRequest {
    /// Create a request for an endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: QueryParams::new(),
            filter_param: None,
            cursor_field: DEFAULT_CURSOR_FIELD.to_string(),
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Filter the listing from a cursor using the given parameter
    #[must_use]
    pub fn filter(mut self, param: impl Into<String>, cursor: Cursor) -> Self {
        let param = param.into();
        self.params.insert(param.clone(), cursor.to_string());
        self.filter_param = Some(param);
        self
    }

    /// Set the field used to compute reset cursors
    #[must_use]
    pub fn cursor_field(mut self, field: impl Into<String>) -> Self {
        self.cursor_field = field.into();
        self
    }

    /// Same request with the filter moved to a new cursor
    ///
    /// Requests without a filter parameter are returned unchanged.
    #[must_use]
    pub fn with_cursor(&self, cursor: Cursor) -> Self {
        let mut next = self.clone();
        if let Some(param) = &self.filter_param {
            next.params.insert(param.clone(), cursor.to_string());
        }
        next
    }

    /// Current value of the filter parameter
    pub fn filter_value(&self) -> Option<&str> {
        self.filter_param
            .as_ref()
            .and_then(|p| self.params.get(p))
            .map(String::as_str)
    }
}
