//! HTTP client module
//!
//! Provides the Freshdesk API client with retry, rate limiting, and
//! page-number pagination.
//!
//! # Features
//!
//! - **Automatic Retries**: Exponential backoff for server and transport errors
//! - **Retry-After**: Rate-limit responses are waited out without using up attempts
//! - **Rate Limiting**: Sliding-window request budget shared across the client
//! - **Pagination**: Lazy pager with page-ceiling resets

mod client;
mod rate_limit;
mod retry;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, Pager, API_BASE_TEMPLATE};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use retry::RetryPolicy;
