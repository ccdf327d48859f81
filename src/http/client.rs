//! HTTP client with retry and rate limiting
//!
//! Provides the Freshdesk API client that handles:
//! - HTTP Basic authentication with the API key
//! - A shared request budget (rate limiter)
//! - `Retry-After` waits and exponential backoff
//! - Numbered-page pagination with ceiling resets

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::retry::RetryPolicy;
use crate::config::{ConnectorConfig, Credentials};
use crate::error::{Error, Result};
use crate::pagination::{
    PageEvent, PageNumberPaginator, PageRequest, PageStep, PAGE_PARAM, PER_PAGE_PARAM,
};
use crate::types::{JsonValue, QueryParams};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Base URL pattern of the Freshdesk v2 API
pub const API_BASE_TEMPLATE: &str = "https://{domain}.freshdesk.com/api/v2/";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL override (defaults to the account's API base)
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Records requested per page
    pub per_page: u32,
    /// Highest page number requested before a reset
    pub page_limit: u32,
    /// Retry behaviour
    pub retry: RetryPolicy,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(300),
            per_page: 100,
            page_limit: 300,
            retry: RetryPolicy::default(),
            rate_limit: Some(RateLimiterConfig::default()),
            user_agent: format!("freshdesk-connector/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    /// Derive client settings from the connector config
    pub fn from_connector_config(config: &ConnectorConfig) -> Self {
        let mut builder = Self::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .per_page(config.page_size)
            .page_limit(config.page_limit)
            .rate_limit(RateLimiterConfig::new(
                config.rate_limit.limit,
                Duration::from_secs_f64(config.rate_limit.every_seconds.max(0.0)),
            ));
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the page size
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.config.per_page = per_page;
        self
    }

    /// Set the page ceiling
    pub fn page_limit(mut self, page_limit: u32) -> Self {
        self.config.page_limit = page_limit;
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Result of one physical request
enum Attempt {
    Records(Vec<JsonValue>),
    RateLimited(Duration),
}

/// Freshdesk API client
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    credentials: Credentials,
    base_url: Url,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a client for the given credentials
    pub fn new(credentials: Credentials, config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let base = match &config.base_url {
            Some(base) => base.clone(),
            None => API_BASE_TEMPLATE.replace("{domain}", credentials.domain()),
        };
        let base_url = Url::parse(&format!("{}/", base.trim_end_matches('/')))?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            credentials,
            base_url,
            rate_limiter,
        })
    }

    /// Create a client from the connector config
    ///
    /// Fails with a configuration error when the domain or API key is absent.
    pub fn from_connector_config(config: &ConnectorConfig) -> Result<Self> {
        Self::new(
            config.credentials()?,
            HttpClientConfig::from_connector_config(config),
        )
    }

    /// The client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// The resolved API base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Start paginating a listing
    pub fn paginate(&self, request: PageRequest) -> Pager<'_> {
        Pager {
            client: self,
            paginator: PageNumberPaginator::new(
                request,
                self.config.per_page,
                self.config.page_limit,
            ),
        }
    }

    /// Fetch every record of a listing, following resets
    pub async fn get_all(&self, request: PageRequest) -> Result<Vec<JsonValue>> {
        let mut records = Vec::new();
        let mut pager = self.paginate(request);

        loop {
            match pager.next_page().await? {
                PageEvent::Page(page) => records.extend(page),
                PageEvent::Reset { cursor } => {
                    let next = pager.request().with_cursor(cursor);
                    pager = self.paginate(next);
                }
                PageEvent::Exhausted => break,
            }
        }

        Ok(records)
    }

    /// Verify the credentials with one small authenticated request
    pub async fn check(&self) -> Result<()> {
        let mut params = QueryParams::new();
        params.insert(PER_PAGE_PARAM.to_string(), "1".to_string());
        params.insert(PAGE_PARAM.to_string(), "1".to_string());
        self.get_page("tickets", &params).await?;
        info!(base_url = %self.base_url, "Credentials verified");
        Ok(())
    }

    /// Fetch one page of records
    ///
    /// Every physical request waits on the rate limiter first. A response
    /// with `Retry-After` (or a 429) is waited out and re-issued without
    /// consuming an attempt; other failures follow the retry policy.
    pub async fn get_page(&self, endpoint: &str, params: &QueryParams) -> Result<Vec<JsonValue>> {
        let url = self.build_url(endpoint)?;
        let policy = &self.config.retry;
        let mut attempt: u32 = 1;

        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.acquire().await;
            }

            match self.send_once(&url, params).await {
                Ok(Attempt::Records(records)) => {
                    debug!(%url, count = records.len(), "Request succeeded");
                    return Ok(records);
                }
                Ok(Attempt::RateLimited(wait)) => {
                    info!(
                        %url,
                        wait_seconds = wait.as_secs(),
                        "Rate limit reached, sleeping before retrying"
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(err) if policy.should_retry(&err, attempt) => {
                    let delay = policy.backoff(attempt);
                    warn!(
                        %url,
                        error = %err,
                        "Request failed, attempt {}/{}, retrying in {:?}",
                        attempt,
                        policy.max_attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) if (policy.retryable)(&err) && !(policy.give_up)(&err) => {
                    return Err(Error::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(err),
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once(&self, url: &Url, params: &QueryParams) -> Result<Attempt> {
        debug!(%url, ?params, "GET");

        let response = self
            .client
            .get(url.clone())
            .query(params)
            .basic_auth(self.credentials.api_key(), Some(""))
            .send()
            .await?;

        let status = response.status();
        if let Some(wait) = self.retry_after(&response) {
            return Ok(Attempt::RateLimited(wait));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let body = response.text().await?;
        match serde_json::from_str::<JsonValue>(&body) {
            Ok(JsonValue::Array(records)) => Ok(Attempt::Records(records)),
            Ok(other) => Err(Error::decode(format!(
                "expected a JSON array from {url}, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(Error::decode(format!("invalid JSON from {url}: {e}"))),
        }
    }

    /// Wait requested by the server, if any
    fn retry_after(&self, response: &Response) -> Option<Duration> {
        let header = response.headers().get(reqwest::header::RETRY_AFTER);
        if header.is_none() && response.status() != StatusCode::TOO_MANY_REQUESTS {
            return None;
        }

        let wait = header
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map_or(self.config.retry.default_retry_after, Duration::from_secs);
        Some(wait)
    }

    /// Build full URL from an endpoint path
    fn build_url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Lazy, forward-only producer of pages for one listing
pub struct Pager<'a> {
    client: &'a HttpClient,
    paginator: PageNumberPaginator,
}

impl Pager<'_> {
    /// Fetch the next page, or report a reset or the end of the listing
    pub async fn next_page(&mut self) -> Result<PageEvent> {
        match self.paginator.next_step() {
            PageStep::Fetch(params) => {
                let endpoint = self.paginator.request().endpoint.clone();
                let records = self.client.get_page(&endpoint, &params).await?;
                debug!(
                    endpoint = %endpoint,
                    page = self.paginator.page(),
                    count = records.len(),
                    "Fetched page"
                );
                self.paginator.process_page(&records);
                Ok(PageEvent::Page(records))
            }
            PageStep::Reset(cursor) => {
                info!(
                    endpoint = %self.paginator.request().endpoint,
                    %cursor,
                    "Page ceiling reached, resetting pagination"
                );
                Ok(PageEvent::Reset { cursor })
            }
            PageStep::Done => Ok(PageEvent::Exhausted),
        }
    }

    /// The request being paginated
    pub fn request(&self) -> &PageRequest {
        self.paginator.request()
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
