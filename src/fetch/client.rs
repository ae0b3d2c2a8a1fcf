//! The fetch client: caching, rate limiting, proxying, timeouts
//!
//! Requests are described by structured parameter types ([`JsonRequest`],
//! [`GraphqlRequest`]) rather than long positional argument lists. The cache
//! is consulted *before* the rate limiter, so a cache hit never consumes a
//! rate-limit slot and cached traffic cannot throttle live traffic.

use std::time::Duration;
use tracing::debug;

use super::error::FetchError;
use super::key::{cache_key, graphql_cache_key};
use super::rate_limit::RateLimiter;
use super::transport::{HttpMethod, HttpTransport, Transport, TransportRequest, TransportResponse};
use crate::cache::{CachePolicy, ResponseCache};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Passthrough proxy for endpoints without CORS-friendly mirrors; the
/// original URL is appended percent-encoded
const PROXY_PREFIX: &str = "https://corsproxy.io/?url=";

/// Parameters for a JSON GET fetch
#[derive(Debug, Clone)]
pub struct JsonRequest {
    /// Rate-limit bucket; all requests sharing a name share one slot sequence
    pub api_name: String,
    /// Logical resource URL; also the cache identity
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
    pub cache: CachePolicy,
    /// Route the outbound request through the passthrough proxy. The cache
    /// key still uses the original URL.
    pub use_proxy: bool,
}

impl JsonRequest {
    /// Creates a request with the default timeout, no caching bypass, and no
    /// proxy
    pub fn new(api_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            api_name: api_name.into(),
            url: url.into(),
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            cache: CachePolicy::Bypass,
            use_proxy: false,
        }
    }

    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_proxy(mut self) -> Self {
        self.use_proxy = true;
        self
    }
}

/// Parameters for a GraphQL POST
#[derive(Debug, Clone)]
pub struct GraphqlRequest {
    pub api_name: String,
    pub url: String,
    pub query: String,
    pub variables: serde_json::Value,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
    pub cache: CachePolicy,
}

impl GraphqlRequest {
    pub fn new(
        api_name: impl Into<String>,
        url: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            api_name: api_name.into(),
            url: url.into(),
            query: query.into(),
            variables: serde_json::Value::Object(Default::default()),
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            cache: CachePolicy::Bypass,
        }
    }

    pub fn with_variables(mut self, variables: serde_json::Value) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Wraps a URL through the passthrough proxy
fn proxied(url: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(url.as_bytes()).collect();
    format!("{}{}", PROXY_PREFIX, encoded)
}

/// Cached, rate-limited request execution over a pluggable transport
///
/// One client instance is constructed at application start and shared by all
/// widget data sources; the cache and rate limiter live inside it, so tests
/// get fully isolated state from a fresh instance.
#[derive(Debug)]
pub struct FetchClient<T: Transport = HttpTransport> {
    transport: T,
    cache: ResponseCache,
    limiter: RateLimiter,
}

impl FetchClient<HttpTransport> {
    /// Creates a client over the production HTTP transport
    pub fn new(cache: ResponseCache) -> Self {
        Self::with_transport(HttpTransport::new(), cache)
    }
}

impl<T: Transport> FetchClient<T> {
    /// Creates a client over a custom transport (e.g. a test double)
    pub fn with_transport(transport: T, cache: ResponseCache) -> Self {
        Self {
            transport,
            cache,
            limiter: RateLimiter::new(),
        }
    }

    /// Replaces the rate limiter, e.g. to change the minimum interval
    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Fetches a JSON resource
    ///
    /// Read-through on cache hit (returning before the rate limiter or the
    /// network are touched), write-through after a successful live fetch.
    /// With [`CachePolicy::Bypass`] the cache is neither read nor written.
    pub async fn fetch_json(&self, request: &JsonRequest) -> Result<serde_json::Value, FetchError> {
        let key = cache_key(&request.url);
        if let Some(cached) = self.cache.get(&key, request.cache) {
            return Ok(cached);
        }

        self.limiter.acquire(&request.api_name).await;

        let outbound_url = if request.use_proxy {
            proxied(&request.url)
        } else {
            request.url.clone()
        };
        debug!(api = %request.api_name, url = %outbound_url, "live fetch");

        let response = self
            .execute_with_timeout(
                TransportRequest {
                    method: HttpMethod::Get,
                    url: outbound_url,
                    headers: request.headers.clone(),
                    body: None,
                },
                request.timeout,
            )
            .await?;
        let value = parse_body(response)?;

        if request.cache != CachePolicy::Bypass {
            self.cache.set(&key, &value);
        }
        Ok(value)
    }

    /// Executes a GraphQL query
    ///
    /// Same caching, timeout, and rate-limit contract as [`Self::fetch_json`];
    /// POSTs `{query, variables}` and fails with [`FetchError::GraphQL`] when
    /// the body carries a non-empty `errors` array, even on HTTP 200.
    pub async fn fetch_graphql(
        &self,
        request: &GraphqlRequest,
    ) -> Result<serde_json::Value, FetchError> {
        let key = graphql_cache_key(&request.url, &request.query, &request.variables);
        if let Some(cached) = self.cache.get(&key, request.cache) {
            return Ok(cached);
        }

        self.limiter.acquire(&request.api_name).await;
        debug!(api = %request.api_name, url = %request.url, "live GraphQL fetch");

        let body = serde_json::json!({
            "query": request.query,
            "variables": request.variables,
        });
        let mut headers = request.headers.clone();
        headers.push(("Content-Type".to_string(), "application/json".to_string()));

        let response = self
            .execute_with_timeout(
                TransportRequest {
                    method: HttpMethod::Post,
                    url: request.url.clone(),
                    headers,
                    body: Some(body),
                },
                request.timeout,
            )
            .await?;
        let value = parse_body(response)?;

        if let Some(message) = graphql_error_message(&value) {
            return Err(FetchError::GraphQL(message));
        }

        if request.cache != CachePolicy::Bypass {
            self.cache.set(&key, &value);
        }
        Ok(value)
    }

    async fn execute_with_timeout(
        &self,
        request: TransportRequest,
        timeout: Duration,
    ) -> Result<TransportResponse, FetchError> {
        match tokio::time::timeout(timeout, self.transport.execute(request)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        }
    }
}

/// Maps the HTTP status and parses the body as JSON
fn parse_body(response: TransportResponse) -> Result<serde_json::Value, FetchError> {
    if let Some(error) = FetchError::from_status(response.status) {
        return Err(error);
    }
    Ok(serde_json::from_str(&response.body)?)
}

/// Extracts a joined message from a GraphQL `errors` array, if present
fn graphql_error_message(body: &serde_json::Value) -> Option<String> {
    let errors = body.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    let joined = errors
        .iter()
        .map(|e| {
            e.get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown GraphQL error")
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("; ");
    Some(joined)
}
