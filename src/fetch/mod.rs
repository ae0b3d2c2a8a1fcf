//! Uniform request execution for JSON and GraphQL endpoints
//!
//! The fetch client layers three concerns over a plain HTTP transport:
//! per-API-name rate limiting (calls are delayed, never dropped), a response
//! cache keyed by the request's logical identity, and request timeouts. An
//! optional passthrough proxy rewrites only the outbound URL; cache keys are
//! always derived from the original one, so hits are proxy-agnostic.

mod client;
mod error;
mod key;
mod rate_limit;
mod transport;

pub use client::{FetchClient, GraphqlRequest, JsonRequest, DEFAULT_TIMEOUT};
pub use error::FetchError;
pub use key::{cache_key, graphql_cache_key};
pub use rate_limit::{RateLimiter, DEFAULT_MIN_INTERVAL};
pub use transport::{HttpMethod, HttpTransport, Transport, TransportRequest, TransportResponse};
