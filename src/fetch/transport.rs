//! HTTP transport seam
//!
//! The fetch client talks to the network through the [`Transport`] trait so
//! tests can substitute a scripted transport and count calls. The production
//! implementation is a thin wrapper over a shared `reqwest` client.

use std::future::Future;

use super::error::FetchError;

/// HTTP methods the dashboard APIs need
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A fully resolved outbound request
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: HttpMethod,
    /// Outbound URL; already proxy-wrapped when a proxy is in use
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// JSON body for POST requests
    pub body: Option<serde_json::Value>,
}

/// Status and raw body of a completed exchange
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Executes one HTTP exchange
///
/// Implementations report connection-level problems as
/// [`FetchError::Network`]; status handling, timeouts, and body parsing stay
/// with the caller.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, FetchError>> + Send;
}

/// Production transport over `reqwest`
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with a fresh connection pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport over an existing `reqwest` client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, FetchError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(TransportResponse { status, body })
    }
}
