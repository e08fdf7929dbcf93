//! resolver::http
//!
//! Remote resolver over HTTP.
//!
//! # Protocol
//!
//! Each lookup is a `POST` to the configured endpoint with a form-encoded
//! body carrying the address and the expected type code:
//!
//! ```text
//! POST /api/thing
//! Content-Type: application/x-www-form-urlencoded
//!
//! address=leaf1&type=1
//! ```
//!
//! A 2xx response body must be the JSON record. Status mapping:
//! - 404 → `ResolutionError::NotFound`
//! - other non-2xx → `ResolutionError::Status`
//! - elapsed per-call timeout → `ResolutionError::Timeout`
//! - connection failures → `ResolutionError::Network`
//!
//! No retries are attempted; a failed reference is simply dropped by the
//! tree builder.
//!
//! # Example
//!
//! ```ignore
//! use seedtree::resolver::{HttpResolver, Resolver};
//! use std::time::Duration;
//!
//! let resolver = HttpResolver::new("http://localhost:3000/api/thing", Duration::from_secs(10))?;
//! let thing = resolver.resolve(&address, ThingType::Text).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode};

use super::traits::{decode_fetched, ResolutionError, Resolver};
use crate::core::thing::Thing;
use crate::core::types::{Address, ThingType};

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User-Agent header value for requests.
const USER_AGENT_VALUE: &str = "seedtree";

/// Longest error body echoed into a `Status` error.
const MAX_ERROR_BODY: usize = 200;

/// HTTP resolver.
pub struct HttpResolver {
    /// HTTP client (carries the timeout)
    client: Client,
    /// Lookup endpoint
    endpoint: String,
    /// Per-call timeout, kept for error reporting
    timeout: Duration,
}

impl std::fmt::Debug for HttpResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResolver")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpResolver {
    /// Create a resolver for the given endpoint with a per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::Network` if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ResolutionError> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(Self::headers())
            .build()
            .map_err(|e| ResolutionError::Network(format!("failed to build client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    /// Create a resolver with the default 10 second timeout.
    pub fn with_default_timeout(endpoint: impl Into<String>) -> Result<Self, ResolutionError> {
        Self::new(endpoint, DEFAULT_TIMEOUT)
    }

    /// Get the endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get the per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers
    }

    /// Map a transport error, separating timeouts from other failures.
    fn transport_error(&self, address: &Address, err: reqwest::Error) -> ResolutionError {
        if err.is_timeout() {
            ResolutionError::Timeout {
                address: address.clone(),
                after: self.timeout,
            }
        } else {
            ResolutionError::Network(err.to_string())
        }
    }

    /// Handle the response, mapping error statuses.
    async fn handle_response(
        &self,
        address: &Address,
        expected: ThingType,
        response: Response,
    ) -> Result<Thing, ResolutionError> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ResolutionError::NotFound(address.clone()));
        }

        if !status.is_success() {
            let mut message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            if message.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| message.is_char_boundary(*i))
                    .unwrap_or(0);
                message.truncate(cut);
            }
            return Err(ResolutionError::Status {
                address: address.clone(),
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(address, e))?;

        decode_fetched(address, expected, &body)
    }
}

#[async_trait]
impl Resolver for HttpResolver {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn resolve(
        &self,
        address: &Address,
        expected: ThingType,
    ) -> Result<Thing, ResolutionError> {
        tracing::debug!(%address, endpoint = %self.endpoint, "requesting record");

        let type_code = expected.code().to_string();
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("address", address.as_str()), ("type", type_code.as_str())])
            .send()
            .await
            .map_err(|e| self.transport_error(address, e))?;

        self.handle_response(address, expected, response).await
    }
}
