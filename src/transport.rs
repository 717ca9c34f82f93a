//! HTTP transport abstraction.
//!
//! The request builder never talks to `reqwest` directly. It hands the final
//! URL, headers and body to an [`HttpTransport`] and gets back a status, the
//! response headers and an unread body stream. The default implementation is
//! [`ReqwestTransport`]; tests and callers with special needs can inject their
//! own.

use crate::config::HttpConfig;
use crate::error::GraphQlError;
use reqwest::header::HeaderMap;
use std::fmt;
use std::io::Read;

/// Transport-level request data for a JSON POST.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Transport-level response data.
///
/// `body` is still unread. Dropping it releases the underlying connection.
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Box<dyn Read + Send>,
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Blocking HTTP transport for GraphQL POST requests.
///
/// Any HTTP status is a successful transport result; only failures to build
/// or send the request are errors.
pub trait HttpTransport: Send + Sync {
    fn post(&self, request: TransportRequest) -> Result<TransportResponse, GraphQlError>;
}

/// [`HttpTransport`] backed by `reqwest::blocking::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Transport with reqwest's default client settings.
    pub fn new() -> Result<Self, GraphQlError> {
        Self::from_config(&HttpConfig::default())
    }

    /// Build a client from `config`. Unset fields keep reqwest's defaults.
    pub fn from_config(config: &HttpConfig) -> Result<Self, GraphQlError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str()).map_err(|e| {
                GraphQlError::TransportError(format!("Invalid proxy '{proxy}': {e}"))
            })?;
            builder = builder.proxy(proxy);
        }
        let client = builder.build().map_err(|e| {
            GraphQlError::TransportError(format!("Failed to build HTTP client: {e}"))
        })?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn post(&self, request: TransportRequest) -> Result<TransportResponse, GraphQlError> {
        let response = self
            .client
            .post(request.url.as_str())
            .headers(request.headers)
            .body(request.body)
            .send()
            .map_err(|e| GraphQlError::TransportError(format!("Failed to send request: {e}")))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        Ok(TransportResponse {
            status,
            headers,
            body: Box::new(response),
        })
    }
}
