//! GraphQL request builder.
//!
//! [`GraphQlRequest`] accumulates an endpoint, headers, variables and a query
//! document, then sends them as one JSON POST with [`GraphQlRequest::execute`].
//!
//! Configuration methods take `self` by value and return the updated builder.
//! Each builder owns its header and variable maps; cloning copies them, so a
//! clone and its origin can be configured independently without observing
//! each other's changes. Only the transport handle is shared between clones.

use crate::config::HttpConfig;
use crate::error::GraphQlError;
use crate::headers::{headermap_to_hashmap, request_headers};
use crate::response::GraphQlResponse;
use crate::transport::{HttpTransport, ReqwestTransport, TransportRequest};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

/// A variable as stored in the builder. Values that failed to encode keep the
/// error so it can be reported when the request is sent.
#[derive(Debug, Clone, PartialEq)]
enum Variable {
    Encoded(Value),
    Invalid(String),
}

/// HTTP header names compare case-insensitively; store them lowercased.
fn header_key(mut key: String) -> String {
    key.make_ascii_lowercase();
    key
}

/// JSON body of a GraphQL POST.
#[derive(Serialize)]
struct Payload<'a> {
    query: &'a str,
    variables: EncodedVariables<'a>,
}

struct EncodedVariables<'a>(&'a BTreeMap<String, Variable>);

impl Serialize for EncodedVariables<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().filter_map(|(name, var)| match var {
            Variable::Encoded(value) => Some((name, value)),
            Variable::Invalid(_) => None,
        }))
    }
}

/// Builder for a single GraphQL query or mutation over HTTP.
#[derive(Clone)]
pub struct GraphQlRequest {
    endpoint: String,
    headers: BTreeMap<String, String>,
    variables: BTreeMap<String, Variable>,
    query: String,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl fmt::Debug for GraphQlRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphQlRequest")
            .field("endpoint", &self.endpoint)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("variables", &self.variables.keys().collect::<Vec<_>>())
            .field("query", &self.query)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

impl GraphQlRequest {
    /// Create a builder for `endpoint` with no headers, variables or query.
    ///
    /// The endpoint is not validated here; a malformed URL surfaces as a
    /// transport error from [`execute`](Self::execute).
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            headers: BTreeMap::new(),
            variables: BTreeMap::new(),
            query: String::new(),
            transport: None,
        }
    }

    /// Send through `transport` instead of a default reqwest client.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Send through a reqwest client built from `config`.
    pub fn with_http_config(self, config: &HttpConfig) -> Result<Self, GraphQlError> {
        let transport = ReqwestTransport::from_config(config)?;
        Ok(self.with_transport(Arc::new(transport)))
    }

    // ========================================================================
    // Headers
    // ========================================================================

    /// Set one header. Names are case-insensitive: a later call with the
    /// same name in any letter case replaces the value.
    pub fn add_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(header_key(key.into()), value.into());
        self
    }

    /// Merge headers in, replacing existing values on key collision.
    pub fn add_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (header_key(k.into()), v.into())));
        self
    }

    /// Remove the named headers, matching names in any letter case. Keys that
    /// are not set are ignored.
    pub fn remove_headers<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for key in keys {
            self.headers.remove(&key.as_ref().to_ascii_lowercase());
        }
        self
    }

    /// Remove every header.
    pub fn clear_headers(mut self) -> Self {
        self.headers.clear();
        self
    }

    // ========================================================================
    // Variables
    // ========================================================================

    /// Set one variable. A later call with the same key replaces the value.
    ///
    /// The value is converted to JSON immediately. If that fails, the failure
    /// is reported as an encoding error when the request is sent, unless the
    /// variable is removed or replaced first.
    pub fn add_variable<T: Serialize>(mut self, key: impl Into<String>, value: T) -> Self {
        let variable = match serde_json::to_value(value) {
            Ok(value) => Variable::Encoded(value),
            Err(e) => Variable::Invalid(e.to_string()),
        };
        self.variables.insert(key.into(), variable);
        self
    }

    /// Merge variables in, replacing existing values on key collision.
    pub fn add_variables<I, K, T>(self, variables: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Serialize,
    {
        variables
            .into_iter()
            .fold(self, |request, (key, value)| request.add_variable(key, value))
    }

    /// Remove the named variables. Keys that are not set are ignored.
    pub fn remove_variables<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for key in keys {
            self.variables.remove(key.as_ref());
        }
        self
    }

    /// Remove every variable.
    pub fn clear_variables(mut self) -> Self {
        self.variables.clear();
        self
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Set the GraphQL document (query or mutation). Nothing is sent until
    /// [`execute`](Self::execute) is called.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Configured headers, keyed by lowercased name.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Encoded value of a variable. `None` if unset or if it failed to encode.
    pub fn variable(&self, key: &str) -> Option<&Value> {
        match self.variables.get(key) {
            Some(Variable::Encoded(value)) => Some(value),
            _ => None,
        }
    }

    /// Names of all configured variables, including ones that failed to encode.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// The GraphQL document; empty when not yet set.
    pub fn query_text(&self) -> &str {
        &self.query
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// The JSON body [`execute`](Self::execute) would send:
    /// `{"query": ..., "variables": {...}}`.
    pub fn payload(&self) -> Result<Vec<u8>, GraphQlError> {
        if let Some((name, reason)) = self.variables.iter().find_map(|(name, var)| match var {
            Variable::Invalid(reason) => Some((name, reason)),
            Variable::Encoded(_) => None,
        }) {
            return Err(GraphQlError::EncodingError(format!(
                "Variable '{name}' could not be encoded: {reason}"
            )));
        }

        let payload = Payload {
            query: &self.query,
            variables: EncodedVariables(&self.variables),
        };
        serde_json::to_vec(&payload).map_err(|e| {
            GraphQlError::EncodingError(format!("Failed to encode request payload: {e}"))
        })
    }

    /// Send the configured request as one blocking HTTP POST and read the
    /// whole response body.
    ///
    /// Fails with a configuration error, before any I/O, when no query has
    /// been set. Any HTTP status is accepted; GraphQL `errors` in the body are
    /// left for the caller to inspect. Calling this again sends a fresh,
    /// independent request with the same configuration.
    pub fn execute(&self) -> Result<GraphQlResponse, GraphQlError> {
        if self.query.is_empty() {
            return Err(GraphQlError::ConfigurationError(
                "no query/mutation provided".to_string(),
            ));
        }

        let body = self.payload()?;
        let headers = request_headers(&self.headers)?;

        tracing::debug!(
            target: "gql_request::http",
            endpoint = %self.endpoint,
            headers = self.headers.len(),
            variables = self.variables.len(),
            "sending request"
        );
        tracing::trace!(target: "gql_request::http", bytes = body.len(), "request payload");

        let request = TransportRequest {
            url: self.endpoint.clone(),
            headers,
            body,
        };
        let response = match &self.transport {
            Some(transport) => transport.post(request)?,
            None => ReqwestTransport::new()?.post(request)?,
        };

        let status = response.status;
        let response_headers = headermap_to_hashmap(&response.headers);

        // The body is dropped when this returns, on success or failure.
        let mut stream = response.body;
        let mut bytes = Vec::new();
        stream
            .read_to_end(&mut bytes)
            .map_err(|e| GraphQlError::ReadError(format!("Failed to read response body: {e}")))?;

        tracing::debug!(
            target: "gql_request::http",
            endpoint = %self.endpoint,
            status,
            bytes = bytes.len(),
            "response received"
        );

        Ok(GraphQlResponse::new(status, response_headers, bytes))
    }
}
