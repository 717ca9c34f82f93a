//! HTTP Headers Utility
//!
//! Builds the outgoing header set for a GraphQL POST and converts response
//! headers into plain string maps.

use crate::error::GraphQlError;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::collections::{BTreeMap, HashMap};

/// Content type sent with every request unless the caller overrides it.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP header builder for GraphQL requests
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    /// Create a new header builder
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// Add JSON content type
    pub fn with_json_content_type(mut self) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        self
    }

    /// Add a custom header, replacing any value already present for that name.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, GraphQlError> {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            GraphQlError::TransportError(format!("Invalid header name '{name}': {e}"))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            GraphQlError::TransportError(format!("Invalid value for header '{name}': {e}"))
        })?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Add every header of the map, in key order.
    pub fn with_custom_headers(
        self,
        custom_headers: &BTreeMap<String, String>,
    ) -> Result<Self, GraphQlError> {
        custom_headers
            .iter()
            .try_fold(self, |builder, (key, value)| builder.with_header(key, value))
    }

    /// Build the final HeaderMap
    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

impl Default for HttpHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Headers for a GraphQL POST: the JSON content type first, then the caller's
/// headers, so a caller-supplied `Content-Type` wins.
pub fn request_headers(custom: &BTreeMap<String, String>) -> Result<HeaderMap, GraphQlError> {
    Ok(HttpHeaderBuilder::new()
        .with_json_content_type()
        .with_custom_headers(custom)?
        .build())
}

/// Convert reqwest HeaderMap to HashMap<String, String>
///
/// Keys come out lowercased. Values that are not valid UTF-8 are skipped.
pub fn headermap_to_hashmap(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(k, v)| {
            v.to_str()
                .ok()
                .map(|v_str| (k.as_str().to_string(), v_str.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn default_content_type_is_json() {
        let headers = request_headers(&BTreeMap::new()).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn caller_content_type_overrides_default() {
        let headers =
            request_headers(&custom(&[("content-type", "application/graphql+json")])).unwrap();
        assert_eq!(
            headers.get(CONTENT_TYPE).unwrap(),
            "application/graphql+json"
        );
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn custom_headers_are_applied() {
        let headers = request_headers(&custom(&[
            ("Authorization", "Bearer abc"),
            ("X-Trace", "1"),
        ]))
        .unwrap();
        assert_eq!(headers.get("authorization").unwrap(), "Bearer abc");
        assert_eq!(headers.get("x-trace").unwrap(), "1");
    }

    #[test]
    fn invalid_header_name_is_a_transport_error() {
        let err = request_headers(&custom(&[("bad header", "v")])).unwrap_err();
        assert!(matches!(err, GraphQlError::TransportError(_)));
    }

    #[test]
    fn invalid_header_value_is_a_transport_error() {
        let err = request_headers(&custom(&[("x-ok", "line\nbreak")])).unwrap_err();
        assert!(matches!(err, GraphQlError::TransportError(_)));
    }

    #[test]
    fn headermap_conversion_lowercases_keys() {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_bytes(b"X-Request-Id").unwrap(),
            HeaderValue::from_static("42"),
        );
        let converted = headermap_to_hashmap(&map);
        assert_eq!(converted.get("x-request-id").map(String::as_str), Some("42"));
    }
}
