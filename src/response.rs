//! GraphQL response wrapper.
//!
//! A [`GraphQlResponse`] keeps the raw body bytes and parses them into a
//! `serde_json::Value` only when a JSON accessor is first used. The parsed
//! value is cached. A body that is not valid JSON reads as `Value::Null`
//! instead of failing, so callers inspect `data`/`errors` themselves.

use crate::error::GraphQlError;
use crate::path;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Source position attached to a GraphQL error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// One entry of the `errors` array of a GraphQL response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlErrorEntry {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<ErrorLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

/// Response of a single GraphQL POST.
#[derive(Debug)]
pub struct GraphQlResponse {
    status: u16,
    headers: HashMap<String, String>,
    body: Vec<u8>,
    parsed: OnceLock<Option<Value>>,
}

impl GraphQlResponse {
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
            parsed: OnceLock::new(),
        }
    }

    /// HTTP status code. Non-2xx statuses are not treated as errors.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers (lowercased keys).
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Raw body bytes exactly as received.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    fn parsed(&self) -> Option<&Value> {
        self.parsed
            .get_or_init(|| serde_json::from_slice(&self.body).ok())
            .as_ref()
    }

    /// Whether the body parsed as JSON.
    pub fn is_json(&self) -> bool {
        self.parsed().is_some()
    }

    /// The whole body as JSON, or `Value::Null` if it did not parse.
    pub fn json(&self) -> &Value {
        static NULL: Value = Value::Null;
        self.parsed().unwrap_or(&NULL)
    }

    /// Value at a dot path such as `data.user.name` or `data.items.0.id`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        path::lookup(self.json(), path)
    }

    /// The `data` member, if present and not null.
    pub fn data(&self) -> Option<&Value> {
        self.get("data").filter(|v| !v.is_null())
    }

    /// Entries of the `errors` array. Entries that do not have the expected
    /// shape are skipped; a missing array yields an empty list.
    pub fn errors(&self) -> Vec<GraphQlErrorEntry> {
        match self.get("errors") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| GraphQlErrorEntry::deserialize(item).ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether the response carries a non-empty `errors` array.
    pub fn has_errors(&self) -> bool {
        matches!(self.get("errors"), Some(Value::Array(items)) if !items.is_empty())
    }

    /// Deserialize the value at `path` into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, GraphQlError> {
        let value = self
            .get(path)
            .ok_or_else(|| GraphQlError::DecodeError(format!("No value at path '{path}'")))?;
        T::deserialize(value)
            .map_err(|e| GraphQlError::DecodeError(format!("Invalid value at path '{path}': {e}")))
    }

    /// Deserialize the `data` member into `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, GraphQlError> {
        self.get_as("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(body: &str) -> GraphQlResponse {
        GraphQlResponse::new(200, HashMap::new(), body.as_bytes().to_vec())
    }

    #[test]
    fn navigates_data_path() {
        let res = response(r#"{"data":{"hello":"world"}}"#);
        assert_eq!(res.get("data.hello"), Some(&json!("world")));
        assert_eq!(res.data(), Some(&json!({"hello": "world"})));
        assert!(!res.has_errors());
        assert!(res.errors().is_empty());
    }

    #[test]
    fn malformed_body_reads_as_null() {
        let res = response("<html>bad gateway</html>");
        assert!(!res.is_json());
        assert!(res.json().is_null());
        assert_eq!(res.get("data"), None);
        assert_eq!(res.text(), "<html>bad gateway</html>");
    }

    #[test]
    fn empty_body_reads_as_null() {
        let res = response("");
        assert!(res.json().is_null());
        assert!(res.bytes().is_empty());
    }

    #[test]
    fn errors_are_typed() {
        let res = response(
            r#"{"data":null,"errors":[
                {"message":"boom","locations":[{"line":1,"column":3}],"path":["user",0],"extensions":{"code":"INTERNAL"}},
                {"no_message":true}
            ]}"#,
        );
        assert!(res.has_errors());
        assert_eq!(res.data(), None);

        let errors = res.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "boom");
        assert_eq!(errors[0].locations, vec![ErrorLocation { line: 1, column: 3 }]);
        assert_eq!(errors[0].path, Some(vec![json!("user"), json!(0)]));
        assert_eq!(errors[0].extensions, Some(json!({"code": "INTERNAL"})));
    }

    #[test]
    fn typed_accessors_decode_on_demand() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct User {
            id: u64,
            name: String,
        }

        let res = response(r#"{"data":{"user":{"id":7,"name":"ada"}}}"#);
        let user: User = res.get_as("data.user").unwrap();
        assert_eq!(
            user,
            User {
                id: 7,
                name: "ada".to_string()
            }
        );

        let missing = res.get_as::<User>("data.nobody").unwrap_err();
        assert!(matches!(missing, GraphQlError::DecodeError(_)));

        let wrong = res.get_as::<u64>("data.user.name").unwrap_err();
        assert!(matches!(wrong, GraphQlError::DecodeError(_)));
    }

    #[test]
    fn non_success_status_is_kept() {
        let res = GraphQlResponse::new(
            500,
            HashMap::from([("content-type".to_string(), "application/json".to_string())]),
            br#"{"errors":[{"message":"down"}]}"#.to_vec(),
        );
        assert_eq!(res.status(), 500);
        assert_eq!(
            res.headers().get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(res.errors()[0].message, "down");
    }
}
