//! Error Handling Module
//!
//! Every failure of a request execution is returned to the caller as a
//! [`GraphQlError`]. Nothing is recovered locally and there is no partial
//! result: an error means no response was produced.

use thiserror::Error;

/// Errors produced while building, sending or reading a GraphQL request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphQlError {
    /// The request configuration is incomplete (e.g. no query text).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The outgoing payload could not be serialized to JSON.
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// The HTTP request could not be constructed or sent.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The response body could not be fully read.
    #[error("Read error: {0}")]
    ReadError(String),

    /// A typed accessor could not deserialize part of the response.
    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl GraphQlError {
    /// Returns true when the failure happened before any network I/O.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationError(_) | Self::EncodingError(_) | Self::DecodeError(_)
        )
    }
}

impl From<reqwest::Error> for GraphQlError {
    fn from(err: reqwest::Error) -> Self {
        Self::TransportError(err.to_string())
    }
}

/// Result type for gql-request operations
pub type Result<T> = std::result::Result<T, GraphQlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = GraphQlError::ConfigurationError("no query/mutation provided".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: no query/mutation provided"
        );
    }

    #[test]
    fn local_errors_are_classified() {
        assert!(GraphQlError::EncodingError("x".into()).is_local());
        assert!(GraphQlError::ConfigurationError("x".into()).is_local());
        assert!(!GraphQlError::TransportError("x".into()).is_local());
        assert!(!GraphQlError::ReadError("x".into()).is_local());
    }
}
