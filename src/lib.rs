//! gql-request
//!
//! A small blocking builder for sending GraphQL queries and mutations over
//! HTTP and navigating the JSON that comes back.
//!
//! ```rust,ignore
//! use gql_request::GraphQlRequest;
//!
//! let response = GraphQlRequest::new("https://example.test/graphql")
//!     .add_header("Authorization", "Bearer token")
//!     .add_variable("id", 42)
//!     .query("query($id: ID!) { node(id: $id) { id } }")
//!     .execute()?;
//!
//! if response.has_errors() {
//!     eprintln!("{:?}", response.errors());
//! }
//! let id = response.get("data.node.id");
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod headers;
pub mod path;
pub mod request;
pub mod response;
pub mod transport;

pub use config::{HttpConfig, HttpConfigBuilder};
pub use error::{GraphQlError, Result};
pub use request::GraphQlRequest;
pub use response::{ErrorLocation, GraphQlErrorEntry, GraphQlResponse};
pub use transport::{HttpTransport, ReqwestTransport, TransportRequest, TransportResponse};
