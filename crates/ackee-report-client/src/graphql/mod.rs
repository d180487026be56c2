//! GraphQL transport for the Ackee API.
//!
//! Requests are posted as `{ query, variables }` JSON. Every response goes
//! through [`response::validate`], which returns either the `data` payload or
//! a typed [`ApiError`](crate::ApiError).
//!
//! # Example
//!
//! ```ignore
//! use ackee_report_client::graphql::{GraphQLClient, GraphQLRequest};
//!
//! let client = GraphQLClient::builder("https://ackee.example.com/api").build()?;
//!
//! let request = GraphQLRequest::query(r#"
//!     query getDomain($id: ID!) {
//!         domain(id: $id) {
//!             id
//!             title
//!         }
//!     }
//! "#)
//! .variable("id", "123");
//!
//! let data = client.execute(request).await?;
//! let domain: DomainRef = response::field(data, "domain")?;
//! ```

mod client;
mod request;
pub mod response;

pub use client::{GraphQLClient, GraphQLClientBuilder};
pub use request::{GraphQLRequest, OperationType};
pub use response::{GraphQLError, GraphQLResponse};
