//! HTTP transport for GraphQL operations.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde_json::Value;

use super::request::GraphQLRequest;
use super::response;
use crate::error::ApiError;

/// Configures a [`GraphQLClient`] before it is built.
pub struct GraphQLClientBuilder {
    url: String,
    extra_headers: Vec<(String, String)>,
    token: Option<String>,
    timeout: Option<Duration>,
    user_agent: String,
}

impl GraphQLClientBuilder {
    /// Start configuring a client for the endpoint at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            extra_headers: Vec::new(),
            token: None,
            timeout: None,
            user_agent: format!("ackee-report/{} (Rust)", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Send an extra header with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Start with a bearer token already set.
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set a timeout for each request. There is none by default.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validate the endpoint and build the client.
    pub fn build(self) -> Result<GraphQLClient, ApiError> {
        let url = url::Url::parse(&self.url)?;

        let mut builder = reqwest::Client::builder().user_agent(self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(GraphQLClient {
            shared: Arc::new(Shared {
                http: http_client,
                endpoint: url,
                extra_headers: self.extra_headers,
                token: RwLock::new(self.token),
            }),
        })
    }
}

/// State shared by every clone of a client.
struct Shared {
    http: reqwest::Client,
    endpoint: url::Url,
    extra_headers: Vec<(String, String)>,
    token: RwLock<Option<String>>,
}

/// A GraphQL client posting queries and mutations over HTTP.
///
/// Clones share the connection pool and the bearer token, so a token set
/// through one clone is used by all of them.
///
/// # Example
///
/// ```ignore
/// use ackee_report_client::graphql::{GraphQLClient, GraphQLRequest};
///
/// let client = GraphQLClient::builder("https://ackee.example.com/api")
///     .bearer_auth("my-token")
///     .build()?;
///
/// let request = GraphQLRequest::query("{ domains { id title } }");
/// let data = client.execute(request).await?;
/// ```
#[derive(Clone)]
pub struct GraphQLClient {
    shared: Arc<Shared>,
}

impl GraphQLClient {
    /// Configure a client for the endpoint at `url`.
    pub fn builder(url: impl Into<String>) -> GraphQLClientBuilder {
        GraphQLClientBuilder::new(url)
    }

    /// The endpoint every operation is posted to.
    pub fn url(&self) -> &str {
        self.shared.endpoint.as_str()
    }

    /// Set the bearer token sent with every subsequent request.
    pub fn set_bearer_token(&self, token: impl Into<String>) {
        *self.shared.token.write() = Some(token.into());
    }

    /// The current bearer token, if one is set.
    pub fn bearer_token(&self) -> Option<String> {
        self.shared.token.read().clone()
    }

    /// Execute a GraphQL operation and return its validated data payload.
    pub async fn execute(&self, request: GraphQLRequest) -> Result<Value, ApiError> {
        tracing::trace!(
            target: "ackee_report_client::graphql",
            operation = request.name(),
            kind = ?request.operation_type(),
            "sending GraphQL request"
        );

        let token = self.bearer_token();
        let post = self
            .shared
            .extra_headers
            .iter()
            .fold(
                self.shared.http.post(self.shared.endpoint.clone()),
                |post, (name, value)| post.header(name.as_str(), value.as_str()),
            )
            .header("Accept", "application/json")
            .json(&request);
        let post = match token {
            Some(token) => post.bearer_auth(token),
            None => post,
        };

        let response = post.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::trace!(
            target: "ackee_report_client::graphql",
            operation = request.name(),
            status,
            "received GraphQL response"
        );

        response::validate(status, &body)
    }
}

impl std::fmt::Debug for GraphQLClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQLClient")
            .field("url", &self.url())
            .field("authenticated", &self.shared.token.read().is_some())
            .finish()
    }
}
