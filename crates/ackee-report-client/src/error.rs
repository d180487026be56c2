//! Error types for the Ackee client.

use thiserror::Error;

/// Failures talking to the Ackee API.
///
/// Every request helper funnels its outcome through the same response
/// validation, so callers only ever see one of these shapes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The API answered with a GraphQL `errors` array; carries the first message.
    #[error("{message}")]
    GraphQL {
        /// Message of the first reported error.
        message: String,
    },

    /// The API answered with a non-success status and a body.
    ///
    /// `body` is already serialized as JSON.
    #[error("{body} ({status} status code)")]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// The response body, serialized as JSON.
        body: String,
    },

    /// The request failed without a structured response body.
    #[error("transport error: {0}")]
    Transport(String),

    /// A success response did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The configured server URL could not be parsed.
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),

    /// A query option cannot be placed into a query document.
    #[error("invalid query option: {0}")]
    InvalidOption(String),
}

impl ApiError {
    /// Build the error for a non-success HTTP response.
    ///
    /// JSON bodies are re-serialized compactly and other text is quoted as a
    /// JSON string. An empty body carries no structure, so it becomes a plain
    /// transport failure.
    pub fn from_status(status: u16, body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::Transport(format!("request failed with status code {status}"));
        }

        let body = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => value.to_string(),
            Err(_) => serde_json::Value::String(body.to_string()).to_string(),
        };
        Self::HttpStatus { status, body }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// Failures while obtaining a bearer token.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Neither a token nor a full username/password pair was configured.
    #[error("no token configured and username/password incomplete")]
    MissingCredentials,

    /// The token request itself failed.
    #[error("token request failed: {0}")]
    Request(#[source] ApiError),

    /// The token response did not contain `createToken.payload.id`.
    #[error("token missing from createToken response")]
    MissingToken,
}

/// Any error returned by [`AnalyticsClient`](crate::AnalyticsClient).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Authentication failed.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// An API request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl Error {
    /// Returns the API error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            Self::Auth(_) => None,
        }
    }
}

/// A specialized Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
