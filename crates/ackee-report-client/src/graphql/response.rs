//! Decoding and classification of GraphQL responses.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt;

use crate::error::ApiError;

/// One entry of a response's `errors` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLError {
    /// Human readable message.
    pub message: String,

    /// Location of the failing field, e.g. `domain.facts`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,

    /// Server specific details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        let Some(path) = &self.path else {
            return Ok(());
        };

        let rendered: Vec<String> = path
            .iter()
            .map(|segment| match segment {
                PathSegment::Field(name) => name.clone(),
                PathSegment::Index(index) => format!("[{index}]"),
            })
            .collect();
        write!(f, " (at {})", rendered.join("."))
    }
}

/// A field name or list index in an error path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Field.
    Field(String),
    /// Index.
    Index(usize),
}

/// The `{ data, errors }` envelope of every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLResponse {
    /// Payload, absent when execution failed.
    #[serde(default)]
    pub data: Option<Value>,

    /// Execution errors, in server order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,
}

impl GraphQLResponse {
    /// Whether the server reported any error.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The error reported first.
    pub fn first_error(&self) -> Option<&GraphQLError> {
        self.errors.first()
    }

    /// Turn the response into its data payload.
    ///
    /// Fails with the first error's message when the server reported any
    /// errors, even if partial data came along.
    pub fn into_data(self) -> Result<Value, ApiError> {
        if let Some(error) = self.errors.into_iter().next() {
            tracing::debug!(target: "ackee_report_client::graphql", error = %error, "GraphQL error");
            return Err(ApiError::GraphQL {
                message: error.message,
            });
        }

        self.data
            .ok_or_else(|| ApiError::InvalidResponse("no data in GraphQL response".into()))
    }
}

/// Validate a raw HTTP outcome into the GraphQL data payload.
///
/// This is the single place where API responses are classified; see
/// [`ApiError`] for the resulting shapes.
pub fn validate(status: u16, body: &str) -> Result<Value, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::from_status(status, body));
    }

    let response: GraphQLResponse = serde_json::from_str(body)?;
    response.into_data()
}

/// Deserialize a top-level field of a data payload.
///
/// # Example
///
/// ```ignore
/// // For data like: { "domains": [ { "id": "1", "title": "Blog" } ] }
/// let domains: Vec<DomainRef> = field(data, "domains")?;
/// ```
pub fn field<T: DeserializeOwned>(data: Value, name: &str) -> Result<T, ApiError> {
    match data {
        Value::Object(mut map) => {
            let value = map.remove(name).ok_or_else(|| {
                ApiError::InvalidResponse(format!("field '{}' not found in response", name))
            })?;
            serde_json::from_value(value).map_err(|e| {
                ApiError::InvalidResponse(format!("failed to deserialize field '{}': {}", name, e))
            })
        }
        _ => Err(ApiError::InvalidResponse(
            "response data is not an object".into(),
        )),
    }
}
