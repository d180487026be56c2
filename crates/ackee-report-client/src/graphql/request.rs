//! Outgoing GraphQL operations.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Whether an operation reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationType {
    /// Reads data.
    #[default]
    Query,
    /// Changes server state, such as issuing a token.
    Mutation,
}

/// A GraphQL request as posted to the API: `{ query, variables }`.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    /// The GraphQL document.
    pub query: String,

    /// Variables for the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,

    /// The operation name, used for logging only.
    #[serde(skip)]
    pub(crate) operation_name: Option<&'static str>,

    #[serde(skip)]
    pub(crate) operation_type: OperationType,
}

impl GraphQLRequest {
    /// A query with no variables.
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            operation_name: None,
            operation_type: OperationType::Query,
        }
    }

    /// A mutation with no variables.
    pub fn mutation(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            operation_name: None,
            operation_type: OperationType::Mutation,
        }
    }

    /// Add a variable.
    ///
    /// A value that fails to serialize is left out and logged as a warning;
    /// use [`try_variable`](Self::try_variable) to get the error instead.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let request = GraphQLRequest::query("...")
    ///     .variable("id", "123")
    ///     .variable("range", "LAST_7_DAYS");
    /// ```
    pub fn variable(self, name: impl Into<String>, value: impl Serialize) -> Self {
        let name = name.into();
        match serde_json::to_value(value) {
            Ok(value) => self.insert_variable(name, value),
            Err(error) => {
                tracing::warn!(
                    target: "ackee_report_client::graphql",
                    operation = self.name(),
                    variable = %name,
                    %error,
                    "dropping variable that failed to serialize"
                );
                self
            }
        }
    }

    /// Add a variable, failing when the value does not serialize to JSON.
    pub fn try_variable(
        self,
        name: impl Into<String>,
        value: impl Serialize,
    ) -> Result<Self, ApiError> {
        let name = name.into();
        let value = serde_json::to_value(value)
            .map_err(|e| ApiError::InvalidOption(format!("variable '{name}': {e}")))?;
        Ok(self.insert_variable(name, value))
    }

    fn insert_variable(mut self, name: String, value: Value) -> Self {
        if let Value::Object(map) = self
            .variables
            .get_or_insert_with(|| Value::Object(Map::new()))
        {
            map.insert(name, value);
        }
        self
    }

    /// Name the operation for diagnostics.
    pub fn named(mut self, name: &'static str) -> Self {
        self.operation_name = Some(name);
        self
    }

    /// Query or mutation.
    pub fn operation_type(&self) -> OperationType {
        self.operation_type
    }

    /// The operation name, or `"anonymous"`.
    pub fn name(&self) -> &'static str {
        self.operation_name.unwrap_or("anonymous")
    }
}
