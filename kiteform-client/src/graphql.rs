//! GraphQL request/response envelope

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ClientError, Result};

/// A single GraphQL operation
///
/// The operation name doubles as a stable key for logging and for matching
/// requests in tests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    pub operation_name: &'static str,
    pub query: &'static str,
    pub variables: Value,
}

impl GraphqlRequest {
    pub fn new(operation_name: &'static str, query: &'static str, variables: Value) -> Self {
        Self {
            operation_name,
            query,
            variables,
        }
    }

    /// Build a mutation request whose variables are `{ "input": input }`
    pub fn with_input<T: Serialize>(
        operation_name: &'static str,
        query: &'static str,
        input: &T,
    ) -> Result<Self> {
        let input = serde_json::to_value(input).map_err(|e| {
            ClientError::InvalidRequest(format!("{operation_name}: cannot encode input: {e}"))
        })?;
        Ok(Self::new(operation_name, query, json!({ "input": input })))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

/// Raw GraphQL response body
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl GraphqlResponse {
    /// Extract `data`, treating any reported error as a failure
    pub fn into_data(self) -> Result<Value> {
        if !self.errors.is_empty() {
            return Err(ClientError::GraphqlErrors(
                self.errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        self.data
            .ok_or_else(|| ClientError::ParseError("response carried no data".to_string()))
    }
}

/// Decode the `data` of an operation into its typed payload
pub fn decode<T: DeserializeOwned>(operation_name: &str, data: Value) -> Result<T> {
    serde_json::from_value(data)
        .map_err(|e| ClientError::ParseError(format!("{operation_name}: {e}")))
}
