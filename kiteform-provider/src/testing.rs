//! In-memory gateway double for tests
//!
//! Responses are queued per GraphQL operation name (or `"PATCH"` for REST
//! patches) and consumed in order. Every call is recorded.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use kiteform_client::{ClientError, GraphqlRequest, RemoteGateway, Result};
use serde_json::Value;

pub(crate) const PATCH: &str = "PATCH";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Query {
        operation: &'static str,
        variables: Value,
    },
    Mutate {
        operation: &'static str,
        variables: Value,
    },
    Patch {
        path: String,
        body: Value,
    },
}

impl Call {
    pub(crate) fn operation(&self) -> &str {
        match self {
            Call::Query { operation, .. } | Call::Mutate { operation, .. } => operation,
            Call::Patch { .. } => PATCH,
        }
    }
}

#[derive(Default)]
pub(crate) struct MockGateway {
    calls: Mutex<Vec<Call>>,
    responses: Mutex<HashMap<String, VecDeque<Result<Value>>>>,
}

impl MockGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response for an operation
    pub(crate) fn respond(&self, operation: &str, data: Value) {
        self.push(operation, Ok(data));
    }

    /// Queue a failure for an operation
    pub(crate) fn fail(&self, operation: &str, error: ClientError) {
        self.push(operation, Err(error));
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Operation names in call order
    pub(crate) fn operations(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|call| call.operation().to_string())
            .collect()
    }

    fn push(&self, operation: &str, response: Result<Value>) {
        self.responses
            .lock()
            .unwrap()
            .entry(operation.to_string())
            .or_default()
            .push_back(response);
    }

    fn next(&self, operation: &str) -> Result<Value> {
        self.responses
            .lock()
            .unwrap()
            .get_mut(operation)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| {
                Err(ClientError::InvalidRequest(format!(
                    "no canned response for {operation}"
                )))
            })
    }
}

#[async_trait]
impl RemoteGateway for MockGateway {
    async fn query(&self, request: GraphqlRequest) -> Result<Value> {
        self.calls.lock().unwrap().push(Call::Query {
            operation: request.operation_name,
            variables: request.variables,
        });
        self.next(request.operation_name)
    }

    async fn mutate(&self, request: GraphqlRequest) -> Result<Value> {
        self.calls.lock().unwrap().push(Call::Mutate {
            operation: request.operation_name,
            variables: request.variables,
        });
        self.next(request.operation_name)
    }

    async fn patch(&self, path: &str, body: Value) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Patch {
            path: path.to_string(),
            body,
        });
        self.next(PATCH).map(|_| ())
    }
}
