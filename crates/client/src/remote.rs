//! The `RemoteDataClient` trait — the contract the service executes against.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use query::FetchDoc;

use crate::ClientError;

/// One raw result row: a mapping of column (or join alias) name to untyped
/// value, including any platform-added formatted-value sibling keys.
pub type Row = serde_json::Map<String, Value>;

/// A named server-side operation with typed parameters. All mutations in
/// this domain go through one of these.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub operation_name: &'static str,
    pub operation_type: &'static str,
    pub parameters: Value,
}

impl ActionRequest {
    /// An `"action"`-typed invocation of `operation_name`.
    pub fn action(operation_name: &'static str, parameters: Value) -> Self {
        Self { operation_name, operation_type: "action", parameters }
    }
}

/// Executes the two query sublanguages and the action mechanism.
///
/// Implementations surface failures raw; retries, refreshes, and user-visible
/// reporting are all the caller's concern.
#[async_trait]
pub trait RemoteDataClient: Send + Sync {
    /// Execute a filter-query string and return its rows.
    async fn query(&self, query: &str) -> Result<Vec<Row>, ClientError>;

    /// Execute a structured query document and return its rows.
    async fn fetch(&self, document: &FetchDoc) -> Result<Vec<Row>, ClientError>;

    /// Invoke a named action.
    async fn execute(&self, request: ActionRequest) -> Result<(), ClientError>;
}
