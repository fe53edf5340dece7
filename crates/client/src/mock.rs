//! `MockDataClient` — a test double for [`RemoteDataClient`].
//!
//! Routes canned rows by substring match against the issued query text (for
//! fetch documents, the rendered XML), and records every query and action so
//! tests can assert on exactly what was sent.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use query::FetchDoc;

use crate::{ActionRequest, ClientError, RemoteDataClient, Row};

#[derive(Default)]
pub struct MockDataClient {
    routes: Vec<(String, Vec<Row>)>,
    queries: Mutex<Vec<String>>,
    actions: Mutex<Vec<ActionRequest>>,
    fail_actions: bool,
    latency: Option<Duration>,
}

impl MockDataClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `rows` for any query whose text contains `needle`. Routes are
    /// tried in registration order; unmatched queries return no rows.
    pub fn with_rows(mut self, needle: impl Into<String>, rows: Vec<Row>) -> Self {
        self.routes.push((needle.into(), rows));
        self
    }

    /// Make every action invocation fail with a platform status error.
    pub fn failing_actions(mut self) -> Self {
        self.fail_actions = true;
        self
    }

    /// Delay every call, so tests can race cancellation against completion.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Every filter query and rendered fetch document issued, in call order.
    pub fn issued_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// Every action invoked, in call order.
    pub fn executed_actions(&self) -> Vec<ActionRequest> {
        self.actions.lock().unwrap().clone()
    }

    async fn respond(&self, text: String) -> Vec<Row> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let rows = self
            .routes
            .iter()
            .find(|(needle, _)| text.contains(needle))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default();
        self.queries.lock().unwrap().push(text);
        rows
    }
}

#[async_trait]
impl RemoteDataClient for MockDataClient {
    async fn query(&self, query: &str) -> Result<Vec<Row>, ClientError> {
        Ok(self.respond(query.to_owned()).await)
    }

    async fn fetch(&self, document: &FetchDoc) -> Result<Vec<Row>, ClientError> {
        Ok(self.respond(document.render()).await)
    }

    async fn execute(&self, request: ActionRequest) -> Result<(), ClientError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.actions.lock().unwrap().push(request);
        if self.fail_actions {
            return Err(ClientError::Status { status: 400, body: "mock action failure".into() });
        }
        Ok(())
    }
}
