//! HTTP implementation of [`RemoteDataClient`] against the platform web API.

use async_trait::async_trait;
use reqwest::header;
use serde_json::Value;
use tracing::debug;

use query::FetchDoc;

use crate::{ActionRequest, ClientError, Connection, RemoteDataClient, Row};

const API_ROOT: &str = "api/data/v9.2";

/// Asks the platform to attach `@...FormattedValue` siblings to raw
/// foreign-key and enum columns; the mapper reads those for display fields.
const PREFER_FORMATTED: &str =
    "odata.include-annotations=\"OData.Community.Display.V1.FormattedValue\"";

/// Web-API client for a single environment.
pub struct HttpDataClient {
    connection: Connection,
    http: reqwest::Client,
}

impl HttpDataClient {
    pub fn new(connection: Connection) -> Self {
        Self { connection, http: reqwest::Client::new() }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .bearer_auth(self.connection.bearer_token())
            .header(header::ACCEPT, "application/json")
            .header("Prefer", PREFER_FORMATTED)
    }

    async fn rows_from(&self, request: reqwest::RequestBuilder) -> Result<Vec<Row>, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let envelope: Value = response.json().await?;
        let rows = envelope
            .get("value")
            .and_then(Value::as_array)
            .ok_or_else(|| ClientError::Decode("response has no 'value' array".into()))?;

        rows.iter()
            .map(|row| {
                row.as_object()
                    .cloned()
                    .ok_or_else(|| ClientError::Decode("result row is not an object".into()))
            })
            .collect()
    }
}

#[async_trait]
impl RemoteDataClient for HttpDataClient {
    async fn query(&self, query: &str) -> Result<Vec<Row>, ClientError> {
        debug!(%query, "issuing filter query");
        let url = format!("{}/{API_ROOT}/{query}", self.connection.base_url());
        self.rows_from(self.get(&url)).await
    }

    async fn fetch(&self, document: &FetchDoc) -> Result<Vec<Row>, ClientError> {
        let entity_set = document.entity_set();
        debug!(entity = document.entity.name, "issuing fetch document");
        let url = format!("{}/{API_ROOT}/{entity_set}", self.connection.base_url());
        let rendered = document.render();
        self.rows_from(self.get(&url).query(&[("fetchXml", rendered.as_str())]))
            .await
    }

    async fn execute(&self, request: ActionRequest) -> Result<(), ClientError> {
        debug!(operation = request.operation_name, "invoking action");
        let url = format!("{}/{API_ROOT}/{}", self.connection.base_url(), request.operation_name);
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.connection.bearer_token())
            .header(header::ACCEPT, "application/json")
            .json(&request.parameters)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}
