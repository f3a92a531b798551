//! Remote API client
//!
//! Plain request/response calls against the product's REST API. No retry or
//! caching happens here; callers refetch explicitly after mutations.

use crate::model::{Catalog, ConnectionDraft, DataSource, NewTable, TablePreviewItem};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Errors returned by the remote API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

/// Answer of the list-tables call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTablesResponse {
    #[serde(default)]
    pub listed_tables: Vec<TablePreviewItem>,
    #[serde(default)]
    pub listed_databases: Vec<String>,
}

impl From<ListTablesResponse> for Catalog {
    fn from(response: ListTablesResponse) -> Self {
        Catalog::new(response.listed_tables, response.listed_databases)
    }
}

/// Answer of the icon classification call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconGuess {
    #[serde(rename = "bestMatch")]
    pub best_match: String,
}

/// Id of a freshly created entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct GuessIconRequest<'a> {
    #[serde(rename = "tableName")]
    table_name: &'a str,
}

/// Operations the import workflow needs from the backend
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// Test credentials and list every reachable table
    async fn list_tables_for_connection(
        &self,
        params: &ConnectionDraft,
    ) -> Result<ListTablesResponse, ApiError>;

    /// List the tables of a connection that already exists
    async fn list_tables_for_data_source(
        &self,
        data_source_id: &str,
        token: &str,
    ) -> Result<ListTablesResponse, ApiError>;

    async fn list_data_sources(
        &self,
        workspace_id: &str,
        token: &str,
    ) -> Result<Vec<DataSource>, ApiError>;

    /// Best-matching icon name for a table name
    async fn guess_icon(&self, table_name: &str) -> Result<IconGuess, ApiError>;

    async fn create_connection(
        &self,
        workspace_id: &str,
        draft: &ConnectionDraft,
        token: &str,
    ) -> Result<Created, ApiError>;

    async fn create_table(&self, table: &NewTable, token: &str) -> Result<Created, ApiError>;

    async fn current_user(&self, token: &str) -> Result<User, ApiError>;

    async fn current_workspace(&self, workspace_id: &str, token: &str)
        -> Result<Workspace, ApiError>;
}

/// [`WorkspaceApi`] over HTTP with JSON bodies
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    /// Shared HTTP client (connection pooling).
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, body = %body, "API returned non-2xx status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl WorkspaceApi for HttpApi {
    async fn list_tables_for_connection(
        &self,
        params: &ConnectionDraft,
    ) -> Result<ListTablesResponse, ApiError> {
        tracing::debug!(kind = %params.kind, host = %params.host, "listing tables for connection");
        self.send(self.client.post(self.url("connections/test")).json(params))
            .await
    }

    async fn list_tables_for_data_source(
        &self,
        data_source_id: &str,
        token: &str,
    ) -> Result<ListTablesResponse, ApiError> {
        tracing::debug!(data_source_id, "listing tables for data source");
        let url = self.url(&format!("connections/{}/tables", data_source_id));
        self.send(self.client.get(url).bearer_auth(token)).await
    }

    async fn list_data_sources(
        &self,
        workspace_id: &str,
        token: &str,
    ) -> Result<Vec<DataSource>, ApiError> {
        let url = self.url(&format!("workspaces/{}/connections", workspace_id));
        self.send(self.client.get(url).bearer_auth(token)).await
    }

    async fn guess_icon(&self, table_name: &str) -> Result<IconGuess, ApiError> {
        let body = GuessIconRequest { table_name };
        self.send(self.client.post(self.url("tables/guess-icon")).json(&body))
            .await
    }

    async fn create_connection(
        &self,
        workspace_id: &str,
        draft: &ConnectionDraft,
        token: &str,
    ) -> Result<Created, ApiError> {
        let mut body = draft.clone();
        body.name = draft.effective_name();
        let url = self.url(&format!("workspaces/{}/connections", workspace_id));
        self.send(self.client.post(url).bearer_auth(token).json(&body))
            .await
    }

    async fn create_table(&self, table: &NewTable, token: &str) -> Result<Created, ApiError> {
        self.send(self.client.post(self.url("tables")).bearer_auth(token).json(table))
            .await
    }

    async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        self.send(self.client.get(self.url("users/me")).bearer_auth(token))
            .await
    }

    async fn current_workspace(
        &self,
        workspace_id: &str,
        token: &str,
    ) -> Result<Workspace, ApiError> {
        let url = self.url(&format!("workspaces/{}", workspace_id));
        self.send(self.client.get(url).bearer_auth(token)).await
    }
}
