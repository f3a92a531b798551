//! In-memory collaborators for service tests

use super::api::{ApiError, Created, IconGuess, ListTablesResponse, User, Workspace, WorkspaceApi};
use super::session::{SessionError, SessionProvider};
use crate::model::{ConnectionDraft, DataSource, NewTable};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// How `guess_icon` answers for one table name
#[derive(Debug, Clone)]
pub enum IconBehavior {
    Answer(String),
    After(Duration, String),
    Fail,
    Never,
}

#[derive(Default)]
pub struct MockApi {
    pub tables: ListTablesResponse,
    pub data_sources: Vec<DataSource>,
    pub icons: HashMap<String, IconBehavior>,
    pub fail_list: bool,
    pub fail_create_connection: bool,
    pub fail_create_table: bool,
    /// Every call, in order, as `operation:argument`
    pub calls: Mutex<Vec<String>>,
    /// Tokens received by authenticated calls
    pub tokens: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn with_icon(mut self, table_name: &str, behavior: IconBehavior) -> Self {
        self.icons.insert(table_name.to_string(), behavior);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn record_token(&self, token: &str) {
        self.tokens.lock().unwrap().push(token.to_string());
    }

    fn server_error() -> ApiError {
        ApiError::Status {
            status: 500,
            body: "internal error".to_string(),
        }
    }
}

#[async_trait]
impl WorkspaceApi for MockApi {
    async fn list_tables_for_connection(
        &self,
        params: &ConnectionDraft,
    ) -> Result<ListTablesResponse, ApiError> {
        self.record(format!("list_tables_for_connection:{}", params.host));
        if self.fail_list {
            return Err(Self::server_error());
        }
        Ok(self.tables.clone())
    }

    async fn list_tables_for_data_source(
        &self,
        data_source_id: &str,
        token: &str,
    ) -> Result<ListTablesResponse, ApiError> {
        self.record(format!("list_tables_for_data_source:{}", data_source_id));
        self.record_token(token);
        if self.fail_list {
            return Err(Self::server_error());
        }
        Ok(self.tables.clone())
    }

    async fn list_data_sources(
        &self,
        workspace_id: &str,
        token: &str,
    ) -> Result<Vec<DataSource>, ApiError> {
        self.record(format!("list_data_sources:{}", workspace_id));
        self.record_token(token);
        Ok(self.data_sources.clone())
    }

    async fn guess_icon(&self, table_name: &str) -> Result<IconGuess, ApiError> {
        self.record(format!("guess_icon:{}", table_name));
        let behavior = self
            .icons
            .get(table_name)
            .cloned()
            .unwrap_or_else(|| IconBehavior::Answer("Table".to_string()));

        match behavior {
            IconBehavior::Answer(best_match) => Ok(IconGuess { best_match }),
            IconBehavior::After(delay, best_match) => {
                tokio::time::sleep(delay).await;
                Ok(IconGuess { best_match })
            }
            IconBehavior::Fail => Err(Self::server_error()),
            IconBehavior::Never => std::future::pending().await,
        }
    }

    async fn create_connection(
        &self,
        workspace_id: &str,
        _draft: &ConnectionDraft,
        token: &str,
    ) -> Result<Created, ApiError> {
        self.record(format!("create_connection:{}", workspace_id));
        self.record_token(token);
        if self.fail_create_connection {
            return Err(Self::server_error());
        }
        Ok(Created {
            id: "conn_1".to_string(),
        })
    }

    async fn create_table(&self, table: &NewTable, token: &str) -> Result<Created, ApiError> {
        self.record(format!(
            "create_table:{}:{}",
            table.display_name,
            table.data_source_id.as_deref().unwrap_or("-")
        ));
        self.record_token(token);
        if self.fail_create_table {
            return Err(Self::server_error());
        }
        Ok(Created {
            id: "tbl_1".to_string(),
        })
    }

    async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        self.record_token(token);
        Ok(User {
            id: "user_1".to_string(),
            email: "ada@example.com".to_string(),
            name: Some("Ada".to_string()),
            created_at: None,
        })
    }

    async fn current_workspace(
        &self,
        workspace_id: &str,
        token: &str,
    ) -> Result<Workspace, ApiError> {
        self.record_token(token);
        Ok(Workspace {
            id: workspace_id.to_string(),
            name: "Acme".to_string(),
            created_at: None,
        })
    }
}

/// Session that hands out numbered tokens so tests can see each fetch
#[derive(Default)]
pub struct CountingSession {
    pub signed_out: bool,
    issued: AtomicUsize,
}

impl CountingSession {
    pub fn signed_out() -> Self {
        Self {
            signed_out: true,
            ..Default::default()
        }
    }

    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for CountingSession {
    fn is_signed_in(&self) -> bool {
        !self.signed_out
    }

    async fn get_token(&self, _template: &str) -> Result<String, SessionError> {
        if self.signed_out {
            return Err(SessionError::SignedOut);
        }
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("token-{}", n))
    }
}
