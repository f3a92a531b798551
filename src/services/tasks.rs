//! Background task runner
//!
//! Remote calls run on the tokio runtime; their results travel back over a
//! channel that the UI thread drains on every tick. Results carry the
//! generation that asked for them so the workflow can drop stale ones.

use super::api::{User, Workspace, WorkspaceApi};
use super::icon_suggest::{suggest_icon, ICON_SUGGESTION_TIMEOUT};
use super::session::SessionProvider;
use super::submit::{submit_import, Submitted};
use crate::model::{Catalog, CatalogSource, DataSource, IconOutcome, SubmissionPlan, WorkflowEffect};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Messages sent from background tasks to the UI thread
#[derive(Debug)]
pub enum TaskMessage {
    CatalogLoaded {
        generation: u64,
        result: Result<Catalog, String>,
    },
    IconSuggested {
        generation: u64,
        outcome: IconOutcome,
    },
    DataSourcesLoaded(Result<Vec<DataSource>, String>),
    ContextLoaded(Result<(User, Workspace), String>),
    Submitted(Result<Submitted, String>),
}

pub struct TaskRunner {
    runtime: Handle,
    api: Arc<dyn WorkspaceApi>,
    session: Arc<dyn SessionProvider>,
    token_template: String,
    sender: Sender<TaskMessage>,
    receiver: Receiver<TaskMessage>,
    catalog_task: Option<JoinHandle<()>>,
    icon_task: Option<JoinHandle<()>>,
}

impl TaskRunner {
    pub fn new(
        runtime: Handle,
        api: Arc<dyn WorkspaceApi>,
        session: Arc<dyn SessionProvider>,
        token_template: &str,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            runtime,
            api,
            session,
            token_template: token_template.to_string(),
            sender,
            receiver,
            catalog_task: None,
            icon_task: None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_signed_in()
    }

    /// Start whatever a workflow effect asks for
    pub fn run(&mut self, effect: WorkflowEffect) {
        match effect {
            WorkflowEffect::LoadCatalog { generation, source } => {
                self.load_catalog(generation, source)
            }
            WorkflowEffect::SuggestIcon {
                generation,
                table_name,
            } => self.suggest_icon(generation, table_name),
            WorkflowEffect::CancelIconSuggestion => self.cancel_icon(),
        }
    }

    /// List the tables of a source, replacing any load still in flight
    pub fn load_catalog(&mut self, generation: u64, source: CatalogSource) {
        if let Some(task) = self.catalog_task.take() {
            task.abort();
        }

        let api = Arc::clone(&self.api);
        let session = Arc::clone(&self.session);
        let template = self.token_template.clone();
        let tx = self.sender.clone();

        self.catalog_task = Some(self.runtime.spawn(async move {
            let result = match source {
                CatalogSource::Connection(draft) => api
                    .list_tables_for_connection(&draft)
                    .await
                    .map_err(|e| e.to_string()),
                CatalogSource::DataSource(data_source) => {
                    match session.get_token(&template).await {
                        Ok(token) => api
                            .list_tables_for_data_source(&data_source.id, &token)
                            .await
                            .map_err(|e| e.to_string()),
                        Err(e) => Err(e.to_string()),
                    }
                }
            };

            match &result {
                Ok(response) => tracing::info!(
                    generation,
                    tables = response.listed_tables.len(),
                    "catalog loaded"
                ),
                Err(error) => tracing::error!(generation, %error, "catalog load failed"),
            }

            let _ = tx.send(TaskMessage::CatalogLoaded {
                generation,
                result: result.map(Catalog::from),
            });
        }));
    }

    /// Ask for an icon, aborting the previous suggestion if it is still running
    pub fn suggest_icon(&mut self, generation: u64, table_name: String) {
        self.cancel_icon();

        let api = Arc::clone(&self.api);
        let tx = self.sender.clone();

        self.icon_task = Some(self.runtime.spawn(async move {
            let outcome = suggest_icon(api.as_ref(), &table_name, ICON_SUGGESTION_TIMEOUT).await;
            let _ = tx.send(TaskMessage::IconSuggested {
                generation,
                outcome,
            });
        }));
    }

    pub fn cancel_icon(&mut self) {
        if let Some(task) = self.icon_task.take() {
            task.abort();
        }
    }

    pub fn load_data_sources(&self, workspace_id: &str) {
        let api = Arc::clone(&self.api);
        let session = Arc::clone(&self.session);
        let template = self.token_template.clone();
        let workspace_id = workspace_id.to_string();
        let tx = self.sender.clone();

        self.runtime.spawn(async move {
            let result = match session.get_token(&template).await {
                Ok(token) => api
                    .list_data_sources(&workspace_id, &token)
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            if let Err(error) = &result {
                tracing::error!(%error, "listing data sources failed");
            }
            let _ = tx.send(TaskMessage::DataSourcesLoaded(result));
        });
    }

    /// Fetch the signed-in user and the workspace for the status bar
    pub fn load_context(&self, workspace_id: &str) {
        let api = Arc::clone(&self.api);
        let session = Arc::clone(&self.session);
        let template = self.token_template.clone();
        let workspace_id = workspace_id.to_string();
        let tx = self.sender.clone();

        self.runtime.spawn(async move {
            let result = async {
                let token = session.get_token(&template).await.map_err(|e| e.to_string())?;
                let user = api.current_user(&token).await.map_err(|e| e.to_string())?;
                let workspace = api
                    .current_workspace(&workspace_id, &token)
                    .await
                    .map_err(|e| e.to_string())?;
                Ok((user, workspace))
            }
            .await;
            if let Err(error) = &result {
                tracing::warn!(%error, "loading user and workspace failed");
            }
            let _ = tx.send(TaskMessage::ContextLoaded(result));
        });
    }

    pub fn submit(&self, plan: SubmissionPlan) {
        let api = Arc::clone(&self.api);
        let session = Arc::clone(&self.session);
        let template = self.token_template.clone();
        let tx = self.sender.clone();

        self.runtime.spawn(async move {
            let result = submit_import(api.as_ref(), session.as_ref(), &template, plan)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "submission failed");
                    e.user_message()
                });
            let _ = tx.send(TaskMessage::Submitted(result));
        });
    }

    /// Drain every message that has arrived since the last poll
    pub fn poll(&self) -> Vec<TaskMessage> {
        let mut messages = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => messages.push(message),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        messages
    }
}
