//! Table creation submission
//!
//! Creates the connection (when the plan carries one) and then the table.
//! A token is fetched right before each mutation. There is no rollback: if
//! the table call fails after the connection was created, the error carries
//! the id of the connection left behind.

use super::api::{ApiError, WorkspaceApi};
use super::session::{SessionError, SessionProvider};
use crate::model::SubmissionPlan;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Creating the connection failed: {0}")]
    CreateConnection(#[source] ApiError),

    #[error("Creating the table failed: {source}")]
    CreateTable {
        /// Connection created earlier in the same submission
        orphaned_connection_id: Option<String>,
        #[source]
        source: ApiError,
    },
}

impl SubmitError {
    pub fn orphaned_connection_id(&self) -> Option<&str> {
        match self {
            SubmitError::CreateTable {
                orphaned_connection_id,
                ..
            } => orphaned_connection_id.as_deref(),
            _ => None,
        }
    }

    /// Message for the error dialog
    pub fn user_message(&self) -> String {
        match self.orphaned_connection_id() {
            Some(id) => format!(
                "{}\n\nThe connection was already created (id {}). It can be reused or removed from the workspace settings.",
                self, id
            ),
            None => self.to_string(),
        }
    }
}

/// A completed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub table_id: String,
    pub connection_id: Option<String>,
    /// Where the new table lives in the web app
    pub route: String,
}

/// Path of a table's detail page
pub fn table_route(workspace_id: &str, table_id: &str) -> String {
    format!("/workspace/{}/table/{}", workspace_id, table_id)
}

pub async fn submit_import(
    api: &dyn WorkspaceApi,
    session: &dyn SessionProvider,
    token_template: &str,
    plan: SubmissionPlan,
) -> Result<Submitted, SubmitError> {
    let SubmissionPlan {
        workspace_id,
        connection,
        mut table,
    } = plan;

    let connection_id = match connection {
        Some(draft) => {
            let token = session.get_token(token_template).await?;
            let created = api
                .create_connection(&workspace_id, &draft, &token)
                .await
                .map_err(SubmitError::CreateConnection)?;
            tracing::info!(connection_id = %created.id, "connection created");
            table.data_source_id = Some(created.id.clone());
            Some(created.id)
        }
        None => None,
    };

    let token = session.get_token(token_template).await?;
    let created = api
        .create_table(&table, &token)
        .await
        .map_err(|source| SubmitError::CreateTable {
            orphaned_connection_id: connection_id.clone(),
            source,
        })?;

    tracing::info!(table_id = %created.id, full_path = %table.full_path, "table created");

    Ok(Submitted {
        route: table_route(&workspace_id, &created.id),
        table_id: created.id,
        connection_id,
    })
}
