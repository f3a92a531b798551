//! Icon suggestion with a hard deadline
//!
//! The request and the deadline race inside one future: whichever finishes
//! first decides the outcome and the other side is dropped, so a late
//! response can never land after the fallback was applied.

use super::api::WorkspaceApi;
use crate::model::IconOutcome;
use std::time::Duration;

/// How long a suggestion may take before the fallback icon is used
pub const ICON_SUGGESTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Ask the API for the best icon for `table_name`, giving up after `deadline`
pub async fn suggest_icon(
    api: &dyn WorkspaceApi,
    table_name: &str,
    deadline: Duration,
) -> IconOutcome {
    match tokio::time::timeout(deadline, api.guess_icon(table_name)).await {
        Ok(Ok(guess)) => {
            tracing::debug!(table_name, best_match = %guess.best_match, "icon suggestion resolved");
            IconOutcome::Resolved(guess.best_match)
        }
        Ok(Err(err)) => {
            tracing::warn!(table_name, error = %err, "icon suggestion failed");
            IconOutcome::Failed(err.to_string())
        }
        Err(_) => {
            tracing::info!(table_name, "icon suggestion timed out, using fallback");
            IconOutcome::TimedOut
        }
    }
}
