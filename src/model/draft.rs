//! Table creation draft - the form filled in before submitting

use super::catalog::{last_segment, outer_path};
use super::icon::IconSuggestion;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest display name the API accepts
pub const MAX_DISPLAY_NAME_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Display name is required")]
    EmptyDisplayName,
    #[error("Display name must be {} characters or fewer", MAX_DISPLAY_NAME_LEN)]
    DisplayNameTooLong,
    #[error("Select a table to import")]
    NoTableSelected,
    #[error("The table list for this connection has not loaded")]
    CatalogNotLoaded,
}

/// Body of the create-table request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTable {
    pub workspace_id: String,
    pub display_name: String,
    pub full_path: String,
    pub outer_path: String,
    pub row_count: Option<u64>,
    pub icon_name: Option<String>,
    pub icon_color: Option<String>,
    pub data_source_id: Option<String>,
}

/// Values that end up in the create-table request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCreationDraft {
    pub display_name: String,
    pub display_name_error: Option<String>,
    /// `database.schema.table` of the selected table
    pub full_path: String,
    /// `database.schema` of the selected table
    pub outer_path: String,
    pub row_count: Option<u64>,
    pub icon_name: Option<String>,
    pub icon_color: Option<String>,
    pub data_source_id: Option<String>,
}

impl TableCreationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow a selection change.
    ///
    /// The display name is re-derived only when the selected id differs from
    /// the one already in the draft, so re-applying the current selection
    /// keeps whatever the user typed.
    pub fn apply_selection(&mut self, table_id: &str, row_count: Option<u64>) {
        if self.full_path != table_id {
            self.display_name = last_segment(table_id).to_string();
            self.display_name_error = None;
        }
        self.full_path = table_id.to_string();
        self.outer_path = outer_path(table_id).to_string();
        self.row_count = row_count;
    }

    /// Forget the selected table; the typed name is kept
    pub fn clear_selection(&mut self) {
        self.full_path.clear();
        self.outer_path.clear();
        self.row_count = None;
    }

    pub fn push_char(&mut self, c: char) {
        self.display_name.push(c);
        self.display_name_error = None;
    }

    pub fn backspace(&mut self) {
        self.display_name.pop();
        self.display_name_error = None;
    }

    pub fn set_display_name(&mut self, name: &str) {
        self.display_name = name.to_string();
        self.display_name_error = None;
    }

    pub fn set_icon(&mut self, icon: &IconSuggestion) {
        self.icon_name = Some(icon.icon.name.to_string());
        self.icon_color = Some(icon.color.to_string());
    }

    /// Check the draft before anything is sent.
    ///
    /// Display name problems are also stored in `display_name_error` for the
    /// form to show inline.
    pub fn validate(&mut self) -> Result<(), DraftError> {
        let result = if self.display_name.trim().is_empty() {
            Err(DraftError::EmptyDisplayName)
        } else if self.display_name.chars().count() > MAX_DISPLAY_NAME_LEN {
            Err(DraftError::DisplayNameTooLong)
        } else if self.full_path.is_empty() {
            Err(DraftError::NoTableSelected)
        } else {
            Ok(())
        };

        self.display_name_error = match &result {
            Err(err @ (DraftError::EmptyDisplayName | DraftError::DisplayNameTooLong)) => {
                Some(err.to_string())
            }
            _ => None,
        };

        result
    }

    /// Request body for a validated draft
    pub fn to_new_table(&self, workspace_id: &str) -> NewTable {
        NewTable {
            workspace_id: workspace_id.to_string(),
            display_name: self.display_name.trim().to_string(),
            full_path: self.full_path.clone(),
            outer_path: self.outer_path.clone(),
            row_count: self.row_count,
            icon_name: self.icon_name.clone(),
            icon_color: self.icon_color.clone(),
            data_source_id: self.data_source_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_sets_default_display_name() {
        let mut draft = TableCreationDraft::new();
        draft.apply_selection("DB.SCHEMA.orders", Some(10));

        assert_eq!(draft.display_name, "orders");
        assert_eq!(draft.full_path, "DB.SCHEMA.orders");
        assert_eq!(draft.outer_path, "DB.SCHEMA");
        assert_eq!(draft.row_count, Some(10));
    }

    #[test]
    fn test_user_edit_survives_reapplied_selection() {
        let mut draft = TableCreationDraft::new();
        draft.apply_selection("DB.SCHEMA.orders", Some(10));
        draft.set_display_name("Customer Orders");

        draft.apply_selection("DB.SCHEMA.orders", Some(10));
        assert_eq!(draft.display_name, "Customer Orders");
    }

    #[test]
    fn test_new_selection_derives_new_default() {
        let mut draft = TableCreationDraft::new();
        draft.apply_selection("DB.SCHEMA.orders", Some(10));
        draft.push_char('!');
        assert_eq!(draft.display_name, "orders!");

        draft.apply_selection("DB.SCHEMA.users", Some(3));
        assert_eq!(draft.display_name, "users");
        assert_eq!(draft.row_count, Some(3));
    }

    #[test]
    fn test_empty_display_name_is_rejected() {
        let mut draft = TableCreationDraft::new();
        draft.apply_selection("DB.SCHEMA.orders", None);
        draft.set_display_name("");

        assert_eq!(draft.validate(), Err(DraftError::EmptyDisplayName));
        assert!(draft.display_name_error.as_deref().is_some_and(|e| !e.is_empty()));
    }

    #[test]
    fn test_long_display_name_is_rejected() {
        let mut draft = TableCreationDraft::new();
        draft.apply_selection("DB.SCHEMA.orders", None);
        draft.set_display_name(&"x".repeat(MAX_DISPLAY_NAME_LEN + 1));
        assert_eq!(draft.validate(), Err(DraftError::DisplayNameTooLong));

        draft.set_display_name(&"x".repeat(MAX_DISPLAY_NAME_LEN));
        assert_eq!(draft.validate(), Ok(()));
        assert_eq!(draft.display_name_error, None);
    }

    #[test]
    fn test_validate_requires_a_selected_table() {
        let mut draft = TableCreationDraft::new();
        draft.set_display_name("orders");
        assert_eq!(draft.validate(), Err(DraftError::NoTableSelected));
        assert_eq!(draft.display_name_error, None);
    }

    #[test]
    fn test_editing_clears_error() {
        let mut draft = TableCreationDraft::new();
        draft.apply_selection("DB.SCHEMA.orders", None);
        draft.set_display_name("");
        let _ = draft.validate();
        draft.push_char('o');
        assert_eq!(draft.display_name_error, None);
    }
}
