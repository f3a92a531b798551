//! Tree selection and expansion state

use super::catalog::{schema_key, table_id, Catalog};
use std::collections::HashSet;

/// Result of a table click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    Selected {
        table_id: String,
        table_name: String,
        row_count: Option<u64>,
    },
    Deselected,
}

/// Which table is selected and which tree branches are open
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected_table_id: Option<String>,
    pub selected_row_count: Option<u64>,
    pub expanded_databases: HashSet<String>,
    /// Keyed by `database.schema`
    pub expanded_schemas: HashSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a freshly loaded catalog.
    ///
    /// Opens every branch and selects the first table so the preview pane is
    /// never empty for a non-empty catalog. Returns the new selection, if any.
    pub fn reset_for_catalog(&mut self, catalog: &Catalog) -> Option<SelectionChange> {
        let expanded_databases = catalog
            .nested
            .databases()
            .map(|(name, _)| name.to_string())
            .collect();
        let expanded_schemas = catalog.nested.schema_keys().into_iter().collect();

        let first = catalog.nested.first_table();
        let selected_table_id = first.map(|(d, s, t)| table_id(d, s, t));
        let selected_row_count = first.and_then(|(d, s, t)| catalog.row_count(d, s, t));

        *self = Self {
            selected_table_id: selected_table_id.clone(),
            selected_row_count,
            expanded_databases,
            expanded_schemas,
        };

        first.map(|(_, _, table)| SelectionChange::Selected {
            table_id: selected_table_id.unwrap_or_default(),
            table_name: table.to_string(),
            row_count: selected_row_count,
        })
    }

    pub fn toggle_database(&mut self, database: &str) {
        if !self.expanded_databases.remove(database) {
            self.expanded_databases.insert(database.to_string());
        }
    }

    pub fn toggle_schema(&mut self, database: &str, schema: &str) {
        let key = schema_key(database, schema);
        if !self.expanded_schemas.remove(&key) {
            self.expanded_schemas.insert(key);
        }
    }

    pub fn is_database_expanded(&self, database: &str) -> bool {
        self.expanded_databases.contains(database)
    }

    pub fn is_schema_expanded(&self, database: &str, schema: &str) -> bool {
        self.expanded_schemas.contains(&schema_key(database, schema))
    }

    pub fn is_table_selected(&self, database: &str, schema: &str, table: &str) -> bool {
        self.selected_table_id.as_deref() == Some(table_id(database, schema, table).as_str())
    }

    /// Select a table, or deselect it if it is already selected
    pub fn click_table(
        &mut self,
        catalog: &Catalog,
        database: &str,
        schema: &str,
        table: &str,
    ) -> SelectionChange {
        let id = table_id(database, schema, table);

        if self.selected_table_id.as_deref() == Some(id.as_str()) {
            self.selected_table_id = None;
            self.selected_row_count = None;
            return SelectionChange::Deselected;
        }

        let row_count = catalog.row_count(database, schema, table);
        self.selected_table_id = Some(id.clone());
        self.selected_row_count = row_count;

        SelectionChange::Selected {
            table_id: id,
            table_name: table.to_string(),
            row_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::TablePreviewItem;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                TablePreviewItem::new("RAW", "PUBLIC", "orders", 1000),
                TablePreviewItem::new("RAW", "PUBLIC", "users", 50),
                TablePreviewItem::new("RAW", "STAGING", "events", 3),
                TablePreviewItem::new("ANALYTICS", "MARTS", "revenue", 9),
            ],
            vec![],
        )
    }

    #[test]
    fn test_reset_selects_first_table_and_expands_everything() {
        let mut state = SelectionState::new();
        let change = state.reset_for_catalog(&catalog());

        assert_eq!(state.selected_table_id.as_deref(), Some("RAW.PUBLIC.orders"));
        assert_eq!(state.selected_row_count, Some(1000));
        assert!(state.is_database_expanded("RAW"));
        assert!(state.is_database_expanded("ANALYTICS"));
        assert!(state.is_schema_expanded("RAW", "STAGING"));
        assert!(state.is_schema_expanded("ANALYTICS", "MARTS"));
        assert_eq!(
            change,
            Some(SelectionChange::Selected {
                table_id: "RAW.PUBLIC.orders".to_string(),
                table_name: "orders".to_string(),
                row_count: Some(1000),
            })
        );
    }

    #[test]
    fn test_reset_with_empty_catalog_clears_selection() {
        let mut state = SelectionState::new();
        state.reset_for_catalog(&catalog());

        let change = state.reset_for_catalog(&Catalog::default());
        assert_eq!(change, None);
        assert_eq!(state.selected_table_id, None);
        assert_eq!(state.selected_row_count, None);
        assert!(state.expanded_databases.is_empty());
    }

    #[test]
    fn test_reset_replaces_stale_selection() {
        let mut state = SelectionState::new();
        let old = catalog();
        state.reset_for_catalog(&old);
        state.click_table(&old, "ANALYTICS", "MARTS", "revenue");

        let new = Catalog::new(vec![TablePreviewItem::new("PROD", "CORE", "accounts", 4)], vec![]);
        state.reset_for_catalog(&new);
        assert_eq!(state.selected_table_id.as_deref(), Some("PROD.CORE.accounts"));
        assert!(!state.is_database_expanded("RAW"));
    }

    #[test]
    fn test_clicking_same_table_twice_deselects() {
        let catalog = catalog();
        let mut state = SelectionState::new();
        state.reset_for_catalog(&catalog);
        state.click_table(&catalog, "RAW", "PUBLIC", "orders");
        assert_eq!(state.selected_table_id, None);

        let expanded_databases = state.expanded_databases.clone();
        let expanded_schemas = state.expanded_schemas.clone();

        let first = state.click_table(&catalog, "RAW", "STAGING", "events");
        assert!(matches!(first, SelectionChange::Selected { .. }));
        let second = state.click_table(&catalog, "RAW", "STAGING", "events");
        assert_eq!(second, SelectionChange::Deselected);

        assert_eq!(state.selected_table_id, None);
        assert_eq!(state.selected_row_count, None);
        assert_eq!(state.expanded_databases, expanded_databases);
        assert_eq!(state.expanded_schemas, expanded_schemas);
    }

    #[test]
    fn test_click_looks_up_row_count() {
        let catalog = catalog();
        let mut state = SelectionState::new();
        state.reset_for_catalog(&catalog);

        let change = state.click_table(&catalog, "RAW", "PUBLIC", "users");
        assert_eq!(
            change,
            SelectionChange::Selected {
                table_id: "RAW.PUBLIC.users".to_string(),
                table_name: "users".to_string(),
                row_count: Some(50),
            }
        );
        assert_eq!(state.selected_row_count, Some(50));
    }

    #[test]
    fn test_collapsing_database_keeps_schema_expansion() {
        let mut state = SelectionState::new();
        state.reset_for_catalog(&catalog());

        state.toggle_schema("RAW", "STAGING");
        assert!(!state.is_schema_expanded("RAW", "STAGING"));

        state.toggle_database("RAW");
        assert!(!state.is_database_expanded("RAW"));
        assert!(state.is_schema_expanded("RAW", "PUBLIC"));

        state.toggle_database("RAW");
        assert!(state.is_database_expanded("RAW"));
        assert!(state.is_schema_expanded("RAW", "PUBLIC"));
        assert!(!state.is_schema_expanded("RAW", "STAGING"));
    }

    #[test]
    fn test_same_schema_name_in_two_databases_toggles_independently() {
        let catalog = Catalog::new(
            vec![
                TablePreviewItem::new("A", "PUBLIC", "x", 0),
                TablePreviewItem::new("B", "PUBLIC", "y", 0),
            ],
            vec![],
        );
        let mut state = SelectionState::new();
        state.reset_for_catalog(&catalog);

        state.toggle_schema("A", "PUBLIC");
        assert!(!state.is_schema_expanded("A", "PUBLIC"));
        assert!(state.is_schema_expanded("B", "PUBLIC"));
    }
}
