//! Import workflow - the state behind the table picker
//!
//! One workflow value owns the catalog, the tree selection, the icon
//! suggestion and the creation draft. It performs no IO: operations return
//! [`WorkflowEffect`]s that the app hands to the task runner, and results
//! come back tagged with the generation that requested them so that a
//! superseded request can never overwrite newer state.

use super::catalog::Catalog;
use super::connection::{ConnectionDraft, DataSource};
use super::draft::{DraftError, NewTable, TableCreationDraft};
use super::icon::{Icon, IconOutcome, IconSuggestion};
use super::selection::{SelectionChange, SelectionState};
use rand::Rng;

/// Which variant of the picker is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkflowCapabilities {
    /// Pick an existing data source instead of entering credentials
    pub with_data_source_selector: bool,
}

/// Where the catalog is listed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Connection(ConnectionDraft),
    DataSource(DataSource),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Work the app must start on behalf of the workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEffect {
    LoadCatalog { generation: u64, source: CatalogSource },
    SuggestIcon { generation: u64, table_name: String },
    CancelIconSuggestion,
}

/// Everything the submission needs, fixed at the moment of submitting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPlan {
    pub workspace_id: String,
    /// Present when a new connection must be created first
    pub connection: Option<ConnectionDraft>,
    pub table: NewTable,
}

pub struct ImportWorkflow {
    pub capabilities: WorkflowCapabilities,
    pub workspace_id: String,
    pub connection: ConnectionDraft,
    pub data_source: Option<DataSource>,
    pub catalog: Option<Catalog>,
    pub catalog_status: CatalogStatus,
    pub selection: SelectionState,
    pub icon: IconSuggestion,
    pub draft: TableCreationDraft,
    pub submitting: bool,
    catalog_generation: u64,
    icon_generation: u64,
}

impl ImportWorkflow {
    pub fn new(capabilities: WorkflowCapabilities, workspace_id: &str) -> Self {
        Self {
            capabilities,
            workspace_id: workspace_id.to_string(),
            connection: ConnectionDraft::default(),
            data_source: None,
            catalog: None,
            catalog_status: CatalogStatus::Idle,
            selection: SelectionState::new(),
            icon: IconSuggestion::default(),
            draft: TableCreationDraft::new(),
            submitting: false,
            catalog_generation: 0,
            icon_generation: 0,
        }
    }

    pub fn icon_generation(&self) -> u64 {
        self.icon_generation
    }

    pub fn catalog_generation(&self) -> u64 {
        self.catalog_generation
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Catalog
    // ─────────────────────────────────────────────────────────────────────────

    /// Ask for the catalog of the current source.
    ///
    /// Returns `None` when there is nothing to list yet (selector variant
    /// with no data source picked). Otherwise the current catalog, selection
    /// and pending icon suggestion are dropped: until the new list arrives
    /// there is no table that belongs to the source being listed.
    pub fn request_catalog(&mut self) -> Option<WorkflowEffect> {
        let source = if self.capabilities.with_data_source_selector {
            CatalogSource::DataSource(self.data_source.clone()?)
        } else {
            CatalogSource::Connection(self.connection.clone())
        };

        self.catalog = None;
        self.selection = SelectionState::new();
        self.draft.clear_selection();
        self.icon_generation += 1;
        self.icon.cancel();

        self.catalog_generation += 1;
        self.catalog_status = CatalogStatus::Loading;

        Some(WorkflowEffect::LoadCatalog {
            generation: self.catalog_generation,
            source,
        })
    }

    /// Switch to another existing data source and list its tables
    pub fn select_data_source(&mut self, data_source: DataSource) -> Option<WorkflowEffect> {
        self.draft.data_source_id = Some(data_source.id.clone());
        self.data_source = Some(data_source);
        self.request_catalog()
    }

    /// Apply a finished catalog load.
    ///
    /// Loads for an older request are dropped. A successful load replaces the
    /// catalog and resets the selection to its first table.
    pub fn catalog_loaded(
        &mut self,
        generation: u64,
        result: Result<Catalog, String>,
    ) -> Vec<WorkflowEffect> {
        if generation != self.catalog_generation {
            return Vec::new();
        }

        match result {
            Ok(catalog) => {
                let change = self.selection.reset_for_catalog(&catalog);
                self.catalog = Some(catalog);
                self.catalog_status = CatalogStatus::Loaded;
                let effect = match change {
                    Some(change) => self.follow_selection(change),
                    None => self.follow_selection(SelectionChange::Deselected),
                };
                vec![effect]
            }
            Err(message) => {
                self.catalog_status = CatalogStatus::Failed(message);
                Vec::new()
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tree
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_database(&mut self, database: &str) {
        self.selection.toggle_database(database);
    }

    pub fn toggle_schema(&mut self, database: &str, schema: &str) {
        self.selection.toggle_schema(database, schema);
    }

    pub fn click_table(&mut self, database: &str, schema: &str, table: &str) -> Option<WorkflowEffect> {
        let catalog = self.catalog.as_ref()?;
        let change = self.selection.click_table(catalog, database, schema, table);
        Some(self.follow_selection(change))
    }

    fn follow_selection(&mut self, change: SelectionChange) -> WorkflowEffect {
        self.icon_generation += 1;

        match change {
            SelectionChange::Selected {
                table_id,
                table_name,
                row_count,
            } => {
                self.draft.apply_selection(&table_id, row_count);
                self.icon.begin();
                WorkflowEffect::SuggestIcon {
                    generation: self.icon_generation,
                    table_name,
                }
            }
            SelectionChange::Deselected => {
                self.draft.clear_selection();
                self.icon.cancel();
                WorkflowEffect::CancelIconSuggestion
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Icon
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a suggestion outcome if it belongs to the current selection.
    ///
    /// Returns `Err` with the failure message when the request failed, and
    /// `Ok(false)` when the outcome was stale and ignored.
    pub fn apply_icon_outcome<R: Rng + ?Sized>(
        &mut self,
        generation: u64,
        outcome: IconOutcome,
        rng: &mut R,
    ) -> Result<bool, String> {
        if generation != self.icon_generation {
            return Ok(false);
        }
        match self.icon.apply(outcome, rng) {
            Some(message) => Err(message),
            None => Ok(true),
        }
    }

    /// Override the suggestion with a hand-picked icon
    pub fn choose_icon(&mut self, icon: &'static Icon, color: &'static str) -> WorkflowEffect {
        self.icon_generation += 1;
        self.icon.choose(icon, color);
        WorkflowEffect::CancelIconSuggestion
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate the draft and freeze it into a plan.
    ///
    /// Nothing is sent when this fails. The selected table must come from a
    /// catalog that finished loading for the current source. A suggestion
    /// still in flight is abandoned in favor of the fallback icon.
    pub fn prepare_submission(&mut self) -> Result<SubmissionPlan, DraftError> {
        if self.catalog_status != CatalogStatus::Loaded {
            return Err(DraftError::CatalogNotLoaded);
        }
        if self.selection.selected_table_id.is_none() {
            self.draft.clear_selection();
        }
        self.draft.validate()?;

        if self.icon.is_loading {
            self.icon_generation += 1;
            self.icon.fall_back();
        }
        self.draft.set_icon(&self.icon);

        let connection = if self.capabilities.with_data_source_selector {
            None
        } else {
            Some(self.connection.clone())
        };

        self.submitting = true;

        Ok(SubmissionPlan {
            workspace_id: self.workspace_id.clone(),
            connection,
            table: self.draft.to_new_table(&self.workspace_id),
        })
    }

    pub fn submission_finished(&mut self) {
        self.submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::TablePreviewItem;
    use crate::model::icon::lookup_icon;
    use crate::theme::ICON_PALETTE;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scenario_catalog() -> Catalog {
        Catalog::new(
            vec![
                TablePreviewItem::new("RAW", "PUBLIC", "orders", 1000),
                TablePreviewItem::new("RAW", "PUBLIC", "users", 50),
            ],
            vec!["RAW".to_string()],
        )
    }

    fn loaded_workflow(capabilities: WorkflowCapabilities) -> ImportWorkflow {
        let mut workflow = ImportWorkflow::new(capabilities, "ws_1");
        if capabilities.with_data_source_selector {
            workflow.select_data_source(DataSource {
                id: "ds_1".to_string(),
                name: "Warehouse".to_string(),
                kind: Default::default(),
            });
        } else {
            workflow.request_catalog();
        }
        let generation = workflow.catalog_generation();
        workflow.catalog_loaded(generation, Ok(scenario_catalog()));
        workflow
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut workflow = ImportWorkflow::new(WorkflowCapabilities::default(), "ws_1");
        let load = workflow.request_catalog();
        assert!(matches!(load, Some(WorkflowEffect::LoadCatalog { generation: 1, .. })));
        assert_eq!(workflow.catalog_status, CatalogStatus::Loading);

        let effects = workflow.catalog_loaded(1, Ok(scenario_catalog()));
        assert_eq!(workflow.selection.selected_table_id.as_deref(), Some("RAW.PUBLIC.orders"));
        assert_eq!(workflow.selection.selected_row_count, Some(1000));
        assert_eq!(workflow.draft.display_name, "orders");
        assert_eq!(
            effects,
            vec![WorkflowEffect::SuggestIcon {
                generation: 1,
                table_name: "orders".to_string(),
            }]
        );

        let effect = workflow.click_table("RAW", "PUBLIC", "users");
        assert_eq!(workflow.selection.selected_table_id.as_deref(), Some("RAW.PUBLIC.users"));
        assert_eq!(workflow.selection.selected_row_count, Some(50));
        assert!(workflow.icon.is_loading);
        assert_eq!(
            effect,
            Some(WorkflowEffect::SuggestIcon {
                generation: 2,
                table_name: "users".to_string(),
            })
        );
    }

    #[test]
    fn test_stale_icon_outcome_is_ignored() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut workflow = loaded_workflow(WorkflowCapabilities::default());
        let first_generation = workflow.icon_generation();

        workflow.click_table("RAW", "PUBLIC", "users");
        let applied = workflow.apply_icon_outcome(
            first_generation,
            IconOutcome::Resolved("ShoppingCart".into()),
            &mut rng,
        );
        assert_eq!(applied, Ok(false));
        assert!(workflow.icon.is_loading);

        let current = workflow.icon_generation();
        let applied =
            workflow.apply_icon_outcome(current, IconOutcome::Resolved("Users".into()), &mut rng);
        assert_eq!(applied, Ok(true));
        assert!(!workflow.icon.is_loading);
        assert_eq!(workflow.icon.icon.name, "Users");
    }

    #[test]
    fn test_deselect_cancels_suggestion() {
        let mut workflow = loaded_workflow(WorkflowCapabilities::default());
        assert!(workflow.icon.is_loading);

        let effect = workflow.click_table("RAW", "PUBLIC", "orders");
        assert_eq!(effect, Some(WorkflowEffect::CancelIconSuggestion));
        assert_eq!(workflow.selection.selected_table_id, None);
        assert!(!workflow.icon.is_loading);
        assert!(workflow.draft.full_path.is_empty());
    }

    #[test]
    fn test_stale_catalog_is_ignored() {
        let mut workflow = ImportWorkflow::new(
            WorkflowCapabilities {
                with_data_source_selector: true,
            },
            "ws_1",
        );
        assert_eq!(workflow.request_catalog(), None);

        let ds = |id: &str| DataSource {
            id: id.to_string(),
            name: id.to_string(),
            kind: Default::default(),
        };
        workflow.select_data_source(ds("first"));
        workflow.select_data_source(ds("second"));
        assert_eq!(workflow.draft.data_source_id.as_deref(), Some("second"));

        let effects = workflow.catalog_loaded(1, Ok(scenario_catalog()));
        assert!(effects.is_empty());
        assert!(workflow.catalog.is_none());
        assert_eq!(workflow.catalog_status, CatalogStatus::Loading);

        let other = Catalog::new(vec![TablePreviewItem::new("B", "S", "accounts", 2)], vec![]);
        workflow.catalog_loaded(2, Ok(other));
        assert_eq!(workflow.selection.selected_table_id.as_deref(), Some("B.S.accounts"));
    }

    #[test]
    fn test_catalog_replacement_invalidates_pending_icon() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut workflow = loaded_workflow(WorkflowCapabilities::default());
        let pending = workflow.icon_generation();

        workflow.request_catalog();
        let generation = workflow.catalog_generation();
        workflow.catalog_loaded(generation, Ok(scenario_catalog()));

        let applied = workflow.apply_icon_outcome(pending, IconOutcome::TimedOut, &mut rng);
        assert_eq!(applied, Ok(false));
    }

    #[test]
    fn test_empty_catalog_leaves_nothing_selected() {
        let mut workflow = ImportWorkflow::new(WorkflowCapabilities::default(), "ws_1");
        workflow.request_catalog();
        let effects = workflow.catalog_loaded(1, Ok(Catalog::default()));
        assert_eq!(effects, vec![WorkflowEffect::CancelIconSuggestion]);
        assert_eq!(workflow.selection.selected_table_id, None);
        assert!(!workflow.icon.is_loading);
    }

    #[test]
    fn test_failed_catalog_load() {
        let mut workflow = ImportWorkflow::new(WorkflowCapabilities::default(), "ws_1");
        workflow.request_catalog();
        let effects = workflow.catalog_loaded(1, Err("bad credentials".to_string()));
        assert!(effects.is_empty());
        assert_eq!(
            workflow.catalog_status,
            CatalogStatus::Failed("bad credentials".to_string())
        );
    }

    #[test]
    fn test_typed_name_is_kept_until_selection_changes() {
        let mut workflow = loaded_workflow(WorkflowCapabilities::default());
        workflow.draft.set_display_name("Customer Orders");

        workflow.toggle_schema("RAW", "PUBLIC");
        workflow.toggle_schema("RAW", "PUBLIC");
        assert_eq!(workflow.draft.display_name, "Customer Orders");

        workflow.click_table("RAW", "PUBLIC", "users");
        assert_eq!(workflow.draft.display_name, "users");
    }

    #[test]
    fn test_submission_guard_blocks_empty_name() {
        let mut workflow = loaded_workflow(WorkflowCapabilities::default());
        workflow.draft.set_display_name("");

        let plan = workflow.prepare_submission();
        assert_eq!(plan, Err(DraftError::EmptyDisplayName));
        assert!(!workflow.submitting);
        assert!(workflow.draft.display_name_error.is_some());
    }

    #[test]
    fn test_submission_guard_blocks_missing_selection() {
        let mut workflow = loaded_workflow(WorkflowCapabilities::default());
        workflow.click_table("RAW", "PUBLIC", "orders");
        assert_eq!(workflow.prepare_submission(), Err(DraftError::NoTableSelected));
    }

    #[test]
    fn test_plan_without_selector_creates_connection() {
        let mut workflow = loaded_workflow(WorkflowCapabilities::default());
        workflow.choose_icon(lookup_icon("Package").unwrap(), ICON_PALETTE[1]);

        let plan = workflow.prepare_submission().unwrap();
        assert!(workflow.submitting);
        assert!(plan.connection.is_some());
        assert_eq!(plan.workspace_id, "ws_1");
        assert_eq!(plan.table.display_name, "orders");
        assert_eq!(plan.table.full_path, "RAW.PUBLIC.orders");
        assert_eq!(plan.table.outer_path, "RAW.PUBLIC");
        assert_eq!(plan.table.row_count, Some(1000));
        assert_eq!(plan.table.icon_name.as_deref(), Some("Package"));
        assert_eq!(plan.table.icon_color.as_deref(), Some(ICON_PALETTE[1]));
        assert_eq!(plan.table.data_source_id, None);
    }

    #[test]
    fn test_plan_with_selector_reuses_data_source() {
        let mut workflow = loaded_workflow(WorkflowCapabilities {
            with_data_source_selector: true,
        });
        let plan = workflow.prepare_submission().unwrap();
        assert!(plan.connection.is_none());
        assert_eq!(plan.table.data_source_id.as_deref(), Some("ds_1"));
    }

    #[test]
    fn test_choose_icon_invalidates_pending_suggestion() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut workflow = loaded_workflow(WorkflowCapabilities::default());
        let pending = workflow.icon_generation();

        workflow.choose_icon(lookup_icon("Truck").unwrap(), ICON_PALETTE[4]);
        let applied = workflow.apply_icon_outcome(pending, IconOutcome::TimedOut, &mut rng);
        assert_eq!(applied, Ok(false));
        assert_eq!(workflow.icon.icon.name, "Truck");
    }

    #[test]
    fn test_switching_data_source_drops_old_tables() {
        let mut workflow = ImportWorkflow::new(
            WorkflowCapabilities {
                with_data_source_selector: true,
            },
            "ws_1",
        );
        let ds = |id: &str| DataSource {
            id: id.to_string(),
            name: id.to_string(),
            kind: Default::default(),
        };

        workflow.select_data_source(ds("first"));
        let only_in_first = Catalog::new(vec![TablePreviewItem::new("A", "S", "only_in_first", 1)], vec![]);
        workflow.catalog_loaded(workflow.catalog_generation(), Ok(only_in_first));
        assert_eq!(workflow.selection.selected_table_id.as_deref(), Some("A.S.only_in_first"));

        workflow.select_data_source(ds("second"));
        assert!(workflow.catalog.is_none());
        assert_eq!(workflow.selection.selected_table_id, None);
        assert!(workflow.draft.full_path.is_empty());
        assert_eq!(workflow.prepare_submission(), Err(DraftError::CatalogNotLoaded));

        workflow.catalog_loaded(workflow.catalog_generation(), Err("HTTP 500".to_string()));
        assert_eq!(workflow.prepare_submission(), Err(DraftError::CatalogNotLoaded));
        assert!(!workflow.submitting);
    }

    #[test]
    fn test_retesting_connection_drops_old_tables() {
        let mut workflow = loaded_workflow(WorkflowCapabilities::default());
        workflow.connection.host = "other-account".to_string();

        let effect = workflow.request_catalog();
        assert!(matches!(effect, Some(WorkflowEffect::LoadCatalog { .. })));
        assert_eq!(workflow.selection.selected_table_id, None);
        assert!(!workflow.icon.is_loading);
        assert_eq!(workflow.prepare_submission(), Err(DraftError::CatalogNotLoaded));

        let other = Catalog::new(vec![TablePreviewItem::new("B", "S", "accounts", 2)], vec![]);
        workflow.catalog_loaded(workflow.catalog_generation(), Ok(other));
        let plan = workflow.prepare_submission().unwrap();
        assert_eq!(plan.table.full_path, "B.S.accounts");
        assert_eq!(
            plan.connection.map(|c| c.host).as_deref(),
            Some("other-account")
        );
    }

    #[test]
    fn test_submitting_during_suggestion_uses_fallback_icon() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut workflow = loaded_workflow(WorkflowCapabilities::default());
        assert!(workflow.icon.is_loading);
        let pending = workflow.icon_generation();

        let plan = workflow.prepare_submission().unwrap();
        assert_eq!(plan.table.icon_name.as_deref(), Some("Table"));
        assert!(!workflow.icon.is_loading);

        let applied =
            workflow.apply_icon_outcome(pending, IconOutcome::Resolved("Truck".into()), &mut rng);
        assert_eq!(applied, Ok(false));
        assert_eq!(workflow.icon.icon.name, "Table");
    }
}
