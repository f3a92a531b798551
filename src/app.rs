//! Application coordinator
//!
//! Owns the import workflow, the modal stack and every component. Key events
//! become Actions, Actions mutate the workflow, and the effects the workflow
//! returns are handed to the task runner. Task results are drained on every
//! tick and applied one message at a time.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    draw_browse_screen, BrowseComponent, BrowseRenderContext, ConnectionForm, DataSourceSelector,
    ErrorDialog, HelpDialog, IconPicker, QuitDialog,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::ui::{AppMode, Focus};
use crate::model::{DraftError, ImportWorkflow, WorkflowCapabilities, WorkflowEffect};
use crate::services::{SessionError, TaskMessage, TaskRunner};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};

// ═══════════════════════════════════════════════════════════════════════════════
// App State
// ═══════════════════════════════════════════════════════════════════════════════

pub struct App {
    pub mode: AppMode,
    pub workflow: ImportWorkflow,
    pub modals: ModalStack,
    pub tasks: TaskRunner,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Non-blocking note shown above the help bar
    pub status_message: Option<String>,

    pub user_label: Option<String>,
    pub workspace_name: Option<String>,

    /// Web route of the created table, set once submission succeeds
    pub navigate_to: Option<String>,

    tick: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub connection_form: ConnectionForm,
    pub browse: BrowseComponent,
    pub data_source_selector: DataSourceSelector,
    pub icon_picker: IconPicker,
    pub error_dialog: ErrorDialog,
    pub help_dialog: HelpDialog,
    pub quit_dialog: QuitDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    pub fn new(config: &Config, tasks: TaskRunner) -> App {
        let capabilities = WorkflowCapabilities {
            with_data_source_selector: config.with_data_source_selector,
        };
        let selector = capabilities.with_data_source_selector;

        App {
            mode: if selector { AppMode::Browse } else { AppMode::Connect },
            workflow: ImportWorkflow::new(capabilities, &config.workspace_id),
            modals: ModalStack::new(),
            tasks,
            should_quit: false,
            status_message: None,
            user_label: None,
            workspace_name: None,
            navigate_to: None,
            tick: 0,
            connection_form: ConnectionForm::new(),
            browse: BrowseComponent::new(selector),
            data_source_selector: DataSourceSelector::new(),
            icon_picker: IconPicker::default(),
            error_dialog: ErrorDialog::default(),
            help_dialog: HelpDialog {
                scroll_offset: 0,
                with_data_source_selector: selector,
            },
            quit_dialog: QuitDialog::default(),
        }
    }

    /// Kick off the startup fetches
    pub fn init(&mut self) {
        let workspace_id = self.workflow.workspace_id.clone();

        if self.tasks.is_signed_in() {
            self.tasks.load_context(&workspace_id);
        } else {
            tracing::warn!("no session token; table creation will be refused");
        }

        if self.workflow.capabilities.with_data_source_selector {
            if self.tasks.is_signed_in() {
                self.open_data_source_selector();
            } else {
                self.modals
                    .push_error("Sign in required", SessionError::SignedOut.to_string());
            }
        }
    }

    fn run_effects(&mut self, effects: impl IntoIterator<Item = WorkflowEffect>) {
        for effect in effects {
            if matches!(effect, WorkflowEffect::SuggestIcon { .. }) {
                self.status_message = None;
            }
            self.tasks.run(effect);
        }
    }

    fn open_data_source_selector(&mut self) {
        self.data_source_selector.start_loading();
        self.tasks.load_data_sources(&self.workflow.workspace_id);
        self.modals.push(Modal::DataSourceSelector {
            selected_index: self.data_source_selector.selected_index,
        });
    }

    fn refresh_catalog(&mut self) {
        match self.workflow.request_catalog() {
            Some(effect) => self.start_catalog_load(effect),
            None => self.open_data_source_selector(),
        }
    }

    /// The old tree is gone, so its pending suggestion goes with it
    fn start_catalog_load(&mut self, effect: WorkflowEffect) {
        self.run_effects([WorkflowEffect::CancelIconSuggestion, effect]);
        self.browse.tree.first();
    }

    fn test_connection(&mut self) {
        let Some(draft) = self.connection_form.to_draft() else {
            return;
        };
        tracing::info!(kind = %draft.kind, host = %draft.host, "listing tables for connection");
        self.workflow.connection = draft;
        self.refresh_catalog();
        self.mode = AppMode::Browse;
        self.browse.focus = Focus::Tree;
    }

    fn submit(&mut self) {
        if self.workflow.submitting {
            return;
        }
        if !self.tasks.is_signed_in() {
            self.modals
                .push_error("Sign in required", SessionError::SignedOut.to_string());
            return;
        }

        match self.workflow.prepare_submission() {
            Ok(plan) => {
                tracing::info!(
                    full_path = %plan.table.full_path,
                    new_connection = plan.connection.is_some(),
                    "submitting table"
                );
                self.status_message = None;
                self.tasks.cancel_icon();
                self.tasks.submit(plan);
            }
            Err(err @ (DraftError::NoTableSelected | DraftError::CatalogNotLoaded)) => {
                self.modals.push_error("Nothing to create", err.to_string());
            }
            Err(err) => {
                tracing::debug!(error = %err, "draft rejected");
                self.browse.focus = Focus::DisplayName;
            }
        }
    }

    /// Keep the modal's recorded cursor in step with its dialog
    fn sync_modal_index(&mut self) {
        match self.modals.top_mut() {
            Some(Modal::DataSourceSelector { selected_index }) => {
                *selected_index = self.data_source_selector.selected_index;
            }
            Some(Modal::IconPicker { selected_index }) => {
                *selected_index = self.icon_picker.selected_index;
            }
            _ => {}
        }
    }

    fn confirm_modal(&mut self) {
        let Some(modal) = self.modals.top().cloned() else {
            return;
        };
        match modal {
            Modal::QuitConfirm => self.should_quit = true,
            Modal::DataSourceSelector { .. } => {
                let Some(data_source) = self.data_source_selector.selected().cloned() else {
                    return;
                };
                self.modals.pop();
                tracing::info!(data_source_id = %data_source.id, "data source chosen");
                if let Some(effect) = self.workflow.select_data_source(data_source) {
                    self.start_catalog_load(effect);
                }
                self.browse.focus = Focus::Tree;
            }
            Modal::IconPicker { .. } => {
                let (icon, color) = self.icon_picker.selected();
                self.modals.pop();
                let effect = self.workflow.choose_icon(icon, color);
                self.run_effects([effect]);
            }
            Modal::Error { .. } | Modal::Help { .. } => {
                self.modals.pop();
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Background results
    // ─────────────────────────────────────────────────────────────────────────

    fn poll_tasks(&mut self) {
        for message in self.tasks.poll() {
            self.apply_message(message);
        }
    }

    fn apply_message(&mut self, message: TaskMessage) {
        match message {
            TaskMessage::CatalogLoaded { generation, result } => {
                if generation != self.workflow.catalog_generation() {
                    tracing::debug!(generation, "stale catalog result ignored");
                    return;
                }
                let failure = result.as_ref().err().cloned();
                let effects = self.workflow.catalog_loaded(generation, result);
                match failure {
                    Some(message) => self.modals.push_error("Listing tables failed", message),
                    None => {
                        self.browse.catalog_replaced(&self.workflow);
                        if self.workflow.catalog.as_ref().is_some_and(|c| c.is_empty()) {
                            self.status_message =
                                Some("No tables are visible to this connection".to_string());
                        }
                    }
                }
                self.run_effects(effects);
            }
            TaskMessage::IconSuggested {
                generation,
                outcome,
            } => {
                let mut rng = rand::rng();
                match self.workflow.apply_icon_outcome(generation, outcome, &mut rng) {
                    Ok(true) => {}
                    Ok(false) => tracing::debug!(
                        generation,
                        current = self.workflow.icon_generation(),
                        "stale icon suggestion ignored"
                    ),
                    Err(message) => {
                        self.status_message = Some(format!("Icon suggestion failed: {}", message));
                    }
                }
            }
            TaskMessage::DataSourcesLoaded(Ok(data_sources)) => {
                let current = self.workflow.data_source.as_ref().map(|ds| ds.id.clone());
                self.data_source_selector
                    .set_data_sources(data_sources, current.as_deref());
                self.sync_modal_index();
            }
            TaskMessage::DataSourcesLoaded(Err(message)) => {
                self.data_source_selector.set_data_sources(Vec::new(), None);
                self.modals.push_error("Listing connections failed", message);
            }
            TaskMessage::ContextLoaded(Ok((user, workspace))) => {
                self.user_label = Some(user.label().to_string());
                self.workspace_name = Some(workspace.name);
            }
            TaskMessage::ContextLoaded(Err(_)) => {
                self.status_message = Some("Could not load workspace details".to_string());
            }
            TaskMessage::Submitted(Ok(submitted)) => {
                self.workflow.submission_finished();
                tracing::info!(
                    table_id = %submitted.table_id,
                    route = %submitted.route,
                    "table created"
                );
                self.navigate_to = Some(submitted.route);
                self.should_quit = true;
            }
            TaskMessage::Submitted(Err(message)) => {
                self.workflow.submission_finished();
                self.modals.push_error("Creating the table failed", message);
            }
        }
    }

    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::DataSourceSelector { .. } => self.data_source_selector.handle_key_event(key),
            Modal::IconPicker { .. } => self.icon_picker.handle_key_event(key),
            Modal::Error { .. } => self.error_dialog.handle_key_event(key),
            Modal::Help { .. } => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area),
            Modal::DataSourceSelector { .. } => self.data_source_selector.draw(frame, area),
            Modal::IconPicker { .. } => self.icon_picker.draw(frame, area),
            Modal::Error { title, message } => {
                self.error_dialog.show(title, message);
                self.error_dialog.draw(frame, area)
            }
            Modal::Help { .. } => self.help_dialog.draw(frame, area),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }

        match self.mode {
            AppMode::Connect => self.connection_form.handle_key_event(key),
            AppMode::Browse => self.browse.handle_key_event(key),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                self.poll_tasks();
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Tree Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::NextItem => self.browse.next(&self.workflow),
            Action::PrevItem => self.browse.previous(),
            Action::FirstItem => self.browse.select_first(),
            Action::LastItem => self.browse.select_last(&self.workflow),
            Action::ActivateRow => {
                if let Some(effect) = self.browse.tree.activate(&mut self.workflow) {
                    self.run_effects([effect]);
                }
            }
            Action::FocusNext => self.browse.toggle_focus(),

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.submitting = self.workflow.submitting;
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help { scroll_offset: 0 });
            }
            Action::OpenDataSourceSelector => {
                if self.workflow.capabilities.with_data_source_selector {
                    self.open_data_source_selector();
                }
            }
            Action::OpenIconPicker => {
                if self.workflow.selection.selected_table_id.is_some() {
                    self.icon_picker
                        .open_at(self.workflow.icon.icon, self.workflow.icon.color);
                    self.modals.push(Modal::IconPicker {
                        selected_index: self.icon_picker.selected_index,
                    });
                }
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => self.confirm_modal(),
            Action::ModalUp | Action::ModalDown => self.sync_modal_index(),

            // ─────────────────────────────────────────────────────────────────
            // Connection
            // ─────────────────────────────────────────────────────────────────
            Action::TestConnection => self.test_connection(),
            Action::RefreshCatalog => self.refresh_catalog(),
            Action::EditConnection => {
                if !self.workflow.capabilities.with_data_source_selector {
                    self.connection_form.load(&self.workflow.connection);
                    self.mode = AppMode::Connect;
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Display Name & Submission
            // ─────────────────────────────────────────────────────────────────
            Action::NameInput(c) => self.workflow.draft.push_char(c),
            Action::NameBackspace => self.workflow.draft.backspace(),
            Action::Submit => self.submit(),
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match self.mode {
            AppMode::Connect => self.connection_form.draw(frame, area)?,
            AppMode::Browse => {
                let ctx = BrowseRenderContext {
                    workflow: &self.workflow,
                    status_message: self.status_message.as_deref(),
                    user_label: self.user_label.as_deref(),
                    workspace_name: self.workspace_name.as_deref(),
                    tick: self.tick,
                };
                draw_browse_screen(frame, area, &mut self.browse, &ctx)?;
            }
        }

        // Draw modal overlay if active
        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}
