//! Browse component - Main application screen
//!
//! Catalog tree on the left, preview and display name on the right.
//! Owns the tree cursor and which pane has focus.

use crate::action::Action;
use crate::component::Component;
use crate::components::catalog_tree::{render_tree, visible_rows, CatalogTree};
use crate::components::calculate_browse_layout;
use crate::components::preview::{render_name_field, render_preview};
use crate::model::ui::Focus;
use crate::model::{CatalogStatus, ImportWorkflow};
use crate::theme::{key_hint, muted, title_style};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Browse Component
// ═══════════════════════════════════════════════════════════════════════════════

pub struct BrowseComponent {
    pub tree: CatalogTree,
    pub focus: Focus,
    pub with_data_source_selector: bool,
}

impl BrowseComponent {
    pub fn new(with_data_source_selector: bool) -> Self {
        Self {
            tree: CatalogTree::new(),
            focus: Focus::Tree,
            with_data_source_selector,
        }
    }

    fn row_count(workflow: &ImportWorkflow) -> usize {
        workflow
            .catalog
            .as_ref()
            .map(|c| visible_rows(&c.nested, &workflow.selection).len())
            .unwrap_or(0)
    }

    pub fn next(&mut self, workflow: &ImportWorkflow) {
        self.tree.next(Self::row_count(workflow));
    }

    pub fn previous(&mut self) {
        self.tree.previous();
    }

    pub fn select_first(&mut self) {
        self.tree.first();
    }

    pub fn select_last(&mut self, workflow: &ImportWorkflow) {
        self.tree.last(Self::row_count(workflow));
    }

    /// Move the cursor to the default selection of a fresh catalog
    pub fn catalog_replaced(&mut self, workflow: &ImportWorkflow) {
        self.tree.first();
        if let Some(catalog) = workflow.catalog.as_ref() {
            let rows = visible_rows(&catalog.nested, &workflow.selection);
            self.tree.focus_selected(&rows);
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    fn handle_tree_key(&self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Submit)
            }
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('g') => Some(Action::FirstItem),
            KeyCode::Char('G') => Some(Action::LastItem),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ActivateRow),
            KeyCode::Tab | KeyCode::BackTab => Some(Action::FocusNext),
            KeyCode::Char('i') => Some(Action::OpenIconPicker),
            KeyCode::Char('r') => Some(Action::RefreshCatalog),
            KeyCode::Char('c') if self.with_data_source_selector => {
                Some(Action::OpenDataSourceSelector)
            }
            KeyCode::Char('e') if !self.with_data_source_selector => Some(Action::EditConnection),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::OpenQuitDialog),
            _ => None,
        }
    }

    fn handle_name_key(&self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Submit)
            }
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc => Some(Action::FocusNext),
            KeyCode::Backspace => Some(Action::NameBackspace),
            KeyCode::Char(c) => Some(Action::NameInput(c)),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for BrowseComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match self.focus {
            Focus::Tree => self.handle_tree_key(key),
            Focus::DisplayName => self.handle_name_key(key),
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing needs the workflow; see draw_browse_screen
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything the browse screen shows that the component does not own
pub struct BrowseRenderContext<'a> {
    pub workflow: &'a ImportWorkflow,
    pub status_message: Option<&'a str>,
    pub user_label: Option<&'a str>,
    pub workspace_name: Option<&'a str>,
    pub tick: usize,
}

pub fn draw_browse_screen(
    frame: &mut Frame,
    area: Rect,
    browse: &mut BrowseComponent,
    ctx: &BrowseRenderContext,
) -> Result<()> {
    let status = status_text(ctx);
    let layout = calculate_browse_layout(area, status.is_some());

    render_header(frame, layout.header, ctx);
    render_tree(
        frame,
        layout.tree,
        &mut browse.tree,
        ctx.workflow,
        browse.focus == Focus::Tree,
    );
    render_preview(frame, layout.preview, ctx.workflow, ctx.tick);
    render_name_field(
        frame,
        layout.name_field,
        ctx.workflow,
        browse.focus == Focus::DisplayName,
    );

    if let (Some(area), Some((text, color))) = (layout.status, status) {
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {}", text), Style::default().fg(color))),
            area,
        );
    }

    render_help_bar(frame, layout.help, browse);
    Ok(())
}

fn status_text(ctx: &BrowseRenderContext) -> Option<(String, Color)> {
    if ctx.workflow.submitting {
        return Some(("Creating table...".to_string(), Color::Yellow));
    }
    if let CatalogStatus::Failed(message) = &ctx.workflow.catalog_status {
        return Some((format!("Listing tables failed: {}", message), Color::Red));
    }
    ctx.status_message.map(|m| (m.to_string(), Color::DarkGray))
}

fn render_header(frame: &mut Frame, area: Rect, ctx: &BrowseRenderContext) {
    let workflow = ctx.workflow;
    let source = match (&workflow.data_source, workflow.capabilities.with_data_source_selector) {
        (Some(ds), _) => ds.name.clone(),
        (None, true) => "no connection chosen".to_string(),
        (None, false) => workflow.connection.effective_name(),
    };

    let mut spans = vec![
        Span::styled(" Import a table ", title_style(Color::Cyan)),
        Span::styled(" from ", muted()),
        Span::styled(source, Style::default().fg(Color::White)),
    ];
    if let Some(workspace) = ctx.workspace_name {
        spans.push(Span::styled("  into ", muted()));
        spans.push(Span::styled(workspace.to_string(), Style::default().fg(Color::Magenta)));
    }
    if let Some(user) = ctx.user_label {
        spans.push(Span::styled(format!("  ({})", user), muted()));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        area,
    );
}

fn render_help_bar(frame: &mut Frame, area: Rect, browse: &BrowseComponent) {
    let spans = match browse.focus {
        Focus::Tree => {
            let mut spans = vec![
                key_hint("j/k", Color::Cyan),
                Span::raw("Move "),
                key_hint("Enter", Color::Cyan),
                Span::raw("Open/Select "),
                key_hint("Tab", Color::Cyan),
                Span::raw("Name "),
                key_hint("i", Color::Cyan),
                Span::raw("Icon "),
            ];
            if browse.with_data_source_selector {
                spans.push(key_hint("c", Color::Cyan));
                spans.push(Span::raw("Connection "));
            } else {
                spans.push(key_hint("e", Color::Cyan));
                spans.push(Span::raw("Edit connection "));
            }
            spans.extend([
                key_hint("^S", Color::Green),
                Span::raw("Create "),
                key_hint("?", Color::Yellow),
                Span::raw("Help "),
                key_hint("q", Color::Yellow),
                Span::raw("Quit"),
            ]);
            spans
        }
        Focus::DisplayName => vec![
            Span::raw("Type to edit "),
            key_hint("Enter", Color::Green),
            Span::raw("Create "),
            key_hint("Tab/Esc", Color::Cyan),
            Span::raw("Back to tables"),
        ],
    };

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .alignment(ratatui::layout::Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_tree_keys() {
        let mut browse = BrowseComponent::new(false);
        assert_eq!(browse.handle_key_event(key(KeyCode::Char('j'))).unwrap(), Some(Action::NextItem));
        assert_eq!(browse.handle_key_event(key(KeyCode::Enter)).unwrap(), Some(Action::ActivateRow));
        assert_eq!(
            browse.handle_key_event(key(KeyCode::Char('e'))).unwrap(),
            Some(Action::EditConnection)
        );
        assert_eq!(browse.handle_key_event(key(KeyCode::Char('c'))).unwrap(), None);
    }

    #[test]
    fn test_selector_variant_opens_selector() {
        let mut browse = BrowseComponent::new(true);
        assert_eq!(
            browse.handle_key_event(key(KeyCode::Char('c'))).unwrap(),
            Some(Action::OpenDataSourceSelector)
        );
        assert_eq!(browse.handle_key_event(key(KeyCode::Char('e'))).unwrap(), None);
    }

    #[test]
    fn test_name_focus_turns_letters_into_input() {
        let mut browse = BrowseComponent::new(false);
        browse.toggle_focus();

        assert_eq!(
            browse.handle_key_event(key(KeyCode::Char('q'))).unwrap(),
            Some(Action::NameInput('q'))
        );
        assert_eq!(browse.handle_key_event(key(KeyCode::Enter)).unwrap(), Some(Action::Submit));
        assert_eq!(browse.handle_key_event(key(KeyCode::Esc)).unwrap(), Some(Action::FocusNext));
    }

    #[test]
    fn test_ctrl_s_submits_from_tree() {
        let mut browse = BrowseComponent::new(false);
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(browse.handle_key_event(ctrl_s).unwrap(), Some(Action::Submit));
    }
}
