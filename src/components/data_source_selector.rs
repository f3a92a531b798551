//! Data source selector dialog
//!
//! Lists the connections that already exist in the workspace. Confirming
//! one lists its tables.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::DataSource;
use crate::theme::{key_hint, muted};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Data source selector dialog
pub struct DataSourceSelector {
    pub selected_index: usize,
    pub data_sources: Vec<DataSource>,
    /// Id of the data source the tree currently shows
    pub current_id: Option<String>,
    pub loading: bool,
    pub list_state: ListState,
}

impl Default for DataSourceSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSourceSelector {
    pub fn new() -> Self {
        Self {
            selected_index: 0,
            data_sources: Vec::new(),
            current_id: None,
            loading: true,
            list_state: ListState::default(),
        }
    }

    /// Show a fresh list, keeping the cursor on the current source
    pub fn set_data_sources(&mut self, data_sources: Vec<DataSource>, current_id: Option<&str>) {
        self.current_id = current_id.map(str::to_string);
        self.selected_index = current_id
            .and_then(|id| data_sources.iter().position(|ds| ds.id == id))
            .unwrap_or(0);
        self.data_sources = data_sources;
        self.loading = false;
    }

    pub fn start_loading(&mut self) {
        self.loading = true;
    }

    pub fn selected(&self) -> Option<&DataSource> {
        self.data_sources.get(self.selected_index)
    }

    fn select_next(&mut self) {
        if self.selected_index + 1 < self.data_sources.len() {
            self.selected_index += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }
}

impl Component for DataSourceSelector {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('c') => Some(Action::CloseModal),
            KeyCode::Enter if !self.loading && !self.data_sources.is_empty() => {
                Some(Action::ConfirmModal)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                Some(Action::ModalUp)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                Some(Action::ModalDown)
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < self.data_sources.len() {
                    self.selected_index = index;
                    Some(Action::ConfirmModal)
                } else {
                    None
                }
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_width = 64u16.min(area.width.saturating_sub(4));
        let popup_height = 18u16.min(area.height.saturating_sub(4));
        let popup_area = centered_popup(area, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Choose a connection ")
            .title_style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::Magenta));

        if self.loading || self.data_sources.is_empty() {
            let text = if self.loading {
                "Loading connections..."
            } else {
                "This workspace has no connections yet"
            };
            let message = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(text, muted()))])
                .alignment(ratatui::layout::Alignment::Center)
                .block(block);
            frame.render_widget(message, chunks[0]);
        } else {
            let items: Vec<ListItem> = self
                .data_sources
                .iter()
                .enumerate()
                .map(|(i, ds)| {
                    let is_current = self.current_id.as_deref() == Some(ds.id.as_str());
                    let shortcut = if i < 9 {
                        format!("[{}] ", i + 1)
                    } else {
                        "    ".to_string()
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(shortcut, muted()),
                        Span::styled(
                            if is_current { "● " } else { "  " },
                            Style::default().fg(Color::Green),
                        ),
                        Span::raw(ds.name.as_str()),
                        Span::styled(format!("  {}", ds.kind), muted()),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");

            self.list_state.select(Some(self.selected_index));
            frame.render_stateful_widget(list, chunks[0], &mut self.list_state);
        }

        let help = Paragraph::new(Line::from(vec![
            key_hint("Enter", Color::Yellow),
            Span::raw("Select  "),
            key_hint("j/k", Color::Cyan),
            Span::raw("Navigate  "),
            key_hint("Esc", Color::Yellow),
            Span::raw("Cancel"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WarehouseKind;
    use crossterm::event::KeyModifiers;

    fn sources() -> Vec<DataSource> {
        ["Prod", "Staging", "Sandbox"]
            .iter()
            .enumerate()
            .map(|(i, name)| DataSource {
                id: format!("ds_{}", i + 1),
                name: name.to_string(),
                kind: WarehouseKind::Snowflake,
            })
            .collect()
    }

    #[test]
    fn test_cursor_starts_on_current_source() {
        let mut selector = DataSourceSelector::new();
        selector.set_data_sources(sources(), Some("ds_2"));
        assert_eq!(selector.selected().map(|ds| ds.name.as_str()), Some("Staging"));
        assert!(!selector.loading);
    }

    #[test]
    fn test_enter_ignored_while_loading() {
        let mut selector = DataSourceSelector::new();
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(selector.handle_key_event(enter).unwrap(), None);

        selector.set_data_sources(sources(), None);
        assert_eq!(
            selector.handle_key_event(enter).unwrap(),
            Some(Action::ConfirmModal)
        );
    }

    #[test]
    fn test_number_shortcut_selects_and_confirms() {
        let mut selector = DataSourceSelector::new();
        selector.set_data_sources(sources(), None);

        let action = selector
            .handle_key_event(KeyEvent::new(KeyCode::Char('3'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(action, Some(Action::ConfirmModal));
        assert_eq!(selector.selected().map(|ds| ds.id.as_str()), Some("ds_3"));

        let none = selector
            .handle_key_event(KeyEvent::new(KeyCode::Char('7'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(none, None);
    }
}
