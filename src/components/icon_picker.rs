//! Icon picker dialog
//!
//! Overrides the suggested icon. Arrow keys move through the icon catalog,
//! `c` cycles the accent color.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::icon::{Icon, ICON_CATALOG};
use crate::theme::{hex_to_color, key_hint, ICON_PALETTE};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const COLUMNS: usize = 4;

#[derive(Debug, Default)]
pub struct IconPicker {
    pub selected_index: usize,
    pub color_index: usize,
}

impl IconPicker {
    /// Start from the icon and color currently shown
    pub fn open_at(&mut self, icon: &Icon, color: &str) {
        self.selected_index = ICON_CATALOG
            .iter()
            .position(|i| i.name == icon.name)
            .unwrap_or(0);
        self.color_index = ICON_PALETTE.iter().position(|c| *c == color).unwrap_or(0);
    }

    pub fn selected(&self) -> (&'static Icon, &'static str) {
        let icon = &ICON_CATALOG[self.selected_index.min(ICON_CATALOG.len() - 1)];
        (icon, ICON_PALETTE[self.color_index % ICON_PALETTE.len()])
    }

    fn move_by(&mut self, delta: isize) {
        let last = ICON_CATALOG.len() as isize - 1;
        self.selected_index = (self.selected_index as isize + delta).clamp(0, last) as usize;
    }

    fn cycle_color(&mut self) {
        self.color_index = (self.color_index + 1) % ICON_PALETTE.len();
    }
}

impl Component for IconPicker {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('i') => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::ConfirmModal),
            KeyCode::Left | KeyCode::Char('h') => {
                self.move_by(-1);
                Some(Action::ModalUp)
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.move_by(1);
                Some(Action::ModalDown)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_by(-(COLUMNS as isize));
                Some(Action::ModalUp)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_by(COLUMNS as isize);
                Some(Action::ModalDown)
            }
            KeyCode::Char('c') => {
                self.cycle_color();
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let rows = ICON_CATALOG.len().div_ceil(COLUMNS) as u16;
        let popup_area = centered_popup(area, 76, rows + 7);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(popup_area);

        let (_, color_hex) = self.selected();
        let accent = hex_to_color(color_hex).unwrap_or(Color::Blue);

        let mut lines = vec![Line::from("")];
        for (row, chunk) in ICON_CATALOG.chunks(COLUMNS).enumerate() {
            let spans: Vec<Span> = chunk
                .iter()
                .enumerate()
                .map(|(col, icon)| {
                    let index = row * COLUMNS + col;
                    let style = if index == self.selected_index {
                        Style::default()
                            .fg(Color::Black)
                            .bg(accent)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(accent)
                    };
                    Span::styled(format!(" {} {:<14}", icon.glyph, icon.name), style)
                })
                .collect();
            lines.push(Line::from(spans));
        }

        let picker = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Choose an icon ")
                .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
                .border_style(Style::default().fg(accent)),
        );
        frame.render_widget(picker, chunks[0]);

        let help = Paragraph::new(Line::from(vec![
            key_hint("Enter", Color::Yellow),
            Span::raw("Use icon  "),
            key_hint("←↑↓→", Color::Cyan),
            Span::raw("Move  "),
            key_hint("c", Color::Cyan),
            Span::raw("Color  "),
            key_hint("Esc", Color::Yellow),
            Span::raw("Cancel"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}
