//! Error dialog for failed remote calls

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::theme::{key_hint, title_style};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Default)]
pub struct ErrorDialog {
    pub title: String,
    pub message: String,
}

impl ErrorDialog {
    pub fn show(&mut self, title: &str, message: &str) {
        self.title = title.to_string();
        self.message = message.to_string();
    }
}

impl Component for ErrorDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let width = 70u16.min(area.width.saturating_sub(4));
        // Rough line estimate for wrapped text, plus borders and footer
        let inner_width = width.saturating_sub(4).max(1) as usize;
        let text_lines: usize = self
            .message
            .lines()
            .map(|l| l.chars().count() / inner_width + 1)
            .sum();
        let height = (text_lines as u16 + 5).min(area.height.saturating_sub(2));
        let popup_area = centered_popup(area, width, height);

        frame.render_widget(Clear, popup_area);

        let mut lines: Vec<Line> = vec![Line::from("")];
        lines.extend(
            self.message
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::White)))),
        );
        lines.push(Line::from(""));
        lines.push(Line::from(vec![key_hint("Enter/Esc", Color::Yellow), Span::raw("Close")]));

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(format!(" {} ", self.title))
                    .title_style(title_style(Color::Red)),
            );

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}
