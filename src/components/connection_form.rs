//! Connection form component
//!
//! Credentials for a new warehouse connection, entered field by field.
//! Finishing the last field asks the app to list the tables the
//! credentials can see.

use crate::action::Action;
use crate::component::Component;
use crate::model::{ConnectionDraft, WarehouseKind};
use crate::theme::{error_style, key_hint, muted, title_style};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// One input of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Kind,
    Name,
    Host,
    Port,
    Username,
    Password,
    Database,
    Warehouse,
}

impl FormField {
    /// Fields shown for a warehouse kind, in order
    pub fn visible(kind: WarehouseKind) -> Vec<FormField> {
        let mut fields = vec![
            FormField::Kind,
            FormField::Name,
            FormField::Host,
            FormField::Port,
            FormField::Username,
            FormField::Password,
            FormField::Database,
        ];
        if kind.uses_warehouse() {
            fields.push(FormField::Warehouse);
        }
        fields
    }

    fn label(&self, kind: WarehouseKind) -> &'static str {
        match self {
            FormField::Kind => "Warehouse",
            FormField::Name => "Connection name",
            FormField::Host => kind.host_label(),
            FormField::Port => "Port",
            FormField::Username => "Username",
            FormField::Password => "Password",
            FormField::Database => "Database",
            FormField::Warehouse => "Compute warehouse",
        }
    }
}

/// Connection form component
#[derive(Default)]
pub struct ConnectionForm {
    pub kind: WarehouseKind,
    pub name: String,
    pub host: String,
    pub port: String,
    pub username: String,
    pub password: String,
    pub database: String,
    pub warehouse: String,
    /// Index into the visible fields
    pub field_index: usize,
    /// Error message to display
    pub error: Option<String>,
}

impl ConnectionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_field(&self) -> FormField {
        let fields = FormField::visible(self.kind);
        fields
            .get(self.field_index)
            .copied()
            .unwrap_or(FormField::Kind)
    }

    fn input_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Kind => None,
            FormField::Name => Some(&mut self.name),
            FormField::Host => Some(&mut self.host),
            FormField::Port => Some(&mut self.port),
            FormField::Username => Some(&mut self.username),
            FormField::Password => Some(&mut self.password),
            FormField::Database => Some(&mut self.database),
            FormField::Warehouse => Some(&mut self.warehouse),
        }
    }

    fn value(&self, field: FormField) -> String {
        match field {
            FormField::Kind => self.kind.name().to_string(),
            FormField::Name => self.name.clone(),
            FormField::Host => self.host.clone(),
            FormField::Port => self.port.clone(),
            FormField::Username => self.username.clone(),
            FormField::Password => "•".repeat(self.password.chars().count()),
            FormField::Database => self.database.clone(),
            FormField::Warehouse => self.warehouse.clone(),
        }
    }

    pub fn next_field(&mut self) {
        let count = FormField::visible(self.kind).len();
        if self.field_index + 1 < count {
            self.field_index += 1;
        }
    }

    pub fn prev_field(&mut self) {
        self.field_index = self.field_index.saturating_sub(1);
    }

    fn is_last_field(&self) -> bool {
        self.field_index + 1 >= FormField::visible(self.kind).len()
    }

    pub fn cycle_kind(&mut self) {
        self.kind = self.kind.next();
        self.port = self
            .kind
            .default_port()
            .map(|p| p.to_string())
            .unwrap_or_default();
        let count = FormField::visible(self.kind).len();
        if self.field_index >= count {
            self.field_index = count - 1;
        }
    }

    pub fn input(&mut self, c: char) {
        let field = self.current_field();
        if field == FormField::Port && !c.is_ascii_digit() {
            return;
        }
        if let Some(input) = self.input_mut(field) {
            input.push(c);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        let field = self.current_field();
        if let Some(input) = self.input_mut(field) {
            input.pop();
            self.error = None;
        }
    }

    /// Check the form and build the draft, recording the problem on failure
    pub fn to_draft(&mut self) -> Option<ConnectionDraft> {
        match self.build_draft() {
            Ok(draft) => {
                self.error = None;
                Some(draft)
            }
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    fn build_draft(&self) -> Result<ConnectionDraft, String> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(format!("{} is required", self.kind.host_label()));
        }
        if self.username.trim().is_empty() {
            return Err("Username is required".to_string());
        }

        let port = if self.port.is_empty() {
            self.kind.default_port()
        } else {
            Some(
                self.port
                    .parse::<u16>()
                    .map_err(|_| format!("Port must be between 1 and 65535, got {}", self.port))?,
            )
        };

        let optional = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        Ok(ConnectionDraft {
            kind: self.kind,
            name: self.name.trim().to_string(),
            host: host.to_string(),
            port,
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            database: optional(&self.database),
            warehouse: if self.kind.uses_warehouse() {
                optional(&self.warehouse)
            } else {
                None
            },
        })
    }

    /// Refill the form from an earlier draft
    pub fn load(&mut self, draft: &ConnectionDraft) {
        *self = Self {
            kind: draft.kind,
            name: draft.name.clone(),
            host: draft.host.clone(),
            port: draft.port.map(|p| p.to_string()).unwrap_or_default(),
            username: draft.username.clone(),
            password: draft.password.clone(),
            database: draft.database.clone().unwrap_or_default(),
            warehouse: draft.warehouse.clone().unwrap_or_default(),
            field_index: 0,
            error: None,
        };
    }
}

impl Component for ConnectionForm {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::OpenQuitDialog),
            KeyCode::Tab | KeyCode::Down => {
                self.next_field();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.prev_field();
                None
            }
            KeyCode::Enter if self.is_last_field() => Some(Action::TestConnection),
            KeyCode::Enter => {
                self.next_field();
                None
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                if self.current_field() == FormField::Kind =>
            {
                self.cycle_kind();
                None
            }
            KeyCode::Backspace => {
                self.backspace();
                None
            }
            KeyCode::Char(c) => {
                self.input(c);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        frame.render_widget(Clear, area);

        let margin = 2;
        let content_area = Rect::new(
            area.x + margin,
            area.y + 1,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(2),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(10),   // Fields
                Constraint::Length(3), // Help
            ])
            .split(content_area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(" New connection ", title_style(Color::Cyan)),
            Span::styled(
                "  credentials are only sent to list tables and create the connection",
                muted(),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let current = self.current_field();
        let mut lines = vec![Line::from("")];
        for field in FormField::visible(self.kind) {
            let is_current = field == current;
            let label_style = if is_current {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let value = if field == FormField::Kind {
                format!("◂ {} ▸", self.value(field))
            } else if is_current {
                format!("{}_", self.value(field))
            } else {
                self.value(field)
            };
            lines.push(Line::from(vec![
                Span::styled(if is_current { "▶ " } else { "  " }, label_style),
                Span::styled(format!("{:<20}", field.label(self.kind)), label_style),
                Span::styled(value, Style::default().fg(Color::White)),
            ]));
        }

        if let Some(ref error) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(format!("  Error: {}", error), error_style())));
        }

        let fields = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Connection ")
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(fields, chunks[1]);

        let help = Paragraph::new(Line::from(vec![
            key_hint("Tab/↓", Color::Cyan),
            Span::raw("Next field  "),
            key_hint("Space", Color::Cyan),
            Span::raw("Change warehouse  "),
            key_hint("Enter", Color::Yellow),
            Span::raw("Continue  "),
            key_hint("Esc", Color::Yellow),
            Span::raw("Quit"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);

        Ok(())
    }
}
