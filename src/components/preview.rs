//! Preview panel and display name field for the selected table

use crate::model::catalog::outer_path;
use crate::model::ImportWorkflow;
use crate::theme::{error_style, format_count, hex_to_color, muted, DEFAULT_ICON_COLOR};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Text of the preview panel. `tick` drives the loading spinner.
pub fn preview_lines(workflow: &ImportWorkflow, tick: usize) -> Vec<Line<'static>> {
    let Some(table_id) = workflow.selection.selected_table_id.as_deref() else {
        return vec![
            Line::from(""),
            Line::from(Span::styled("No table selected", muted())),
        ];
    };

    let icon = &workflow.icon;
    let color = hex_to_color(icon.color)
        .or_else(|| hex_to_color(DEFAULT_ICON_COLOR))
        .unwrap_or(Color::Blue);

    let icon_span = if icon.is_loading {
        Span::styled(
            SPINNER[tick % SPINNER.len()].to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(
            icon.icon.glyph.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
    };

    let icon_label = if icon.is_loading {
        Span::styled("  suggesting icon...", muted())
    } else {
        Span::styled(format!("  {}", icon.icon.name), Style::default().fg(color))
    };

    let rows = match workflow.selection.selected_row_count {
        Some(count) => format!("{} rows", format_count(count)),
        None => "row count unknown".to_string(),
    };

    vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            icon_span,
            icon_label,
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  table   ", muted()),
            Span::styled(
                table_id.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("  in      ", muted()),
            Span::styled(outer_path(table_id).to_string(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("  size    ", muted()),
            Span::raw(rows),
        ]),
    ]
}

pub fn render_preview(frame: &mut Frame, area: Rect, workflow: &ImportWorkflow, tick: usize) {
    let paragraph = Paragraph::new(preview_lines(workflow, tick))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Preview ")
                .title_style(Style::default().fg(Color::Cyan))
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Longest suffix of `text` that fits in `max_width` terminal columns
fn visible_tail(text: &str, max_width: usize) -> &str {
    if text.width() <= max_width {
        return text;
    }
    let mut used = 0;
    let mut start = text.len();
    for (index, c) in text.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > max_width {
            break;
        }
        start = index;
    }
    &text[start..]
}

pub fn render_name_field(frame: &mut Frame, area: Rect, workflow: &ImportWorkflow, focused: bool) {
    let draft = &workflow.draft;
    let cursor = if focused { "_" } else { "" };
    // borders, prompt and cursor
    let room = (area.width as usize).saturating_sub(2 + 2 + cursor.width());

    let mut lines = vec![Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("{}{}", visible_tail(&draft.display_name, room), cursor),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ])];

    if let Some(error) = &draft.display_name_error {
        lines.push(Line::from(Span::styled(error.clone(), error_style())));
    }

    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Display name ")
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(paragraph, area);
}
