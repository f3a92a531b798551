//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Browse screen layout areas
pub struct BrowseLayout {
    pub header: Rect,
    pub tree: Rect,
    pub preview: Rect,
    pub name_field: Rect,
    pub status: Option<Rect>,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate browse screen layout
pub fn calculate_browse_layout(area: Rect, has_status: bool) -> BrowseLayout {
    // Header + content + (optional status) + help bar
    let mut constraints = vec![Constraint::Length(3), Constraint::Min(0)];
    if has_status {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(3));

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    // Tree on the left (40%), preview and name on the right
    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main_chunks[1]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(5)])
        .split(horizontal_chunks[1]);

    let (status, help) = if has_status {
        (Some(main_chunks[2]), main_chunks[3])
    } else {
        (None, main_chunks[2])
    };

    BrowseLayout {
        header: main_chunks[0],
        tree: horizontal_chunks[0],
        preview: right_chunks[0],
        name_field: right_chunks[1],
        status,
        help,
    }
}
