//! Catalog tree - database → schema → table picker
//!
//! The tree is flattened into the rows currently visible under the
//! expansion state; the cursor indexes into that list.

use crate::model::{Catalog, CatalogStatus, ImportWorkflow, NestedCatalog, SelectionState, WorkflowEffect};
use crate::theme::{format_count, muted};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Visible Rows
// ═══════════════════════════════════════════════════════════════════════════════

/// One visible line of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeRow {
    Database {
        name: String,
        expanded: bool,
    },
    Schema {
        database: String,
        name: String,
        expanded: bool,
    },
    Table {
        database: String,
        schema: String,
        name: String,
        selected: bool,
    },
}

/// Rows visible under the current expansion state, in catalog order
pub fn visible_rows(catalog: &NestedCatalog, selection: &SelectionState) -> Vec<TreeRow> {
    let mut rows = Vec::new();

    for (database, schemas) in catalog.databases() {
        let db_expanded = selection.is_database_expanded(database);
        rows.push(TreeRow::Database {
            name: database.to_string(),
            expanded: db_expanded,
        });
        if !db_expanded {
            continue;
        }

        for (schema, tables) in schemas {
            let schema_expanded = selection.is_schema_expanded(database, schema);
            rows.push(TreeRow::Schema {
                database: database.to_string(),
                name: schema.clone(),
                expanded: schema_expanded,
            });
            if !schema_expanded {
                continue;
            }

            for table in tables {
                rows.push(TreeRow::Table {
                    database: database.to_string(),
                    schema: schema.clone(),
                    name: table.clone(),
                    selected: selection.is_table_selected(database, schema, table),
                });
            }
        }
    }

    rows
}

// ═══════════════════════════════════════════════════════════════════════════════
// Cursor
// ═══════════════════════════════════════════════════════════════════════════════

/// Cursor over the visible rows
#[derive(Debug, Default)]
pub struct CatalogTree {
    pub cursor: usize,
    pub list_state: ListState,
}

impl CatalogTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, row_count: usize) {
        if self.cursor + 1 < row_count {
            self.cursor += 1;
        }
    }

    pub fn previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn first(&mut self) {
        self.cursor = 0;
    }

    pub fn last(&mut self, row_count: usize) {
        self.cursor = row_count.saturating_sub(1);
    }

    /// Keep the cursor on a row after the tree shrank
    pub fn clamp(&mut self, row_count: usize) {
        if self.cursor >= row_count {
            self.cursor = row_count.saturating_sub(1);
        }
    }

    /// Put the cursor on the selected table, if it is visible
    pub fn focus_selected(&mut self, rows: &[TreeRow]) {
        if let Some(index) = rows
            .iter()
            .position(|row| matches!(row, TreeRow::Table { selected: true, .. }))
        {
            self.cursor = index;
        }
    }

    /// Apply Enter/Space on the row under the cursor
    pub fn activate(&mut self, workflow: &mut ImportWorkflow) -> Option<WorkflowEffect> {
        let catalog = workflow.catalog.as_ref()?;
        let rows = visible_rows(&catalog.nested, &workflow.selection);

        let effect = match rows.get(self.cursor)? {
            TreeRow::Database { name, .. } => {
                workflow.toggle_database(name);
                None
            }
            TreeRow::Schema { database, name, .. } => {
                workflow.toggle_schema(database, name);
                None
            }
            TreeRow::Table {
                database,
                schema,
                name,
                ..
            } => workflow.click_table(database, schema, name),
        };

        let row_count = workflow
            .catalog
            .as_ref()
            .map(|c| visible_rows(&c.nested, &workflow.selection).len())
            .unwrap_or(0);
        self.clamp(row_count);
        effect
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════════════════

fn row_line<'a>(row: &'a TreeRow, row_count: Option<u64>) -> Line<'a> {
    match row {
        TreeRow::Database { name, expanded } => Line::from(vec![
            Span::styled(
                if *expanded { "▾ " } else { "▸ " },
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                name.as_str(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]),
        TreeRow::Schema { name, expanded, .. } => Line::from(vec![
            Span::raw("  "),
            Span::styled(
                if *expanded { "▾ " } else { "▸ " },
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(name.as_str(), Style::default().fg(Color::Magenta)),
        ]),
        TreeRow::Table { name, selected, .. } => {
            let (marker, style) = if *selected {
                (
                    "● ",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default().fg(Color::White))
            };
            let mut spans = vec![
                Span::raw("    "),
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(name.as_str(), style),
            ];
            if let Some(count) = row_count {
                spans.push(Span::styled(format!("  {}", format_count(count)), muted()));
            }
            Line::from(spans)
        }
    }
}

fn tree_title(catalog: &Catalog) -> String {
    match catalog.empty_databases().count() {
        0 => format!(" Tables ({}) ", catalog.table_count()),
        1 => format!(" Tables ({}, 1 empty database) ", catalog.table_count()),
        n => format!(" Tables ({}, {} empty databases) ", catalog.table_count(), n),
    }
}

pub fn render_tree(
    frame: &mut Frame,
    area: Rect,
    tree: &mut CatalogTree,
    workflow: &ImportWorkflow,
    focused: bool,
) {
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let Some(catalog) = workflow.catalog.as_ref() else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Tables ")
            .border_style(Style::default().fg(border_color));
        let text = match &workflow.catalog_status {
            CatalogStatus::Loading => "Loading tables...",
            CatalogStatus::Failed(_) => "Could not list tables",
            _ if workflow.capabilities.with_data_source_selector => {
                "Press c to choose a connection"
            }
            _ => "Nothing loaded yet",
        };
        frame.render_widget(Paragraph::new(Span::styled(text, muted())).block(block), area);
        return;
    };

    let rows = visible_rows(&catalog.nested, &workflow.selection);
    tree.clamp(rows.len());

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let count = match row {
                TreeRow::Table {
                    database,
                    schema,
                    name,
                    ..
                } => catalog.row_count(database, schema, name),
                _ => None,
            };
            ListItem::new(row_line(row, count))
        })
        .collect();

    let title = tree_title(catalog);
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_style(Style::default().fg(Color::Cyan))
                .border_style(Style::default().fg(border_color)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▶");

    tree.list_state
        .select(if rows.is_empty() { None } else { Some(tree.cursor) });
    frame.render_stateful_widget(list, area, &mut tree.list_state);
}
