//! Detail overlay rendering.
//!
//! Displays a modal popover with the full measurement behind the selected
//! cell: endpoints, status, message, time and every reported parameter.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::App;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 40;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 12;

/// Render the selected cell's tooltip as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(cell) = app.selected_cell() else {
        return;
    };
    let tooltip = &cell.tooltip;

    // Fall back to the grid's hostnames when the test names no endpoints
    let (row_host, column_host) = app.selected_hosts().unwrap_or_default();
    let source = non_empty(&tooltip.source, row_host);
    let destination = non_empty(&tooltip.destination, column_host);

    let overlay_area = overlay_rect(area);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(7), // Status, message, time
        Constraint::Min(3),    // Parameters
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    // ===== SUMMARY =====
    let summary_lines = vec![
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!(" {} ", cell.label),
                app.theme.severity_style(cell.severity),
            ),
            Span::raw(" "),
            Span::styled(
                tooltip.status_label.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Message: ", Style::default().add_modifier(Modifier::DIM)),
            Span::raw(tooltip.message.clone()),
        ]),
        Line::from(vec![
            Span::styled(" Time:    ", Style::default().add_modifier(Modifier::DIM)),
            Span::raw(tooltip.time.clone()),
        ]),
    ];

    let summary_block = Block::default()
        .title(format!(" {} → {} ", source, destination))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let summary = Paragraph::new(summary_lines)
        .block(summary_block)
        .wrap(Wrap { trim: false });
    frame.render_widget(summary, chunks[0]);

    // ===== PARAMETERS =====
    let params_block = Block::default()
        .title(format!(" Parameters ({}) ", tooltip.parameter_rows.len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if tooltip.parameter_rows.is_empty() {
        let empty = Paragraph::new(" No parameters reported")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(params_block);
        frame.render_widget(empty, chunks[1]);
    } else {
        let key_width = tooltip
            .parameter_rows
            .iter()
            .map(|(k, _)| k.chars().count())
            .max()
            .unwrap_or(0)
            .clamp(8, 32) as u16;

        let header = Row::new(vec![Cell::from("Name"), Cell::from("Value")])
            .style(app.theme.header)
            .bottom_margin(0);

        let rows: Vec<Row> = tooltip
            .parameter_rows
            .iter()
            .map(|(key, value)| Row::new(vec![Cell::from(key.as_str()), Cell::from(value.as_str())]))
            .collect();

        let table = Table::new(rows, [Constraint::Length(key_width + 1), Constraint::Min(10)])
            .header(header)
            .block(params_block);
        frame.render_widget(table, chunks[1]);
    }

    // ===== FOOTER =====
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" Esc", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(": close  "),
        Span::styled("←↑↓→", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(": move  "),
        Span::styled(format!("#{}", cell.id), Style::default().add_modifier(Modifier::DIM)),
    ]));
    frame.render_widget(footer, chunks[2]);
}

/// Centered rect covering 80% of `area`, within the overlay size limits.
fn overlay_rect(area: Rect) -> Rect {
    let width = four_fifths(area.width).clamp(MIN_OVERLAY_WIDTH, 90);
    let height = four_fifths(area.height).clamp(MIN_OVERLAY_HEIGHT, 30);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn four_fifths(n: u16) -> u16 {
    // Widened so large terminals cannot overflow
    (u32::from(n) * 4 / 5) as u16
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
