//! Common UI components shared across views.
//!
//! This module contains the header bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::Severity;

/// Render the header bar with the matrix overview.
///
/// Displays: worst severity indicator, cell counts per tier, direction, source.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref grid) = app.grid else {
        let line = Line::from(vec![
            Span::styled(
                " PERFSONAR MATRIX ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("| Loading {}...", app.source_description())),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let counts = grid.severity_counts();

    // Worst tier present drives the overall indicator
    let worst = [Severity::Error, Severity::Warning, Severity::Success]
        .into_iter()
        .find(|s| counts.get(*s) > 0)
        .unwrap_or(Severity::Unknown);

    let count_span = |severity: Severity| {
        let n = counts.get(severity);
        if n > 0 {
            Span::styled(n.to_string(), app.theme.severity_style(severity))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        }
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", worst.symbol()), app.theme.severity_style(worst)),
        Span::styled("PERFSONAR ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        count_span(Severity::Success),
        Span::raw(" ok "),
        count_span(Severity::Warning),
        Span::raw(" warn "),
        count_span(Severity::Error),
        Span::raw(" err "),
        Span::raw(format!(
            "{} other {} empty │ ",
            counts.timeout + counts.unknown,
            counts.empty
        )),
        Span::styled(
            format!("{}×{}", grid.row_count(), grid.column_count()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " {} │ {}",
            app.direction().label(),
            app.source_description()
        )),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// Shows time since last update and the available controls, or the
/// current error. Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.show_detail_overlay {
        "←↑↓→:move Esc:close ?:help q:quit"
    } else {
        "←↑↓→:move Enter:detail d:direction r:refresh e:export ?:help q:quit"
    };

    let status = match (&app.load_error, app.last_updated) {
        (Some(err), Some(_)) => format!(" Error: {} (showing previous data) | {}", err, controls),
        (Some(err), None) => format!(" Error: {} | q:quit r:retry", err),
        (None, Some(updated)) => format!(
            " Updated {:.1}s ago | {}",
            updated.elapsed().as_secs_f64(),
            controls
        ),
        (None, None) => " Loading... | q:quit".to_string(),
    };

    let style = if app.load_error.is_some() {
        Style::default().fg(app.theme.error)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    frame.render_widget(Paragraph::new(status).style(style), area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the matrix.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ↑/↓ k/j     Move between sources"),
        Line::from("  ←/→ h/l     Move between destinations"),
        Line::from("  PgUp/PgDn   Jump 10 rows"),
        Line::from("  Home/End    First/last destination"),
        Line::from("  Enter       Measurement detail"),
        Line::from("  Esc         Close overlay"),
        Line::from(""),
        section(" Matrix"),
        Line::from("  d           Toggle direction"),
        Line::from("  r           Refresh now"),
        Line::from("  e           Export to JSON"),
        Line::from(""),
        section(" Mouse"),
        Line::from("  Click       Select cell"),
        Line::from("  Click again Open detail"),
        Line::from("  Right click Close overlay"),
        Line::from(""),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
