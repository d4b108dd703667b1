//! Matrix view rendering.
//!
//! Draws the source × destination grid with one colored label per measured
//! pair, plus a panel describing the cell under the cursor.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::truncate;
use crate::app::App;
use crate::data::{GridView, Severity};

const MIN_COLUMN_WIDTH: usize = 8;
const MAX_COLUMN_WIDTH: usize = 14;
const MIN_ROW_HEADER_WIDTH: usize = 10;
const MAX_ROW_HEADER_WIDTH: usize = 28;

/// Render the matrix panel and the selection panel below it.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Min(5),    // Matrix
        Constraint::Length(5), // Selection + legend
    ])
    .split(area);

    let Some(ref grid) = app.grid else {
        let block = Block::default()
            .title(" Matrix ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        let message = match app.load_error {
            Some(ref err) => format!("Failed to load matrix: {}", err),
            None => format!("Loading from {}...", app.source_description()),
        };
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    };

    render_matrix(frame, app, grid, chunks[0]);
    render_selection(frame, app, chunks[1]);
}

/// Where the visible part of the grid sits on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Inner area of the matrix block.
    pub inner: Rect,
    pub row_header_width: usize,
    pub column_width: usize,
    pub first_row: usize,
    pub last_row: usize,
    pub first_column: usize,
    pub last_column: usize,
}

impl Viewport {
    /// Lay out `grid` inside the bordered block at `area`, keeping the
    /// cursor in view.
    pub fn compute(app: &App, grid: &GridView, area: Rect) -> Self {
        let inner = Rect::new(
            area.x.saturating_add(1),
            area.y.saturating_add(1),
            area.width.saturating_sub(2),
            area.height.saturating_sub(2),
        );

        let row_header_width = row_header_width(grid);
        let column_width = column_width(grid);

        // Header line and separator take two lines
        let visible_rows = (inner.height as usize).saturating_sub(2);
        let visible_columns =
            ((inner.width as usize).saturating_sub(row_header_width + 1) / column_width).max(1);

        let first_row = window_start(app.selected_row, visible_rows, grid.row_count());
        let first_column =
            window_start(app.selected_column, visible_columns, grid.column_count());

        Self {
            inner,
            row_header_width,
            column_width,
            first_row,
            last_row: (first_row + visible_rows).min(grid.row_count()),
            first_column,
            last_column: (first_column + visible_columns).min(grid.column_count()),
        }
    }

    /// Grid coordinates of the cell drawn at screen position (x, y).
    pub fn hit_test(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        let body_top = self.inner.y.checked_add(2)?;
        if y < body_top || x < self.inner.x {
            return None;
        }
        let row = self.first_row + (y - body_top) as usize;

        let offset = (x - self.inner.x) as usize;
        let cells_left = self.row_header_width + 1;
        if offset < cells_left {
            return None;
        }
        let column = self.first_column + (offset - cells_left) / self.column_width;

        (row < self.last_row && column < self.last_column).then_some((row, column))
    }
}

/// The matrix block's area within the region handed to [`render`].
pub fn matrix_area(area: Rect) -> Rect {
    Layout::vertical([Constraint::Min(5), Constraint::Length(5)]).split(area)[0]
}

fn render_matrix(frame: &mut Frame, app: &App, grid: &GridView, area: Rect) {
    let view = Viewport::compute(app, grid, area);
    let row_header_w = view.row_header_width;
    let col_w = view.column_width;
    let (first_row, last_row) = (view.first_row, view.last_row);
    let (first_col, last_col) = (view.first_column, view.last_column);

    let border = Style::default().fg(app.theme.border);
    let mut lines: Vec<Line> = Vec::with_capacity(last_row - first_row + 2);

    // Column headers
    let mut header: Vec<Span> = vec![
        Span::styled(
            format!("{:<w$}", truncate(&grid.header_name, row_header_w), w = row_header_w),
            app.theme.header,
        ),
        Span::styled("│", border),
    ];
    for (c, name) in grid.column_headers.iter().enumerate().take(last_col).skip(first_col) {
        let style = if c == app.selected_column {
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        header.push(Span::styled(
            format!("{:^w$}", truncate(name, col_w - 1), w = col_w),
            style,
        ));
    }
    lines.push(Line::from(header));

    lines.push(Line::from(Span::styled(
        format!(
            "{:─<rw$}┼{:─<mw$}",
            "",
            "",
            rw = row_header_w,
            mw = col_w * (last_col - first_col)
        ),
        border,
    )));

    // Body rows
    for (r, row) in grid.rows.iter().enumerate().take(last_row).skip(first_row) {
        let row_selected = r == app.selected_row;
        let row_style = if row_selected {
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let mut spans: Vec<Span> = vec![
            Span::styled(
                format!("{:>w$}", truncate(&row.hostname, row_header_w - 1), w = row_header_w),
                row_style,
            ),
            Span::styled("│", border),
        ];

        for (c, cell) in row.cells.iter().enumerate().take(last_col).skip(first_col) {
            let selected = row_selected && c == app.selected_column;
            let (text, style) = match cell {
                Some(cell) => (
                    truncate(&cell.label, col_w - 1),
                    app.theme.severity_style(cell.severity),
                ),
                None if selected => ("·".to_string(), Style::default()),
                None => (String::new(), Style::default()),
            };
            let style = if selected {
                style.patch(app.theme.selected)
            } else {
                style
            };
            spans.push(Span::styled(format!("{:^w$}", text, w = col_w), style));
        }

        lines.push(Line::from(spans));
    }

    let mut title = format!(
        " Matrix {}×{} [{}] ",
        grid.row_count(),
        grid.column_count(),
        app.direction().label()
    );
    if last_row - first_row < grid.row_count() || last_col - first_col < grid.column_count() {
        title.push_str(&format!(
            "rows {}-{} cols {}-{} ",
            first_row + 1,
            last_row,
            first_col + 1,
            last_col
        ));
    }

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_selection(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some((source, destination)) = app.selected_hosts() {
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", source), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("→ "),
            Span::styled(destination.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        ]));
    }

    match app.selected_cell() {
        Some(cell) => lines.push(Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!(" {} ", cell.label),
                app.theme.severity_style(cell.severity),
            ),
            Span::raw(format!(" {}", cell.tooltip.status_label)),
            Span::styled("   Enter: details", Style::default().add_modifier(Modifier::DIM)),
        ])),
        None => lines.push(Line::from(Span::styled(
            "   (no measurement)",
            Style::default().add_modifier(Modifier::DIM),
        ))),
    }

    let mut legend = vec![Span::styled(" Legend: ", Style::default().add_modifier(Modifier::BOLD))];
    for (severity, name) in [
        (Severity::Success, "ok"),
        (Severity::Warning, "warning"),
        (Severity::Error, "error"),
        (Severity::Timeout, "timeout/unknown"),
    ] {
        legend.push(Span::styled(
            format!(" {} ", severity.symbol()),
            app.theme.severity_style(severity),
        ));
        legend.push(Span::raw(format!(" {}  ", name)));
    }
    lines.push(Line::from(legend));

    let block = Block::default()
        .title(" Selection ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn row_header_width(grid: &GridView) -> usize {
    grid.rows
        .iter()
        .map(|r| r.hostname.chars().count())
        .chain(std::iter::once(grid.header_name.chars().count()))
        .max()
        .unwrap_or(0)
        .saturating_add(1)
        .clamp(MIN_ROW_HEADER_WIDTH, MAX_ROW_HEADER_WIDTH)
}

fn column_width(grid: &GridView) -> usize {
    grid.rows
        .iter()
        .flat_map(|r| r.cells.iter().flatten())
        .map(|c| c.label.chars().count())
        .max()
        .unwrap_or(0)
        .saturating_add(2)
        .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
}

/// First index of a `visible`-wide window over `total` items that keeps
/// `selected` in view.
pub fn window_start(selected: usize, visible: usize, total: usize) -> usize {
    if visible == 0 || total <= visible {
        return 0;
    }
    let selected = selected.min(total - 1);
    if selected < visible {
        0
    } else {
        selected + 1 - visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RowView;

    #[test]
    fn test_window_start_fits() {
        assert_eq!(window_start(3, 10, 5), 0);
        assert_eq!(window_start(0, 0, 5), 0);
    }

    #[test]
    fn test_window_start_scrolls_to_cursor() {
        assert_eq!(window_start(4, 5, 20), 0);
        assert_eq!(window_start(5, 5, 20), 1);
        assert_eq!(window_start(19, 5, 20), 15);
        assert_eq!(window_start(50, 5, 20), 15);
    }

    fn grid(rows: usize, columns: usize) -> GridView {
        GridView {
            header_name: "Host".to_string(),
            column_headers: (0..columns).map(|c| format!("dst-{}", c)).collect(),
            rows: (0..rows)
                .map(|r| RowView {
                    hostname: format!("src-{}", r),
                    cells: vec![None; columns],
                })
                .collect(),
        }
    }

    fn app_for(grid: GridView) -> App {
        let mut app = App::with_theme(
            Box::new(crate::source::FileSource::new("unused.json")),
            crate::data::GridBuilder::new("Host"),
            crate::ui::Theme::dark(),
        );
        app.grid = Some(grid);
        app
    }

    #[test]
    fn test_viewport_hit_test() {
        let grid = grid(3, 3);
        let app = app_for(grid.clone());
        // 10 wide row header + separator, 8 wide columns
        let view = Viewport::compute(&app, &grid, Rect::new(0, 1, 60, 12));
        assert_eq!((view.row_header_width, view.column_width), (10, 8));
        assert_eq!((view.last_row, view.last_column), (3, 3));

        // Body starts below border, header line and separator
        assert_eq!(view.hit_test(12, 4), Some((0, 0)));
        assert_eq!(view.hit_test(20, 5), Some((1, 1)));
        assert_eq!(view.hit_test(5, 5), None);
        assert_eq!(view.hit_test(12, 3), None);
        assert_eq!(view.hit_test(12, 7), None);
    }

    #[test]
    fn test_viewport_follows_cursor() {
        let grid = grid(20, 2);
        let mut app = app_for(grid.clone());
        app.selected_row = 19;
        // Six inner lines leave four body rows
        let view = Viewport::compute(&app, &grid, Rect::new(0, 0, 60, 8));
        assert_eq!((view.first_row, view.last_row), (16, 20));
        assert_eq!(view.hit_test(12, 3), Some((16, 0)));
    }

    #[test]
    fn test_column_width_bounds() {
        let grid = GridView {
            header_name: "Host".to_string(),
            column_headers: vec![],
            rows: vec![],
        };
        assert_eq!(column_width(&grid), MIN_COLUMN_WIDTH);
        assert_eq!(row_header_width(&grid), MIN_ROW_HEADER_WIDTH);
    }
}
