//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::data::{CellView, Direction, GridBuilder, GridView, ShapeMismatch};
use crate::source::{DataSource, StatusMatrixDocument};
use crate::ui::Theme;

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
///
/// One `App` is built by the host and fed documents from its source. Every
/// document replaces the grid wholesale.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    builder: GridBuilder,
    document: Option<StatusMatrixDocument>,
    pub grid: Option<GridView>,
    pub last_updated: Option<Instant>,
    pub load_error: Option<String>,

    // Cursor
    pub selected_row: usize,
    pub selected_column: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with the given source and grid settings.
    pub fn new(source: Box<dyn DataSource>, builder: GridBuilder) -> Self {
        Self::with_theme(source, builder, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme (skips terminal detection).
    pub fn with_theme(source: Box<dyn DataSource>, builder: GridBuilder, theme: Theme) -> Self {
        Self {
            running: true,
            show_help: false,
            show_detail_overlay: false,
            source,
            builder,
            document: None,
            grid: None,
            last_updated: None,
            load_error: None,
            selected_row: 0,
            selected_column: 0,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    pub fn header_name(&self) -> &str {
        self.builder.header_name()
    }

    pub fn direction(&self) -> Direction {
        self.builder.direction()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Poll the source for a new document and render it.
    ///
    /// Returns `Ok(true)` if a new grid was built, `Ok(false)` if there was
    /// nothing new (or the fetch failed; see `load_error`).
    pub fn reload_data(&mut self) -> Result<bool> {
        if let Some(document) = self.source.poll() {
            self.render(document)?;
            return Ok(true);
        }

        if let Some(err) = self.source.error() {
            self.load_error = Some(err);
        }
        Ok(false)
    }

    /// Build the grid for `document` and make it current.
    ///
    /// On a shape mismatch the previous grid stays on screen and the error
    /// is reported in the status bar.
    pub fn render(&mut self, document: StatusMatrixDocument) -> Result<(), ShapeMismatch> {
        match self.builder.build(&document) {
            Ok(grid) => {
                let (rows, columns) = (grid.row_count(), grid.column_count());
                tracing::info!(
                    rows,
                    columns,
                    direction = self.builder.direction().label(),
                    "rendered matrix"
                );
                self.grid = Some(grid);
                self.document = Some(document);
                self.load_error = None;
                self.last_updated = Some(Instant::now());
                self.clamp_selection(rows, columns);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "rejected matrix document");
                self.load_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn clamp_selection(&mut self, rows: usize, columns: usize) {
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
        self.selected_column = self.selected_column.min(columns.saturating_sub(1));
        if self.selected_cell().is_none() {
            self.show_detail_overlay = false;
        }
    }

    /// Ask the source for a fresh document.
    pub fn request_refresh(&mut self) {
        self.source.refresh();
        self.set_status_message("Refreshing...".to_string());
    }

    /// Switch between forward and reverse measurements and rebuild the grid.
    pub fn toggle_direction(&mut self) {
        let direction = self.builder.direction().toggle();
        self.builder.set_direction(direction);

        if let Some(document) = self.document.take() {
            // Same document, same shape: this cannot fail if it built before
            let _ = self.render(document);
        }
        self.set_status_message(format!("Showing {} direction", direction.label()));
    }

    /// The cell under the cursor, if it holds a measurement.
    pub fn selected_cell(&self) -> Option<&CellView> {
        self.grid.as_ref()?.cell(self.selected_row, self.selected_column)
    }

    /// Hostnames of the row and column under the cursor.
    pub fn selected_hosts(&self) -> Option<(&str, &str)> {
        let grid = self.grid.as_ref()?;
        let row = grid.rows.get(self.selected_row)?;
        let column = grid.column_headers.get(self.selected_column)?;
        Some((row.hostname.as_str(), column.as_str()))
    }

    fn dimensions(&self) -> (usize, usize) {
        self.grid.as_ref().map_or((0, 0), |g| (g.row_count(), g.column_count()))
    }

    /// Move the cursor down by n rows.
    pub fn select_down(&mut self, n: usize) {
        let (rows, _) = self.dimensions();
        self.selected_row = (self.selected_row + n).min(rows.saturating_sub(1));
    }

    /// Move the cursor up by n rows.
    pub fn select_up(&mut self, n: usize) {
        self.selected_row = self.selected_row.saturating_sub(n);
    }

    /// Move the cursor right by n columns.
    pub fn select_right(&mut self, n: usize) {
        let (_, columns) = self.dimensions();
        self.selected_column = (self.selected_column + n).min(columns.saturating_sub(1));
    }

    /// Move the cursor left by n columns.
    pub fn select_left(&mut self, n: usize) {
        self.selected_column = self.selected_column.saturating_sub(n);
    }

    /// Jump to the first column.
    pub fn select_first_column(&mut self) {
        self.selected_column = 0;
    }

    /// Jump to the last column.
    pub fn select_last_column(&mut self) {
        let (_, columns) = self.dimensions();
        self.selected_column = columns.saturating_sub(1);
    }

    /// Toggle the detail popover for the cell under the cursor.
    ///
    /// Empty cells have nothing to show, so the popover stays closed.
    pub fn toggle_detail(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
        } else if self.selected_cell().is_some() {
            self.show_detail_overlay = true;
        } else {
            self.set_status_message("No measurement for this pair".to_string());
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current grid to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref grid) = self.grid else {
            anyhow::bail!("No data to export");
        };
        write_grid(grid, path)
    }
}

/// Write a grid as pretty-printed JSON.
pub fn write_grid(grid: &GridView, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(grid)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "exported matrix");
    Ok(())
}
