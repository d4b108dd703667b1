//! # perfsonar-matrix
//!
//! A terminal viewer and library for perfSONAR status matrices.
//!
//! A status matrix document lists source hosts (rows), destination hosts
//! (columns) and, for every pair, the latest measurement in each direction.
//! This crate fetches such documents, turns them into a grid of short
//! colored labels and shows the grid in an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(grid view)    │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── HttpSource | FileSource                     │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: Wire types ([`StatusMatrixDocument`]) and the [`DataSource`]
//!   trait with HTTP and file implementations
//! - **[`data`]**: Pure view-model construction: status classification,
//!   average formatting and grid assembly ([`GridBuilder`], [`GridView`])
//! - **[`app`]**: Cursor, overlays, refresh and export
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Layered [`Settings`] from defaults, file, environment and flags
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a live matrix
//! perfsonar-matrix --url https://ps.example.org/matrix?id=42
//!
//! # Write the grid for a saved document to JSON and exit
//! perfsonar-matrix --file matrix.json --export grid.json
//! ```
//!
//! ### Building a grid without the UI
//!
//! ```
//! use perfsonar_matrix::{build, Direction, StatusMatrixDocument};
//!
//! let document: StatusMatrixDocument = serde_json::from_str(r#"{
//!     "columns": [{"hostname": "dst.example.org"}],
//!     "rows": [{"hostname": "src.example.org"}],
//!     "matrix": [[[{"id": 7, "parameters": {},
//!                   "result": {"status": 0, "message": "fine",
//!                              "parameters": {"average": "12.34 ms"}}}]]],
//!     "statusLabels": {"0": "OK"}
//! }"#).unwrap();
//!
//! let grid = build(&document, "Host").unwrap();
//! let cell = grid.cell(0, 0).unwrap();
//! assert_eq!(cell.label, "12.3 ms");
//! assert_eq!(cell.tooltip.status_label, "OK");
//! ```
//!
//! ### As a library with a file source
//!
//! ```
//! use perfsonar_matrix::{App, FileSource, GridBuilder, Theme};
//!
//! let source = Box::new(FileSource::new("matrix.json"));
//! let app = App::with_theme(source, GridBuilder::new("Host"), Theme::dark());
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{write_grid, App};
pub use config::{Overrides, Settings};
pub use data::{
    build, build_cell, classify, format_average, CellView, Direction, GridBuilder, GridView,
    Severity, ShapeMismatch, TooltipContent,
};
pub use source::{
    DataSource, FileSource, Host, HttpSource, MeasurementCell, MeasurementResult, SourceError,
    StatusLabels, StatusMatrixDocument,
};
pub use ui::Theme;
