//! Grid view construction.
//!
//! Walks the document rows × columns and assembles the ordered view model
//! handed to the UI (or to export).

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::cell::{build_cell_in, CellView, Direction};
use super::status::Severity;
use crate::source::StatusMatrixDocument;

/// The matrix dimensions disagree with the row/column host lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("shape mismatch: expected {expected} {axis}, found {found}")]
pub struct ShapeMismatch {
    pub axis: Axis,
    pub expected: usize,
    pub found: usize,
}

/// Which dimension of the matrix was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `matrix.len()` versus `rows.len()`.
    Rows,
    /// `matrix[row].len()` versus `columns.len()`.
    Columns { row: usize },
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Rows => write!(f, "matrix rows"),
            Axis::Columns { row } => write!(f, "cells in matrix row {}", row),
        }
    }
}

/// Render-ready description of the whole matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridView {
    /// Label of the row-header column.
    pub header_name: String,
    pub column_headers: Vec<String>,
    pub rows: Vec<RowView>,
}

/// One source host and its cells, in column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub hostname: String,
    /// `None` is an empty cell (no measurement).
    pub cells: Vec<Option<CellView>>,
}

/// Number of cells per severity, plus empty slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub success: usize,
    pub warning: usize,
    pub error: usize,
    pub timeout: usize,
    pub unknown: usize,
    pub empty: usize,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Success => self.success,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
            Severity::Timeout => self.timeout,
            Severity::Unknown => self.unknown,
        }
    }

    fn record(&mut self, cell: Option<&CellView>) {
        let slot = match cell.map(|c| c.severity) {
            Some(Severity::Success) => &mut self.success,
            Some(Severity::Warning) => &mut self.warning,
            Some(Severity::Error) => &mut self.error,
            Some(Severity::Timeout) => &mut self.timeout,
            Some(Severity::Unknown) => &mut self.unknown,
            None => &mut self.empty,
        };
        *slot += 1;
    }
}

impl GridView {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_headers.len()
    }

    /// The filled cell at `row`/`column`, if any.
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellView> {
        self.rows.get(row)?.cells.get(column)?.as_ref()
    }

    /// Tally every slot in the grid.
    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for row in &self.rows {
            for cell in &row.cells {
                counts.record(cell.as_ref());
            }
        }
        counts
    }
}

/// Builds [`GridView`]s from documents.
///
/// Holds the settings that are not part of the document: the row-header
/// label and which measurement direction to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridBuilder {
    header_name: String,
    direction: Direction,
}

impl GridBuilder {
    pub fn new(header_name: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
            direction: Direction::Forward,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Build the grid, preserving document order throughout.
    ///
    /// The shape is checked before any cell is built, so a malformed
    /// document never yields a partial grid.
    pub fn build(&self, document: &StatusMatrixDocument) -> Result<GridView, ShapeMismatch> {
        check_shape(document)?;

        let rows = document
            .rows
            .iter()
            .enumerate()
            .map(|(r, host)| RowView {
                hostname: host.hostname.clone(),
                cells: (0..document.columns.len())
                    .map(|c| build_cell_in(document, r, c, self.direction))
                    .collect(),
            })
            .collect();

        Ok(GridView {
            header_name: self.header_name.clone(),
            column_headers: document.columns.iter().map(|h| h.hostname.clone()).collect(),
            rows,
        })
    }
}

/// Build the forward-direction grid for `document`.
pub fn build(
    document: &StatusMatrixDocument,
    header_name: impl Into<String>,
) -> Result<GridView, ShapeMismatch> {
    GridBuilder::new(header_name).build(document)
}

fn check_shape(document: &StatusMatrixDocument) -> Result<(), ShapeMismatch> {
    if document.matrix.len() != document.rows.len() {
        return Err(ShapeMismatch {
            axis: Axis::Rows,
            expected: document.rows.len(),
            found: document.matrix.len(),
        });
    }

    let columns = document.columns.len();
    match document.matrix.iter().position(|cells| cells.len() != columns) {
        Some(row) => Err(ShapeMismatch {
            axis: Axis::Columns { row },
            expected: columns,
            found: document.matrix[row].len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Host, MeasurementCell, MeasurementResult, Parameters};
    use proptest::prelude::*;

    fn host(name: &str) -> Host {
        Host {
            hostname: name.to_string(),
        }
    }

    fn measured(id: usize, status: i64) -> MeasurementCell {
        MeasurementCell {
            id: id.to_string(),
            parameters: Parameters::new(),
            result: Some(MeasurementResult {
                status: Some(status),
                parameters: [("average", "1.25ms")].into_iter().collect(),
                ..Default::default()
            }),
        }
    }

    fn unmeasured(id: usize) -> MeasurementCell {
        MeasurementCell {
            id: id.to_string(),
            ..Default::default()
        }
    }

    /// Document with `rows` × `columns` hosts; `status(r, c)` of `None`
    /// leaves the slot unmeasured.
    fn document(
        rows: usize,
        columns: usize,
        status: impl Fn(usize, usize) -> Option<i64>,
    ) -> StatusMatrixDocument {
        StatusMatrixDocument {
            columns: (0..columns).map(|c| host(&format!("dst-{}", c))).collect(),
            rows: (0..rows).map(|r| host(&format!("src-{}", r))).collect(),
            matrix: (0..rows)
                .map(|r| {
                    (0..columns)
                        .map(|c| {
                            let id = r * columns + c;
                            match status(r, c) {
                                Some(s) => vec![measured(id, s)],
                                None => vec![unmeasured(id)],
                            }
                        })
                        .collect()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_preserves_order() {
        let doc = document(2, 3, |r, c| if r == c { None } else { Some(0) });
        let grid = build(&doc, "Source").unwrap();

        assert_eq!(grid.header_name, "Source");
        assert_eq!(grid.column_headers, vec!["dst-0", "dst-1", "dst-2"]);
        assert_eq!(grid.rows[0].hostname, "src-0");
        assert_eq!(grid.rows[1].hostname, "src-1");

        assert!(grid.cell(0, 0).is_none());
        assert_eq!(grid.cell(0, 1).unwrap().id, "1");
        assert_eq!(grid.cell(1, 2).unwrap().id, "5");
        assert_eq!(grid.cell(1, 2).unwrap().label, "1.3 ms");
        assert!(grid.cell(1, 1).is_none());
    }

    #[test]
    fn test_row_count_mismatch() {
        let mut doc = document(2, 2, |_, _| Some(0));
        doc.matrix.pop();

        let err = build(&doc, "Source").unwrap_err();
        assert_eq!(
            err,
            ShapeMismatch {
                axis: Axis::Rows,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_column_count_mismatch() {
        let mut doc = document(3, 2, |_, _| Some(0));
        doc.matrix[1].push(vec![measured(99, 0)]);

        let err = build(&doc, "Source").unwrap_err();
        assert_eq!(err.axis, Axis::Columns { row: 1 });
        assert_eq!(err.expected, 2);
        assert_eq!(err.found, 3);
        assert!(err.to_string().contains("matrix row 1"));
    }

    #[test]
    fn test_empty_document() {
        let grid = build(&StatusMatrixDocument::default(), "Source").unwrap();
        assert_eq!(grid.row_count(), 0);
        assert_eq!(grid.column_count(), 0);
    }

    #[test]
    fn test_unreadable_status_only_affects_its_cell() {
        let doc = crate::source::parse_document(
            br#"{
                "columns": [{"hostname": "dst-0"}, {"hostname": "dst-1"}, {"hostname": "dst-2"}, {"hostname": "dst-3"}],
                "rows": [{"hostname": "src-0"}],
                "matrix": [[
                    [{"id": "a", "result": {"status": 0, "parameters": {"average": "2ms"}}}],
                    [{"id": "b", "result": {"status": null}}],
                    [{"id": "c", "result": {"status": "2"}}],
                    [{"id": "d", "result": {"message": "no status"}}]
                ]],
                "statusLabels": {"0": "OK", "2": "CRITICAL"}
            }"#,
        )
        .unwrap();

        let grid = build(&doc, "Source").unwrap();
        assert_eq!(grid.cell(0, 0).unwrap().label, "2 ms");
        assert_eq!(grid.cell(0, 0).unwrap().severity, Severity::Success);
        for column in 1..4 {
            let cell = grid.cell(0, column).unwrap();
            assert_eq!(cell.severity, Severity::Unknown);
            assert_eq!(cell.label, "Unknown");
            assert_eq!(cell.tooltip.status_label, "Unknown");
        }
    }

    #[test]
    fn test_slot_without_entries_is_empty() {
        let mut doc = document(1, 1, |_, _| Some(0));
        doc.matrix[0][0].clear();

        let grid = build(&doc, "Source").unwrap();
        assert_eq!(grid.rows[0].cells, vec![None]);
    }

    #[test]
    fn test_severity_counts() {
        let doc = document(2, 3, |r, c| match (r, c) {
            (0, 0) => None,
            (0, 1) => Some(1),
            (0, 2) => Some(2),
            (1, 0) => Some(4),
            (1, 1) => Some(17),
            _ => Some(0),
        });
        let counts = build(&doc, "Source").unwrap().severity_counts();

        assert_eq!(counts.empty, 1);
        assert_eq!(counts.get(Severity::Success), 1);
        assert_eq!(counts.get(Severity::Warning), 1);
        assert_eq!(counts.get(Severity::Error), 1);
        assert_eq!(counts.get(Severity::Timeout), 1);
        assert_eq!(counts.get(Severity::Unknown), 1);
    }

    #[test]
    fn test_builder_direction() {
        let mut doc = document(1, 1, |_, _| Some(0));
        doc.matrix[0][0].push(measured(7, 3));

        let builder = GridBuilder::new("Source").with_direction(Direction::Reverse);
        let grid = builder.build(&doc).unwrap();
        assert_eq!(grid.cell(0, 0).unwrap().label, "Error");
        assert_eq!(builder.direction(), Direction::Reverse);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_grid_matches_document_shape(
            rows in 0usize..8,
            columns in 0usize..8,
            seed in any::<u64>(),
        ) {
            let doc = document(rows, columns, |r, c| {
                let bits = seed.rotate_left((r * 8 + c) as u32);
                if bits & 1 == 0 { None } else { Some((bits % 7) as i64 - 1) }
            });
            let grid = build(&doc, "Source").unwrap();

            prop_assert_eq!(grid.row_count(), rows);
            prop_assert_eq!(grid.column_count(), columns);
            for (r, row) in grid.rows.iter().enumerate() {
                prop_assert_eq!(&row.hostname, &format!("src-{}", r));
                prop_assert_eq!(row.cells.len(), columns);
                for (c, cell) in row.cells.iter().enumerate() {
                    if let Some(cell) = cell {
                        prop_assert_eq!(&cell.id, &(r * columns + c).to_string());
                    }
                }
            }
        }

        #[test]
        fn prop_build_is_idempotent(rows in 0usize..6, columns in 0usize..6) {
            let doc = document(rows, columns, |r, c| Some(((r + c) % 6) as i64));
            prop_assert_eq!(build(&doc, "Source").unwrap(), build(&doc, "Source").unwrap());
        }

        #[test]
        fn prop_row_mismatch_never_builds(rows in 1usize..6, columns in 0usize..6) {
            let mut doc = document(rows, columns, |_, _| Some(0));
            doc.matrix.pop();
            prop_assert!(build(&doc, "Source").is_err());
        }
    }
}
