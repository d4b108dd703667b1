//! Per-cell view construction.
//!
//! Turns one matrix slot into the label, severity and detail content the
//! UI shows for it.

use serde::{Deserialize, Serialize};

use super::status::{classify, Classification, Severity, UNKNOWN_WORD};
use super::value::format_average;
use crate::source::StatusMatrixDocument;

/// Parameter key holding the combined numeral+unit average.
pub const AVERAGE_KEY: &str = "average";

/// Which measurement of a matrix slot to render.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Source to destination (entry 0).
    #[default]
    Forward,
    /// Destination back to source (entry 1).
    Reverse,
}

impl Direction {
    /// Position of this direction's entry within a matrix slot.
    pub fn index(&self) -> usize {
        match self {
            Direction::Forward => 0,
            Direction::Reverse => 1,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }
}

/// A filled matrix cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellView {
    pub id: String,
    pub label: String,
    pub severity: Severity,
    pub tooltip: TooltipContent,
}

/// Content of the detail popover for a cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    /// Document-provided text for the status code.
    pub status_label: String,
    pub source: String,
    pub destination: String,
    pub message: String,
    pub time: String,
    pub parameter_rows: Vec<(String, String)>,
}

/// Build the forward-direction view for `matrix[row][column]`.
///
/// Returns `None` when there is no measurement result for the pair.
pub fn build_cell(document: &StatusMatrixDocument, row: usize, column: usize) -> Option<CellView> {
    build_cell_in(document, row, column, Direction::Forward)
}

/// Build the view for `matrix[row][column]` in the given direction.
pub fn build_cell_in(
    document: &StatusMatrixDocument,
    row: usize,
    column: usize,
    direction: Direction,
) -> Option<CellView> {
    let cell = document.entry(row, column, direction)?;
    let result = cell.result.as_ref()?;

    let classification = match result.status {
        Some(code) => classify(code, &document.status_labels),
        None => Classification {
            severity: Severity::Unknown,
            word: UNKNOWN_WORD.to_string(),
        },
    };
    let average = result.parameters.get(AVERAGE_KEY);

    let label = match classification.severity {
        Severity::Success | Severity::Warning => format_average(average)
            .map(|v| v.display)
            .unwrap_or_else(|| classification.word.clone()),
        Severity::Error => "Error".to_string(),
        Severity::Timeout => "Timeout".to_string(),
        Severity::Unknown => classification.word.clone(),
    };

    // Measurement details win over the test parameters when there are any.
    let parameter_rows = if average.is_some() {
        result.parameters.to_rows()
    } else {
        cell.parameters.to_rows()
    };

    let status_label = result
        .status
        .and_then(|code| document.status_labels.get(code))
        .map(str::to_string)
        .unwrap_or(classification.word);

    Some(CellView {
        id: cell.id.clone(),
        label,
        severity: classification.severity,
        tooltip: TooltipContent {
            status_label,
            source: cell.parameters.get("source").unwrap_or_default().to_string(),
            destination: cell.parameters.get("destination").unwrap_or_default().to_string(),
            message: result.message.clone(),
            time: result.time.clone(),
            parameter_rows,
        },
    })
}
