//! Document sources for status matrix snapshots.
//!
//! This module provides a trait-based abstraction for receiving matrix
//! documents from an HTTP endpoint or a local file. Sources only fetch and
//! parse; turning a document into a grid is the job of [`crate::data`].

mod document;
mod file;
mod http;

pub use document::{
    display_value, Host, MeasurementCell, MeasurementResult, Parameters, StatusLabels,
    StatusMatrixDocument,
};
pub use file::{load_document, FileSource};
pub use http::{fetch_document, HttpSource};

use std::fmt::Debug;

use thiserror::Error;

/// Failure to obtain a document.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Server returned {0}")]
    Status(reqwest::StatusCode),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a document from raw JSON bytes.
pub fn parse_document(bytes: &[u8]) -> Result<StatusMatrixDocument, SourceError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Trait for receiving matrix documents from various sources.
///
/// # Example
///
/// ```
/// use perfsonar_matrix::{DataSource, FileSource};
///
/// let mut source = FileSource::new("matrix.json");
/// if let Some(document) = source.poll() {
///     println!("Got {} rows", document.rows.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest document.
    ///
    /// Returns `Some(document)` if a new one is available, `None` otherwise.
    /// This method must not block.
    fn poll(&mut self) -> Option<StatusMatrixDocument>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// The error from the most recent fetch attempt, if it failed.
    fn error(&self) -> Option<String>;

    /// Ask the source to fetch again as soon as possible.
    fn refresh(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_error_message() {
        let err = parse_document(b"{not json").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error"));
    }

    #[test]
    fn test_parse_document_empty_object() {
        let doc = parse_document(b"{}").unwrap();
        assert!(doc.rows.is_empty());
        assert!(doc.status_labels.is_empty());
    }
}
