//! File-based document source.
//!
//! Polls a JSON file for matrix documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{parse_document, DataSource, SourceError, StatusMatrixDocument};

/// Read and parse a document from disk.
pub fn load_document(path: &Path) -> Result<StatusMatrixDocument, SourceError> {
    let content = fs::read(path)?;
    parse_document(&content)
}

/// A data source that reads matrix documents from a JSON file.
///
/// Useful for saved snapshots or for a cron job that downloads the matrix
/// periodically. The source tracks the file's modification time and only
/// returns new data when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<StatusMatrixDocument> {
        match load_document(&self.path) {
            Ok(document) => {
                self.last_error = None;
                Some(document)
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to load matrix file");
                self.last_error = Some(e.to_string());
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<StatusMatrixDocument> {
        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll (or forced refresh), always read
            (Some(_), None) => false, // File disappeared, keep what we have
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(document) = self.read_file() {
                self.last_modified = current_modified;
                tracing::debug!(path = %self.path.display(), "matrix file reloaded");
                return Some(document);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }

    fn refresh(&mut self) {
        self.last_modified = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "columns": [{"hostname": "dst"}],
            "rows": [{"hostname": "src"}],
            "matrix": [[[{"id": 1, "parameters": {"source": "src", "destination": "dst"}}]]],
            "statusLabels": ["OK"]
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/matrix.json");
        assert_eq!(source.path(), Path::new("/tmp/matrix.json"));
        assert_eq!(source.description(), "file: /tmp/matrix.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        let document = source.poll().unwrap();
        assert_eq!(document.rows[0].hostname, "src");

        // Unchanged file yields nothing new
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_refresh_forces_reread() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_some());
        assert!(source.poll().is_none());

        source.refresh();
        assert!(source.poll().is_some());
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/matrix.json");

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[test]
    fn test_file_source_recovers_after_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();
        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_none());

        std::fs::write(file.path(), sample_json()).unwrap();

        // last_modified was never recorded, so the next poll rereads
        assert!(source.poll().is_some());
        assert!(source.error().is_none());
    }
}
