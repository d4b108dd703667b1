//! HTTP document source.
//!
//! Periodically fetches the matrix JSON from a URL in a background task and
//! makes the parsed documents available via `poll()`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

use super::{parse_document, DataSource, SourceError, StatusMatrixDocument};

/// Fetch and parse one document.
///
/// ```no_run
/// use perfsonar_matrix::source::fetch_document;
///
/// # tokio_test::block_on(async {
/// let client = reqwest::Client::new();
/// let document = fetch_document(&client, "http://localhost/matrix").await.unwrap();
/// println!("{} sources", document.rows.len());
/// # });
/// ```
pub async fn fetch_document(
    client: &reqwest::Client,
    url: &str,
) -> Result<StatusMatrixDocument, SourceError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status(status));
    }

    let body = response.bytes().await?;
    parse_document(&body)
}

/// A data source that polls an HTTP endpoint for matrix documents.
///
/// The first fetch starts immediately; after that the task sleeps for the
/// configured interval, or until [`DataSource::refresh`] wakes it.
///
/// Must be created from within a tokio runtime.
#[derive(Debug)]
pub struct HttpSource {
    receiver: mpsc::Receiver<StatusMatrixDocument>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
    wake: Arc<Notify>,
    task: JoinHandle<()>,
}

impl HttpSource {
    /// Start polling `url` every `interval`, giving up on a request after `timeout`.
    pub fn spawn(url: &str, interval: Duration, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, url, interval))
    }

    /// Start polling with a preconfigured client.
    pub fn with_client(client: reqwest::Client, url: &str, interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel(4);
        let last_error = Arc::new(Mutex::new(None));
        let wake = Arc::new(Notify::new());

        let error_handle = last_error.clone();
        let wake_handle = wake.clone();
        let target = url.to_string();

        let task = tokio::spawn(async move {
            loop {
                match fetch_document(&client, &target).await {
                    Ok(document) => {
                        tracing::info!(
                            url = %target,
                            rows = document.rows.len(),
                            columns = document.columns.len(),
                            "fetched matrix document"
                        );
                        set_error(&error_handle, None);
                        if tx.send(document).await.is_err() {
                            // Receiver dropped
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(url = %target, error = %e, "matrix fetch failed");
                        set_error(&error_handle, Some(e.to_string()));
                    }
                }

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = wake_handle.notified() => {}
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("http: {}", url),
            last_error,
            wake,
            task,
        }
    }
}

fn set_error(slot: &Mutex<Option<String>>, error: Option<String>) {
    if let Ok(mut guard) = slot.lock() {
        *guard = error;
    }
}

impl DataSource for HttpSource {
    fn poll(&mut self) -> Option<StatusMatrixDocument> {
        // Only the newest document matters
        let mut latest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(document) => latest = Some(document),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    set_error(&self.last_error, Some("Fetch task stopped".to_string()));
                    break;
                }
            }
        }
        latest
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|e| e.clone())
    }

    fn refresh(&mut self) {
        self.wake.notify_one();
    }
}

impl Drop for HttpSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}
