//! HTTP document fetcher with idempotent skip and atomic writes.
//!
//! A destination that already holds a non-empty file is treated as complete
//! and never re-downloaded. Bytes land via a temp file beside the
//! destination plus a rename, so an interrupted download can never be
//! mistaken for a finished one.

use std::path::{Path, PathBuf};

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::retry::RetryPolicy;
use crate::scheduler::run_batch;
use crate::types::config::FetchConfig;
use crate::types::item::{FetchResult, WorkItem};

/// Downloads documents to their destination paths.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    retry: RetryPolicy,
}

impl Fetcher {
    /// Create a fetcher from config.
    pub fn new(config: &FetchConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            retry: config.retry,
        }
    }

    /// Fetch one item.
    ///
    /// A pre-existing non-empty destination short-circuits to Skipped
    /// without touching the network. Transient failures are retried per the
    /// configured policy; the last error message lands in the result.
    pub async fn fetch(&self, item: WorkItem) -> FetchResult {
        if is_complete(&item.destination) {
            debug!(id = %item.id, "destination already present, skipping");
            return FetchResult::skipped(item);
        }

        let outcome = self
            .retry
            .run("fetch", FetchError::is_transient, || {
                self.download(&item.source, &item.destination)
            })
            .await;

        match outcome {
            Ok(()) => {
                info!(id = %item.id, url = %item.source, "fetched");
                FetchResult::completed(item)
            }
            Err(e) => {
                warn!(id = %item.id, url = %item.source, error = %e, "fetch failed");
                let message = e.to_string();
                FetchResult::failed(item, message)
            }
        }
    }

    /// Fetch every item with at most `max_concurrency` downloads in flight.
    ///
    /// Results come back in input order; per-item failures occupy their own
    /// slot and never abort the batch.
    pub async fn fetch_all(
        &self,
        items: Vec<WorkItem>,
        max_concurrency: usize,
    ) -> Vec<FetchResult> {
        let originals = items.clone();
        let results = run_batch(items, max_concurrency, |item| {
            let fetcher = self.clone();
            async move { fetcher.fetch(item).await }
        })
        .await;

        results
            .into_iter()
            .zip(originals)
            .map(|(result, item)| match result {
                Ok(fetch_result) => fetch_result,
                Err(e) => FetchResult::failed(item, e.to_string()),
            })
            .collect()
    }

    /// One download attempt: GET, status check, atomic write.
    async fn download(&self, url: &str, destination: &Path) -> Result<(), FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        write_atomic(destination, &bytes).await?;
        debug!(url = %url, bytes = bytes.len(), "wrote document");
        Ok(())
    }
}

/// True when a destination already holds a complete output.
///
/// Zero-byte files do not count; the atomic write discipline guarantees a
/// partial download never sits at the destination path itself.
pub fn is_complete(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}

/// Write bytes to `path` through a temp file in the same directory, then
/// rename into place. Parent directories are created as needed.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let tmp = part_path(path);
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// In-progress sibling path for an atomic write.
fn part_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}
