//! Work items and their terminal results.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One unit of processing tracked through the pipeline.
///
/// Created by the link source (or from a directory listing for the
/// summarize stage); immutable during processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Stable identifier, also the output filename stem
    pub id: String,

    /// Where the document comes from: a URL when fetching, a local path when
    /// summarizing
    pub source: String,

    /// Where this item's output lands
    pub destination: PathBuf,
}

impl WorkItem {
    /// Create a new work item.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Terminal status of one processed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    /// Output was produced by this run
    Completed,

    /// Pre-existing non-empty output satisfied the item without a remote call
    Skipped,

    /// All attempts exhausted, or the input is permanently unusable
    Failed,
}

impl ItemStatus {
    /// Completed and Skipped both count as success.
    pub fn is_success(&self) -> bool {
        !matches!(self, ItemStatus::Failed)
    }
}

/// Outcome of fetching one item. Produced once per item, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    /// The item this result belongs to
    pub item: WorkItem,

    /// Terminal status
    pub status: ItemStatus,

    /// Last error message when status is Failed
    pub error: Option<String>,
}

impl FetchResult {
    /// Output written this run.
    pub fn completed(item: WorkItem) -> Self {
        Self {
            item,
            status: ItemStatus::Completed,
            error: None,
        }
    }

    /// Pre-existing output satisfied the item.
    pub fn skipped(item: WorkItem) -> Self {
        Self {
            item,
            status: ItemStatus::Skipped,
            error: None,
        }
    }

    /// All attempts failed; keep the last error for diagnostics.
    pub fn failed(item: WorkItem, error: impl Into<String>) -> Self {
        Self {
            item,
            status: ItemStatus::Failed,
            error: Some(error.into()),
        }
    }

    /// Whether the item ended in a usable state.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Outcome of summarizing one item. Same lifecycle shape as [`FetchResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResult {
    /// The item this result belongs to
    pub item: WorkItem,

    /// Generated (or previously stored) summary text; empty when Failed
    pub text: String,

    /// Terminal status
    pub status: ItemStatus,

    /// Last error message when status is Failed
    pub error: Option<String>,
}

impl SummaryResult {
    /// Summary generated this run.
    pub fn completed(item: WorkItem, text: impl Into<String>) -> Self {
        Self {
            item,
            text: text.into(),
            status: ItemStatus::Completed,
            error: None,
        }
    }

    /// Pre-existing summary satisfied the item.
    pub fn skipped(item: WorkItem, text: impl Into<String>) -> Self {
        Self {
            item,
            text: text.into(),
            status: ItemStatus::Skipped,
            error: None,
        }
    }

    /// All attempts failed; keep the last error for diagnostics.
    pub fn failed(item: WorkItem, error: impl Into<String>) -> Self {
        Self {
            item,
            text: String::new(),
            status: ItemStatus::Failed,
            error: Some(error.into()),
        }
    }

    /// Whether the item ended in a usable state.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Aggregate accounting for one batch stage.
///
/// Printed at the end of a run so failed items can be re-run by hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Items whose output was produced this run
    pub completed: usize,

    /// Items satisfied by pre-existing output
    pub skipped: usize,

    /// Items that ended Failed
    pub failed: usize,

    /// Identifier and error message of each failed item
    pub failures: Vec<(String, String)>,
}

impl RunReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one terminal status into the counts.
    pub fn record(&mut self, id: &str, status: ItemStatus, error: Option<&str>) {
        match status {
            ItemStatus::Completed => self.completed += 1,
            ItemStatus::Skipped => self.skipped += 1,
            ItemStatus::Failed => {
                self.failed += 1;
                self.failures
                    .push((id.to_string(), error.unwrap_or("unknown error").to_string()));
            }
        }
    }

    /// Build a report from fetch results.
    pub fn from_fetches(results: &[FetchResult]) -> Self {
        let mut report = Self::new();
        for r in results {
            report.record(&r.item.id, r.status, r.error.as_deref());
        }
        report
    }

    /// Build a report from summary results.
    pub fn from_summaries(results: &[SummaryResult]) -> Self {
        let mut report = Self::new();
        for r in results {
            report.record(&r.item.id, r.status, r.error.as_deref());
        }
        report
    }

    /// Total items accounted for.
    pub fn total(&self) -> usize {
        self.completed + self.skipped + self.failed
    }

    /// True when no item failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_success() {
        assert!(ItemStatus::Completed.is_success());
        assert!(ItemStatus::Skipped.is_success());
        assert!(!ItemStatus::Failed.is_success());
    }

    #[test]
    fn test_report_accumulation() {
        let items = vec![
            FetchResult::completed(WorkItem::new("a", "https://x/a.pdf", "out/a.pdf")),
            FetchResult::skipped(WorkItem::new("b", "https://x/b.pdf", "out/b.pdf")),
            FetchResult::failed(
                WorkItem::new("c", "https://x/c.pdf", "out/c.pdf"),
                "HTTP 404 fetching https://x/c.pdf",
            ),
        ];

        let report = RunReport::from_fetches(&items);
        assert_eq!(report.completed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.total(), 3);
        assert!(!report.is_success());
        assert_eq!(report.failures[0].0, "c");
        assert!(report.failures[0].1.contains("404"));
    }

    #[test]
    fn test_report_success_with_skips_only() {
        let items = vec![SummaryResult::skipped(
            WorkItem::new("a", "data/pdfs/a.pdf", "out/a.md"),
            "cached text",
        )];
        let report = RunReport::from_summaries(&items);
        assert!(report.is_success());
        assert_eq!(report.skipped, 1);
    }
}
