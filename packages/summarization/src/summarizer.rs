//! Summarize stage: one document in, one summary file out.
//!
//! The summarizer is generic over [`GenerativeModel`], so the pipeline can
//! run against any provider (or a mock in tests). A destination that already
//! holds a non-empty summary is skipped without a model call, which keeps
//! reruns cheap and makes interrupted batches resumable.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ModelError, PipelineError, Result, SummarizeError};
use crate::fetcher::{is_complete, write_atomic};
use crate::scheduler::run_batch;
use crate::traits::GenerativeModel;
use crate::types::config::SummarizeConfig;
use crate::types::item::{SummaryResult, WorkItem};

/// Produces summary files from local documents.
#[derive(Clone)]
pub struct Summarizer<M> {
    model: M,
    prompt: String,
    config: SummarizeConfig,
}

impl<M: GenerativeModel> Summarizer<M> {
    /// Create a summarizer over a model with a fixed prompt.
    pub fn new(model: M, prompt: impl Into<String>, config: SummarizeConfig) -> Self {
        Self {
            model,
            prompt: prompt.into(),
            config,
        }
    }

    /// Summarize one item.
    ///
    /// A pre-existing non-empty destination short-circuits to Skipped with
    /// the stored text and no model call. Oversized or missing documents
    /// fail immediately; transient model failures are retried per the
    /// configured policy.
    pub async fn summarize(&self, item: WorkItem) -> SummaryResult {
        if is_complete(&item.destination) {
            match tokio::fs::read_to_string(&item.destination).await {
                Ok(text) => {
                    debug!(id = %item.id, "summary already present, skipping");
                    return SummaryResult::skipped(item, text);
                }
                Err(e) => {
                    warn!(id = %item.id, error = %e, "existing summary unreadable, regenerating");
                }
            }
        }

        let document = match self.read_document(&item).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(id = %item.id, error = %e, "summarize failed");
                let message = e.to_string();
                return SummaryResult::failed(item, message);
            }
        };

        let outcome = self
            .config
            .retry
            .run("summarize", ModelError::is_transient, || {
                self.model
                    .generate(&document, &self.config.mime_type, &self.prompt)
            })
            .await;

        match outcome {
            Ok(text) => {
                if let Err(e) = write_atomic(&item.destination, text.as_bytes()).await {
                    warn!(id = %item.id, error = %e, "failed to write summary");
                    let message = e.to_string();
                    return SummaryResult::failed(item, message);
                }
                info!(id = %item.id, chars = text.len(), "summarized");
                SummaryResult::completed(item, text)
            }
            Err(e) => {
                let wrapped = SummarizeError::from(e);
                warn!(id = %item.id, error = %wrapped, "summarize failed");
                let message = wrapped.to_string();
                SummaryResult::failed(item, message)
            }
        }
    }

    /// Summarize every item with at most `max_concurrency` model calls in
    /// flight.
    ///
    /// Results come back in input order; per-item failures occupy their own
    /// slot and never abort the batch.
    pub async fn summarize_all(
        &self,
        items: Vec<WorkItem>,
        max_concurrency: usize,
    ) -> Vec<SummaryResult>
    where
        M: Clone + 'static,
    {
        let originals = items.clone();
        let results = run_batch(items, max_concurrency, |item| {
            let summarizer = self.clone();
            async move { summarizer.summarize(item).await }
        })
        .await;

        results
            .into_iter()
            .zip(originals)
            .map(|(result, item)| match result {
                Ok(summary) => summary,
                Err(e) => SummaryResult::failed(item, e.to_string()),
            })
            .collect()
    }

    /// Read and size-check one source document.
    async fn read_document(&self, item: &WorkItem) -> std::result::Result<Vec<u8>, SummarizeError> {
        let bytes = tokio::fs::read(&item.source).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SummarizeError::DocumentMissing {
                    path: item.source.clone(),
                }
            } else {
                SummarizeError::Io(e)
            }
        })?;

        let size = bytes.len() as u64;
        if size > self.config.max_document_bytes {
            return Err(SummarizeError::DocumentTooLarge {
                size,
                limit: self.config.max_document_bytes,
            });
        }

        Ok(bytes)
    }
}

/// Enumerate documents in a directory as summarize work items.
///
/// Picks up `*.pdf` files in lexicographic filename order. Each item's
/// output lands in `summary_dir` under the same stem with an `.md`
/// extension. A missing directory yields an empty list rather than an
/// error, matching an empty one.
pub fn discover_documents(document_dir: &Path, summary_dir: &Path) -> Result<Vec<WorkItem>> {
    let entries = match std::fs::read_dir(document_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(dir = %document_dir.display(), "document directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("pdf"))
        .collect();
    paths.sort();

    let mut items = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        items.push(WorkItem::new(
            stem,
            path.to_string_lossy(),
            summary_dir.join(format!("{stem}.md")),
        ));
    }

    info!(count = items.len(), dir = %document_dir.display(), "discovered documents");
    Ok(items)
}

/// Load the summarization prompt from a file, trimmed.
///
/// A missing or empty prompt file is a configuration error; the run never
/// starts without a usable prompt.
pub fn load_prompt(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PipelineError::Config(format!("prompt file not found: {}", path.display()))
        } else {
            PipelineError::Io(e)
        }
    })?;

    let prompt = raw.trim();
    if prompt.is_empty() {
        return Err(PipelineError::Config(format!(
            "prompt file is empty: {}",
            path.display()
        )));
    }

    Ok(prompt.to_string())
}
