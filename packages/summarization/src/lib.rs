//! Document Digest Pipeline Library
//!
//! Fetches documents named by a spreadsheet of links, summarizes them with a
//! generative model, and combines the summaries into one reviewable file.
//!
//! # Design Philosophy
//!
//! - Resumable by construction: files on disk are the only cross-run state,
//!   and a non-empty output short-circuits its work item
//! - Partial failure is normal: one bad link or one flaky model call never
//!   aborts a batch
//! - Results come back in input order regardless of completion order
//! - Library handles mechanics, the CLI handles wiring
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! use summarization::{discover_documents, Summarizer, SummarizeConfig};
//! use summarization::testing::MockModel;
//!
//! let items = discover_documents(Path::new("data/pdfs"), Path::new("data/summaries"))?;
//! let summarizer = Summarizer::new(MockModel::new(), prompt, SummarizeConfig::default());
//! let results = summarizer.summarize_all(items, 4).await;
//! ```
//!
//! # Modules
//!
//! - [`links`] - Work item discovery from a links spreadsheet
//! - [`fetcher`] - HTTP document retrieval with idempotent skip
//! - [`scheduler`] - Bounded-concurrency batch driver
//! - [`summarizer`] - Model-backed summarization of local documents
//! - [`aggregator`] - Summary concatenation into one combined file
//! - [`retry`] - Backoff retry policy shared by fetch and summarize
//! - [`traits`] - Core trait abstractions (GenerativeModel)
//! - [`types`] - Work items, results, and stage configuration
//! - [`testing`] - Mock implementations for testing

pub mod aggregator;
pub mod error;
pub mod fetcher;
pub mod links;
pub mod retry;
pub mod scheduler;
pub mod summarizer;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "gemini")]
pub mod ai;

// Re-export core types at crate root
pub use error::{FetchError, ModelError, PipelineError, SummarizeError};
pub use traits::GenerativeModel;
pub use types::{
    config::{FetchConfig, SummarizeConfig},
    item::{FetchResult, ItemStatus, RunReport, SummaryResult, WorkItem},
};

// Re-export pipeline components
pub use aggregator::{concatenate, ConcatReport};
pub use fetcher::{is_complete, write_atomic, Fetcher};
pub use links::load_work_items;
pub use retry::RetryPolicy;
pub use scheduler::{run_batch, BatchError};
pub use summarizer::{discover_documents, load_prompt, Summarizer};

#[cfg(feature = "gemini")]
pub use ai::GeminiModel;

// Re-export testing utilities
pub use testing::MockModel;
