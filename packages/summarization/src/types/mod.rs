//! Data types for the summarization pipeline.

pub mod config;
pub mod item;

pub use config::{FetchConfig, SummarizeConfig};
pub use item::{FetchResult, ItemStatus, RunReport, SummaryResult, WorkItem};
