//! Integration tests for the full digest pipeline.
//!
//! These tests verify the complete workflow:
//! 1. Fetch (satisfied here by documents already on disk)
//! 2. Summarize via the batch scheduler
//! 3. Aggregate into one combined file

use std::path::{Path, PathBuf};

use summarization::testing::MockModel;
use summarization::{
    concatenate, discover_documents, FetchConfig, Fetcher, ItemStatus, RunReport, SummarizeConfig,
    Summarizer, WorkItem,
};

/// Helper to lay down a document directory with the given files.
fn write_documents(dir: &Path, names_and_bodies: &[(&str, &[u8])]) -> PathBuf {
    let pdfs = dir.join("pdfs");
    std::fs::create_dir_all(&pdfs).unwrap();
    for (name, body) in names_and_bodies {
        std::fs::write(pdfs.join(name), body).unwrap();
    }
    pdfs
}

#[tokio::test]
async fn test_full_pipeline_fetch_summarize_aggregate() {
    let dir = tempfile::tempdir().unwrap();
    let pdfs = write_documents(
        dir.path(),
        &[("alpha.pdf", b"%PDF alpha!"), ("beta.pdf", b"%PDF beta")],
    );
    let summaries = dir.path().join("summaries");

    // Fetch stage: destinations already hold the documents, so every item
    // short-circuits to Skipped and the bogus URLs are never contacted.
    let fetch_items = vec![
        WorkItem::new(
            "alpha",
            "http://invalid.invalid/alpha.pdf",
            pdfs.join("alpha.pdf"),
        ),
        WorkItem::new(
            "beta",
            "http://invalid.invalid/beta.pdf",
            pdfs.join("beta.pdf"),
        ),
    ];
    let fetcher = Fetcher::new(&FetchConfig::default());
    let fetch_results = fetcher.fetch_all(fetch_items, 2).await;
    assert!(fetch_results
        .iter()
        .all(|r| r.status == ItemStatus::Skipped));

    // Summarize stage
    let items = discover_documents(&pdfs, &summaries).unwrap();
    assert_eq!(items.len(), 2);

    let model = MockModel::new();
    let summarizer = Summarizer::new(
        model.clone(),
        "Summarize the paper.",
        SummarizeConfig::default(),
    );
    let results = summarizer.summarize_all(items, 2).await;

    assert!(results.iter().all(|r| r.status == ItemStatus::Completed));
    assert_eq!(model.call_count(), 2);

    let report = RunReport::from_summaries(&results);
    assert_eq!(report.completed, 2);
    assert!(report.is_success());

    // Aggregate stage
    let output = dir.path().join("combined.txt");
    let concat = concatenate(&summaries, &output).unwrap();
    assert_eq!(concat.included, 2);

    let combined = std::fs::read_to_string(&output).unwrap();
    let alpha_pos = combined.find("===== alpha =====").unwrap();
    let beta_pos = combined.find("===== beta =====").unwrap();
    assert!(alpha_pos < beta_pos);
    assert!(combined.contains("Summary of 11 byte document."));
    assert!(combined.contains("Summary of 9 byte document."));
}

#[tokio::test]
async fn test_second_summarize_run_makes_no_model_calls() {
    let dir = tempfile::tempdir().unwrap();
    let pdfs = write_documents(dir.path(), &[("paper.pdf", b"%PDF body")]);
    let summaries = dir.path().join("summaries");

    let items = discover_documents(&pdfs, &summaries).unwrap();

    let summarizer = Summarizer::new(
        MockModel::new(),
        "Summarize the paper.",
        SummarizeConfig::default(),
    );
    let first = summarizer.summarize_all(items.clone(), 2).await;
    assert_eq!(first[0].status, ItemStatus::Completed);

    // A rerun over unchanged disk state uses the stored summaries.
    let fresh_model = MockModel::new().with_response("should never appear");
    let rerun = Summarizer::new(
        fresh_model.clone(),
        "Summarize the paper.",
        SummarizeConfig::default(),
    );
    let second = rerun.summarize_all(items, 2).await;

    assert_eq!(second[0].status, ItemStatus::Skipped);
    assert_eq!(second[0].text, first[0].text);
    assert_eq!(fresh_model.call_count(), 0);
}

#[tokio::test]
async fn test_partial_failure_is_isolated_and_reported() {
    let dir = tempfile::tempdir().unwrap();
    let pdfs = write_documents(dir.path(), &[("a.pdf", b"%PDF a"), ("c.pdf", b"%PDF c")]);
    let summaries = dir.path().join("summaries");

    // "ghost" names a document that does not exist on disk.
    let items = vec![
        WorkItem::new(
            "a",
            pdfs.join("a.pdf").to_string_lossy(),
            summaries.join("a.md"),
        ),
        WorkItem::new(
            "ghost",
            pdfs.join("ghost.pdf").to_string_lossy(),
            summaries.join("ghost.md"),
        ),
        WorkItem::new(
            "c",
            pdfs.join("c.pdf").to_string_lossy(),
            summaries.join("c.md"),
        ),
    ];

    let summarizer = Summarizer::new(
        MockModel::new(),
        "Summarize the paper.",
        SummarizeConfig::default(),
    );
    let results = summarizer.summarize_all(items, 3).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].item.id, "a");
    assert_eq!(results[0].status, ItemStatus::Completed);
    assert_eq!(results[1].item.id, "ghost");
    assert_eq!(results[1].status, ItemStatus::Failed);
    assert_eq!(results[2].item.id, "c");
    assert_eq!(results[2].status, ItemStatus::Completed);

    let report = RunReport::from_summaries(&results);
    assert_eq!(report.total(), 3);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures[0].0, "ghost");
    assert!(!report.is_success());

    // The healthy summaries still aggregate.
    let output = dir.path().join("combined.txt");
    let concat = concatenate(&summaries, &output).unwrap();
    assert_eq!(concat.included, 2);
}
