//! Paper digest pipeline CLI
//!
//! Each pipeline stage is a separate subcommand so a run can be repeated or
//! resumed stage by stage. Per-item failures are reported in the run summary
//! and do not affect the exit code; only an inability to start a stage
//! (missing input file, missing credential, bad prompt) exits non-zero.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use summarization::{
    concatenate, discover_documents, load_prompt, load_work_items, FetchConfig, Fetcher,
    GeminiModel, ItemStatus, RunReport, SummarizeConfig, Summarizer, WorkItem,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "digest")]
#[command(about = "Fetch, summarize, and combine papers from a review spreadsheet")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every linked document that is not already on disk
    FetchAll {
        /// Links spreadsheet
        #[arg(long, default_value = "data/review.xlsx")]
        links: PathBuf,

        /// Directory downloaded documents land in
        #[arg(long, default_value = "data/pdfs")]
        pdf_dir: PathBuf,

        /// Maximum simultaneous downloads
        #[arg(short, long, default_value_t = 4)]
        concurrency: usize,
    },

    /// Summarize a single document
    SummarizeOne {
        /// Document to summarize
        document: PathBuf,

        /// Directory the summary lands in
        #[arg(long, default_value = "data/summaries")]
        summary_dir: PathBuf,

        /// Prompt file
        #[arg(long, default_value = "prompt.txt")]
        prompt: PathBuf,
    },

    /// Summarize every document without an existing summary
    SummarizeAll {
        /// Directory holding downloaded documents
        #[arg(long, default_value = "data/pdfs")]
        pdf_dir: PathBuf,

        /// Directory summaries land in
        #[arg(long, default_value = "data/summaries")]
        summary_dir: PathBuf,

        /// Prompt file
        #[arg(long, default_value = "prompt.txt")]
        prompt: PathBuf,

        /// Maximum simultaneous model calls
        #[arg(short, long, default_value_t = 4)]
        concurrency: usize,
    },

    /// Combine all summaries into one file
    ConcatenateAll {
        /// Directory holding summaries
        #[arg(long, default_value = "data/summaries")]
        summary_dir: PathBuf,

        /// Combined output file
        #[arg(long, default_value = "data/combined_summaries.txt")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::FetchAll {
            links,
            pdf_dir,
            concurrency,
        } => cmd_fetch_all(&links, &pdf_dir, concurrency).await,
        Commands::SummarizeOne {
            document,
            summary_dir,
            prompt,
        } => cmd_summarize_one(&document, &summary_dir, &prompt).await,
        Commands::SummarizeAll {
            pdf_dir,
            summary_dir,
            prompt,
            concurrency,
        } => cmd_summarize_all(&pdf_dir, &summary_dir, &prompt, concurrency).await,
        Commands::ConcatenateAll {
            summary_dir,
            output,
        } => cmd_concatenate_all(&summary_dir, &output),
    }
}

// ============================================================================
// Commands
// ============================================================================

async fn cmd_fetch_all(links: &Path, pdf_dir: &Path, concurrency: usize) -> Result<()> {
    let items = load_work_items(links, pdf_dir)
        .with_context(|| format!("Failed to read links from {}", links.display()))?;

    if items.is_empty() {
        println!("{}", "No links found; nothing to fetch.".bright_yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Fetching {} documents into {} (max {} in flight)...",
            items.len(),
            pdf_dir.display(),
            concurrency
        )
        .bright_blue()
    );

    let fetcher = Fetcher::new(&FetchConfig::default());
    let results = fetcher.fetch_all(items, concurrency).await;

    for r in &results {
        print_item_line(&r.item.id, r.status, r.error.as_deref());
    }
    print_report(&RunReport::from_fetches(&results));
    Ok(())
}

async fn cmd_summarize_one(document: &Path, summary_dir: &Path, prompt_path: &Path) -> Result<()> {
    if !document.is_file() {
        anyhow::bail!("Document not found: {}", document.display());
    }

    let summarizer = build_summarizer(prompt_path)?;

    let stem = document
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("Document path has no usable filename: {}", document.display()))?;
    let item = WorkItem::new(
        stem,
        document.to_string_lossy(),
        summary_dir.join(format!("{stem}.md")),
    );
    let destination = item.destination.clone();

    let result = summarizer.summarize(item).await;

    print_item_line(&result.item.id, result.status, result.error.as_deref());
    if result.is_success() {
        println!("Summary saved to: {}", destination.display());
    }
    Ok(())
}

async fn cmd_summarize_all(
    pdf_dir: &Path,
    summary_dir: &Path,
    prompt_path: &Path,
    concurrency: usize,
) -> Result<()> {
    let items = discover_documents(pdf_dir, summary_dir)?;

    if items.is_empty() {
        println!(
            "{}",
            format!("No PDF files found in {}", pdf_dir.display()).bright_yellow()
        );
        return Ok(());
    }

    let summarizer = build_summarizer(prompt_path)?;

    println!(
        "{}",
        format!(
            "Summarizing {} documents (max {} in flight)...",
            items.len(),
            concurrency
        )
        .bright_blue()
    );

    let results = summarizer.summarize_all(items, concurrency).await;

    for r in &results {
        print_item_line(&r.item.id, r.status, r.error.as_deref());
    }
    print_report(&RunReport::from_summaries(&results));
    Ok(())
}

fn cmd_concatenate_all(summary_dir: &Path, output: &Path) -> Result<()> {
    let report = concatenate(summary_dir, output).with_context(|| {
        format!(
            "Failed to concatenate summaries from {}",
            summary_dir.display()
        )
    })?;

    println!(
        "{}",
        format!(
            "Combined {} summaries into {}",
            report.included,
            output.display()
        )
        .bright_green()
    );
    if report.skipped > 0 {
        println!(
            "{}",
            format!("Skipped {} unreadable files", report.skipped).bright_yellow()
        );
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn build_summarizer(prompt_path: &Path) -> Result<Summarizer<GeminiModel>> {
    let prompt = load_prompt(prompt_path)?;
    let model = GeminiModel::from_env().context("GOOGLE_API_KEY is not set")?;
    Ok(Summarizer::new(model, prompt, SummarizeConfig::default()))
}

fn print_item_line(id: &str, status: ItemStatus, error: Option<&str>) {
    match status {
        ItemStatus::Completed => println!("  {} {}", "✓".bright_green(), id),
        ItemStatus::Skipped => {
            println!("  {} {} {}", "-".dimmed(), id, "(already present)".dimmed())
        }
        ItemStatus::Failed => println!(
            "  {} {} => {}",
            "✗".bright_red(),
            id,
            error.unwrap_or("unknown error")
        ),
    }
}

fn print_report(report: &RunReport) {
    println!();
    println!(
        "Completed: {}, Skipped: {}, Failed: {}",
        report.completed.to_string().bright_green(),
        report.skipped.to_string().bright_yellow(),
        report.failed.to_string().bright_red(),
    );

    if !report.failures.is_empty() {
        println!();
        println!("{}", "Failed items can be re-run individually:".bright_red());
        for (id, error) in &report.failures {
            println!("  {} => {}", id, error);
        }
    }
}
