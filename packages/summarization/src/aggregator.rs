//! Aggregation stage: combine summary files into one document.
//!
//! Purely local and synchronous. Summaries are taken in lexicographic
//! filename order so the combined file is deterministic run over run.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{PipelineError, Result};

/// Accounting for one concatenation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConcatReport {
    /// Files included in the combined output
    pub included: usize,

    /// Unreadable files skipped with a warning
    pub skipped: usize,
}

/// Concatenate every `.md` summary in a directory into one output file.
///
/// Each summary is preceded by a header line naming its identifier (the
/// filename stem). A file that cannot be read as text is skipped with a
/// warning; a directory yielding nothing to combine is an error, and no
/// output file is written in that case.
pub fn concatenate(summary_dir: &Path, output_path: &Path) -> Result<ConcatReport> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(summary_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("md"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(PipelineError::NoSummaries {
            path: summary_dir.display().to_string(),
        });
    }

    let mut combined = String::new();
    let mut report = ConcatReport::default();

    for path in paths {
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable summary");
                report.skipped += 1;
                continue;
            }
        };

        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");
        combined.push_str(&format!("===== {id} =====\n\n"));
        combined.push_str(content.trim_end());
        combined.push_str("\n\n");
        report.included += 1;
    }

    if report.included == 0 {
        return Err(PipelineError::NoSummaries {
            path: summary_dir.display().to_string(),
        });
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, combined)?;

    info!(
        included = report.included,
        skipped = report.skipped,
        output = %output_path.display(),
        "concatenated summaries"
    );
    Ok(report)
}
