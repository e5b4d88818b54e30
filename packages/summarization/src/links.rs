//! Link source: turns a spreadsheet of document links into work items.
//!
//! The first worksheet is scanned for `Title`, `Year`, and `Link` columns by
//! header name. Each usable row becomes one [`WorkItem`] with a
//! deterministic destination filename, so re-runs line up with files already
//! on disk.

use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::types::item::WorkItem;

const LINK_COLUMN: &str = "Link";
const TITLE_COLUMN: &str = "Title";
const YEAR_COLUMN: &str = "Year";

/// Read the first worksheet of `path` into ordered work items.
///
/// Destinations land under `output_dir`. Rows without a usable link are
/// skipped with a warning; a missing `Link` column aborts the run.
pub fn load_work_items(path: &Path, output_dir: &Path) -> Result<Vec<WorkItem>> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| PipelineError::NoWorksheet {
            path: path.display().to_string(),
        })?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();

    let items = items_from_rows(&rows, output_dir)?;
    info!(
        path = %path.display(),
        sheet = %sheet_name,
        items = items.len(),
        "loaded work items"
    );
    Ok(items)
}

/// Build work items from raw sheet rows, header row first.
///
/// Split out from the workbook reading so row handling is testable without
/// spreadsheet fixtures.
pub fn items_from_rows(rows: &[Vec<Data>], output_dir: &Path) -> Result<Vec<WorkItem>> {
    let Some((header, data_rows)) = rows.split_first() else {
        return Err(PipelineError::MissingColumn {
            name: LINK_COLUMN.to_string(),
        });
    };

    let link_col = find_column(header, LINK_COLUMN).ok_or_else(|| PipelineError::MissingColumn {
        name: LINK_COLUMN.to_string(),
    })?;
    let title_col = find_column(header, TITLE_COLUMN);
    let year_col = find_column(header, YEAR_COLUMN);

    let mut items = Vec::new();
    let mut seen = HashSet::new();

    for (row_idx, row) in data_rows.iter().enumerate() {
        // 1-based row number counting the header, matching what a user sees
        // in a spreadsheet application.
        let row_number = row_idx + 2;

        let Some(url) = cell_string(row, link_col) else {
            warn!(row = row_number, "row has no usable link, skipping");
            continue;
        };

        let url = rewrite_arxiv_url(&url);
        let title = title_col
            .and_then(|c| cell_display(row, c))
            .unwrap_or_else(|| format!("paper_{row_number}"));
        let year = year_col
            .and_then(|c| cell_display(row, c))
            .unwrap_or_else(|| "unknown".to_string());

        let filename = derive_filename(&url, &title, &year);
        if !seen.insert(filename.clone()) {
            warn!(
                row = row_number,
                filename = %filename,
                "duplicate destination, skipping"
            );
            continue;
        }

        let id = Path::new(&filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.clone());

        items.push(WorkItem::new(id, url, output_dir.join(&filename)));
    }

    Ok(items)
}

/// Index of the column whose trimmed header matches `name`.
fn find_column(header: &[Data], name: &str) -> Option<usize> {
    header.iter().position(|cell| match cell {
        Data::String(s) => s.trim() == name,
        _ => false,
    })
}

/// Trimmed text of a cell; None for empty or non-text cells.
fn cell_string(row: &[Data], index: usize) -> Option<String> {
    match row.get(index)? {
        Data::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }
}

/// Cell rendered as display text; accepts text and numeric cells (years are
/// often stored as numbers).
fn cell_display(row: &[Data], index: usize) -> Option<String> {
    match row.get(index)? {
        Data::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        _ => None,
    }
}

/// Rewrite an arXiv abstract link to its direct PDF form.
fn rewrite_arxiv_url(url: &str) -> String {
    if !url.contains("arxiv.org/abs/") {
        return url.to_string();
    }

    let re = regex::Regex::new(r"arxiv\.org/abs/([^/]+)").unwrap();
    match re.captures(url) {
        Some(caps) => {
            let rewritten = format!("https://arxiv.org/pdf/{}.pdf", &caps[1]);
            info!(from = %url, to = %rewritten, "rewrote arXiv abstract link");
            rewritten
        }
        None => url.to_string(),
    }
}

/// Deterministic destination filename for a document URL.
///
/// The URL's last path segment is used when it looks like a filename
/// (contains a dot); otherwise the sanitized title and year stand in.
/// Always carries a `.pdf` suffix.
fn derive_filename(url: &str, title: &str, year: &str) -> String {
    let last_segment = url.rsplit('/').next().unwrap_or_default().trim();

    let mut filename = if !last_segment.is_empty() && last_segment.contains('.') {
        last_segment.to_string()
    } else {
        format!("{}_{}", sanitize(title), year)
    };

    if !filename.ends_with(".pdf") {
        filename.push_str(".pdf");
    }
    filename
}

/// Replace filesystem-hostile characters so titles make safe filenames.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    fn header() -> Vec<Data> {
        vec![s("Title"), s("Year"), s("Link")]
    }

    fn out_dir() -> PathBuf {
        PathBuf::from("data/pdfs")
    }

    #[test]
    fn test_direct_pdf_link() {
        let rows = vec![
            header(),
            vec![s("A Study"), s("2021"), s("https://example.com/papers/study-1.pdf")],
        ];

        let items = items_from_rows(&rows, &out_dir()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "study-1");
        assert_eq!(items[0].source, "https://example.com/papers/study-1.pdf");
        assert_eq!(items[0].destination, out_dir().join("study-1.pdf"));
    }

    #[test]
    fn test_arxiv_abstract_link_rewritten() {
        let rows = vec![
            header(),
            vec![s("Deep Nets"), s("2023"), s("https://arxiv.org/abs/2301.12345")],
        ];

        let items = items_from_rows(&rows, &out_dir()).unwrap();
        assert_eq!(items[0].source, "https://arxiv.org/pdf/2301.12345.pdf");
        assert_eq!(items[0].destination, out_dir().join("2301.12345.pdf"));
    }

    #[test]
    fn test_filename_falls_back_to_title_and_year() {
        let rows = vec![
            header(),
            vec![
                s("Attention: A Survey"),
                Data::Float(2020.0),
                s("https://example.com/download"),
            ],
        ];

        let items = items_from_rows(&rows, &out_dir()).unwrap();
        assert_eq!(items[0].id, "Attention__A_Survey_2020");
        assert_eq!(
            items[0].destination,
            out_dir().join("Attention__A_Survey_2020.pdf")
        );
    }

    #[test]
    fn test_rows_without_link_are_skipped() {
        let rows = vec![
            header(),
            vec![s("No Link"), s("2019"), Data::Empty],
            vec![s("Blank Link"), s("2019"), s("   ")],
            vec![s("Numeric Link"), s("2019"), Data::Float(12.0)],
            vec![s("Good"), s("2019"), s("https://example.com/good.pdf")],
        ];

        let items = items_from_rows(&rows, &out_dir()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "good");
    }

    #[test]
    fn test_duplicate_destinations_dropped() {
        let rows = vec![
            header(),
            vec![s("First"), s("2018"), s("https://a.com/paper.pdf")],
            vec![s("Second"), s("2018"), s("https://b.com/paper.pdf")],
        ];

        let items = items_from_rows(&rows, &out_dir()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, "https://a.com/paper.pdf");
    }

    #[test]
    fn test_missing_link_column_is_fatal() {
        let rows = vec![vec![s("Title"), s("Year")], vec![s("A"), s("2020")]];

        let err = items_from_rows(&rows, &out_dir()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingColumn { ref name } if name == "Link"
        ));
    }

    #[test]
    fn test_missing_title_column_tolerated() {
        let rows = vec![
            vec![s("Link")],
            vec![s("https://example.com/fetch")],
        ];

        let items = items_from_rows(&rows, &out_dir()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "paper_2_unknown");
    }

    #[test]
    fn test_pdf_suffix_appended() {
        let rows = vec![
            header(),
            vec![s("Tarball"), s("2017"), s("https://example.com/archive.tar")],
        ];

        let items = items_from_rows(&rows, &out_dir()).unwrap();
        assert_eq!(items[0].destination, out_dir().join("archive.tar.pdf"));
    }

    #[test]
    fn test_sanitize_keeps_word_characters() {
        assert_eq!(sanitize("A Study: of/things"), "A_Study__of_things");
        assert_eq!(sanitize("già-nota_2"), "già-nota_2");
    }
}
