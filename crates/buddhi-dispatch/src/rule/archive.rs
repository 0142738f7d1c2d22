//! ZIP archive + CSV column value extraction.
//!
//! The upload is written to a scratch directory, extracted in full, and the
//! first `.csv` found (walking in file-name order) is read. Only the first
//! data row is consulted.

use std::fs::File;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use buddhi_core::types::Upload;

use crate::error::DispatchError;
use crate::patterns;
use crate::rule::AnswerRule;
use crate::types::{RuleKind, RuleOutcome};

/// Name used for the staged upload when the client sent none.
const DEFAULT_ARCHIVE_NAME: &str = "upload.zip";

/// Handles "download and unzip ... what is the value in the X column" questions.
#[derive(Debug)]
pub struct ArchiveValueRule {
    max_extracted_bytes: u64,
}

impl ArchiveValueRule {
    /// Create a rule that refuses archives whose entries declare more than
    /// `max_extracted_bytes` in total.
    pub fn new(max_extracted_bytes: u64) -> Self {
        Self {
            max_extracted_bytes,
        }
    }
}

/// Extract the upload as a ZIP archive and read `column` from the first row of
/// the first CSV inside it.
///
/// The upload and the extracted tree live in separate subdirectories of one
/// scratch directory, so no client file name can collide with the tree.
pub fn extract_column_value(
    upload: &Upload,
    column: &str,
    max_extracted_bytes: u64,
) -> Result<String, DispatchError> {
    let scratch = tempfile::tempdir()?;
    let upload_dir = scratch.path().join("upload");
    let extract_dir = scratch.path().join("extracted");
    std::fs::create_dir_all(&upload_dir)?;
    std::fs::create_dir_all(&extract_dir)?;

    let archive_path = upload_dir.join(upload.safe_filename(DEFAULT_ARCHIVE_NAME));
    std::fs::write(&archive_path, &upload.bytes)?;

    let mut archive = zip::ZipArchive::new(File::open(&archive_path)?)?;
    check_extracted_size(&mut archive, max_extracted_bytes)?;
    archive.extract(&extract_dir)?;
    tracing::debug!(entries = archive.len(), "Archive extracted");

    let csv_path = find_first_csv(&extract_dir).ok_or(DispatchError::NoCsvFile)?;
    tracing::debug!(path = %csv_path.display(), column = %column, "Reading CSV");
    read_first_value(&csv_path, column)
}

/// Reject archives whose declared uncompressed size exceeds `limit`.
fn check_extracted_size<R>(
    archive: &mut zip::ZipArchive<R>,
    limit: u64,
) -> Result<(), DispatchError>
where
    R: std::io::Read + std::io::Seek,
{
    let mut total: u64 = 0;
    for index in 0..archive.len() {
        let size = archive.by_index_raw(index)?.size();
        total = total
            .checked_add(size)
            .filter(|t| *t <= limit)
            .ok_or(DispatchError::ArchiveTooLarge(limit))?;
    }
    Ok(())
}

/// First `.csv` file under `dir`, walking entries sorted by file name.
///
/// macOS resource forks (`__MACOSX/`, `._*`) are skipped.
fn find_first_csv(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != "__MACOSX")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .find(|entry| {
            let name = entry.file_name().to_string_lossy();
            !name.starts_with("._") && name.ends_with(".csv")
        })
        .map(|entry| entry.into_path())
}

fn read_first_value(path: &Path, column: &str) -> Result<String, DispatchError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let index = reader
        .headers()?
        .iter()
        .position(|header| header.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| DispatchError::MissingColumn(column.to_string()))?;

    let record = reader.records().next().ok_or(DispatchError::EmptyCsv)??;
    Ok(record.get(index).unwrap_or_default().to_string())
}

/// Message shown to the caller for an extraction failure.
fn failure_message(err: &DispatchError) -> String {
    match err {
        DispatchError::NoCsvFile | DispatchError::MissingColumn(_) => err.to_string(),
        other => format!("Error processing file: {}", other),
    }
}

#[async_trait]
impl AnswerRule for ArchiveValueRule {
    fn kind(&self) -> RuleKind {
        RuleKind::ArchiveValue
    }

    fn matches(&self, question: &str, upload: Option<&Upload>) -> bool {
        upload.is_some() && patterns::is_archive_question(question)
    }

    async fn answer(&self, question: &str, upload: Option<&Upload>) -> RuleOutcome {
        let Some(upload) = upload else {
            return RuleOutcome::NotApplicable;
        };
        let column = patterns::extract_column_name(question);
        let upload = upload.clone();
        let limit = self.max_extracted_bytes;

        let result =
            tokio::task::spawn_blocking(move || extract_column_value(&upload, &column, limit))
                .await;

        match result {
            Ok(Ok(value)) => RuleOutcome::Answered(value),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Archive extraction failed");
                RuleOutcome::Failed(failure_message(&e))
            }
            Err(e) => {
                tracing::error!(error = %e, "Archive extraction task panicked");
                RuleOutcome::Failed(format!("Error processing file: {}", e))
            }
        }
    }
}
