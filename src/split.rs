use crate::concat::FileRecord;
use crate::error::Result;
use crate::fs_utils::resolve_output_path;
use std::fs;
use std::path::{Path, PathBuf};

/// Literal separator between sections: a newline followed by the file marker
pub const SECTION_DELIMITER: &str = "\n// File: ";

/// Outcome of splitting a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Files written, in document order
    pub written: Vec<PathBuf>,
    /// Sections that could not be written
    pub failed: Vec<PathBuf>,
}

/// Parses a concatenated document back into records.
///
/// The document is split on [`SECTION_DELIMITER`]. A leading chunk that is
/// only whitespace is dropped. Each chunk's first line is the path and the
/// rest, with trailing whitespace removed, is the content. Chunks without a
/// newline carry no content and are skipped.
#[must_use]
pub fn parse_document(document: &str) -> Vec<FileRecord> {
    let mut chunks = document.split(SECTION_DELIMITER).peekable();

    if chunks.peek().is_some_and(|first| first.trim().is_empty()) {
        chunks.next();
    }

    chunks
        .filter_map(|chunk| chunk.split_once('\n'))
        .map(|(path, rest)| FileRecord {
            relative_path: path.to_string(),
            content: rest.trim_end().to_string(),
        })
        .collect()
}

/// Writes one record under `output_dir`, creating parent directories
fn write_record(record: &FileRecord, output_dir: &Path) -> Result<PathBuf> {
    let output_path = resolve_output_path(&record.relative_path, output_dir)?;
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_path, &record.content)?;
    Ok(output_path)
}

/// Writes every record under `output_dir`.
///
/// A failed section is logged and recorded in the report; the remaining
/// sections are still written.
#[must_use]
pub fn write_records(records: &[FileRecord], output_dir: &Path) -> SplitReport {
    let mut report = SplitReport::default();

    for record in records {
        match write_record(record, output_dir) {
            Ok(path) => {
                log::info!("Written: {}", path.display());
                report.written.push(path);
            }
            Err(e) => {
                let target = output_dir.join(&record.relative_path);
                log::error!("Error writing {}: {e}", target.display());
                report.failed.push(target);
            }
        }
    }

    report
}

/// Splits the concatenated document at `input` into files under `output_dir`.
///
/// # Errors
///
/// Returns an error only if the input document cannot be read; nothing is
/// written in that case. Per-file failures are reported in [`SplitReport`].
pub fn split(input: &Path, output_dir: &Path) -> Result<SplitReport> {
    let document = fs::read_to_string(input)?;
    let records = parse_document(&document);
    log::debug!("Found {} sections in {}", records.len(), input.display());
    Ok(write_records(&records, output_dir))
}
