use crate::fs_utils::{
    ensure_directory, has_allowed_extension, is_excluded, normalize_extension, read_file_contents,
    relative_posix_path, should_include,
};
use crate::ignore_rules::{IgnoreRuleSet, load_ignore_rules};
use globset::GlobSet;
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Marker that opens every section of a concatenated document
pub const FILE_MARKER: &str = "// File: ";

/// Extensions included when the caller does not override the allow-list
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".ts", ".jsx", ".tsx", ".css", ".scss", ".html",
];

/// Configuration for concatenating a directory
#[derive(Debug, Clone)]
pub struct ConcatConfig {
    /// Dotted extensions to include; an empty list disables extension filtering
    pub allowed_extensions: Vec<String>,
    /// Whether to read the directory's `.gitignore` (defaults are used otherwise)
    pub use_gitignore: bool,
    /// Extra globs matched against relative paths
    pub exclude: Option<GlobSet>,
}

impl Default for ConcatConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: DEFAULT_EXTENSIONS
                .iter()
                .map(|e| (*e).to_string())
                .collect(),
            use_gitignore: true,
            exclude: None,
        }
    }
}

impl ConcatConfig {
    /// Replaces the allow-list, normalizing `py` to `.py`
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        self
    }
}

/// A file selected for concatenation, or recovered from a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Forward-slash path relative to the concatenated directory
    pub relative_path: String,
    pub content: String,
}

impl FileRecord {
    /// Renders this record as one document section
    #[must_use]
    pub fn to_section(&self) -> String {
        format!("\n{FILE_MARKER}{}\n{}\n", self.relative_path, self.content)
    }
}

// Files of a directory come before its subdirectories, each group sorted by name.
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Walks `directory` and returns every file that passes the filters, in walk order.
///
/// Returns nothing if `directory` is not a directory. Directories failing the
/// filter predicate are pruned without descending.
/// Unreadable files are logged and skipped.
#[must_use]
pub fn collect_records(directory: &Path, config: &ConcatConfig) -> Vec<FileRecord> {
    if let Err(e) = ensure_directory(directory) {
        log::error!("Error reading input directory: {e}");
        return Vec::new();
    }

    let rules = if config.use_gitignore {
        load_ignore_rules(directory)
    } else {
        IgnoreRuleSet::defaults(directory)
    };
    let exclude = config.exclude.as_ref();

    let walker = WalkDir::new(directory)
        .sort_by(files_first)
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().is_dir();
            if !should_include(entry.path(), directory, &rules, is_dir) {
                log::debug!("Skipping {} (hidden or ignored)", entry.path().display());
                return false;
            }
            match relative_posix_path(entry.path(), directory) {
                Some(relative) if is_excluded(&relative, exclude) => {
                    log::debug!("Skipping {} (excluded)", entry.path().display());
                    false
                }
                _ => true,
            }
        });

    let mut records = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Failed to read directory entry: {e}");
                continue;
            }
        };

        let entry_path = entry.path();
        if entry.file_type().is_dir() || !entry_path.is_file() {
            continue;
        }

        if !has_allowed_extension(entry_path, &config.allowed_extensions) {
            log::trace!("Skipping {} (extension)", entry_path.display());
            continue;
        }

        let Some(relative_path) = relative_posix_path(entry_path, directory) else {
            continue;
        };

        match read_file_contents(entry_path) {
            Ok(content) => {
                log::debug!("Including {relative_path}");
                records.push(FileRecord {
                    relative_path,
                    content,
                });
            }
            Err(e) => {
                log::error!("Error processing {}: {e}", entry_path.display());
            }
        }
    }

    records
}

/// Joins records into a single document; sections carry their own separators
#[must_use]
pub fn render_document(records: &[FileRecord]) -> String {
    records.iter().map(FileRecord::to_section).collect()
}

/// Concatenates the text files of `directory` into one annotated document.
///
/// When `output` is given the document is also written there; a write
/// failure is logged and the document is still returned.
#[must_use]
pub fn concatenate(directory: &Path, output: Option<&Path>, config: &ConcatConfig) -> String {
    log::debug!("Concatenating {}", directory.display());
    let records = collect_records(directory, config);
    let document = render_document(&records);
    log::debug!("Collected {} files", records.len());

    if let Some(output_path) = output {
        match fs::write(output_path, &document) {
            Ok(()) => log::info!("Output written to {}", output_path.display()),
            Err(e) => log::error!("Error writing output file {}: {e}", output_path.display()),
        }
    }

    document
}
