//! # dirstitch
//!
//! Concatenates the text files of a directory tree into a single annotated
//! document for Large Language Model context windows, and splits such a
//! document back into a directory tree.
//!
//! ## Document format
//!
//! Every included file becomes one section:
//!
//! ```text
//!
//! // File: relative/path/to/file.py
//! <file content>
//!
//! ```
//!
//! Sections are joined without further separators. Splitting cuts the document
//! on the literal `\n// File: ` token, so file content containing that token
//! cannot be round-tripped.
//!
//! ## Filtering
//!
//! - Names starting with `.` are skipped (files and whole directories)
//! - `.gitignore` patterns of the input directory apply, or a built-in default
//!   set when the file is missing or empty
//! - Only files with an allowed extension are included (`.py`, `.js`, `.ts`,
//!   `.jsx`, `.tsx`, `.css`, `.scss`, `.html` by default)
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```no_run
//! use dirstitch::{ConcatConfig, concatenate, split};
//! use std::path::Path;
//!
//! let config = ConcatConfig::default().with_extensions(["rs", "toml"]);
//! let document = concatenate(Path::new("my_project"), None, &config);
//! println!("{document}");
//!
//! std::fs::write("context.txt", &document)?;
//! let report = split(Path::new("context.txt"), Path::new("restored"))?;
//! println!("{} files restored", report.written.len());
//! # Ok::<(), dirstitch::DirstitchError>(())
//! ```
//!
//! ### As a CLI Tool
//!
//! ```bash
//! # Concatenate a project
//! dirstitch --mode concat --input my_project --output context.txt
//!
//! # Only Rust sources
//! dirstitch --mode concat -i my_project -o context.txt --extensions .rs
//!
//! # Split it back
//! dirstitch --mode split --input context.txt --output restored/
//! ```

pub mod concat;
pub mod error;
pub mod fs_utils;
pub mod ignore_rules;
pub mod split;

// Re-export main types and functions for convenience
pub use concat::{
    ConcatConfig, DEFAULT_EXTENSIONS, FILE_MARKER, FileRecord, collect_records, concatenate,
    render_document,
};
pub use error::{DirstitchError, Result};
pub use fs_utils::should_include;
pub use ignore_rules::{
    DEFAULT_IGNORE_PATTERNS, IgnoreRuleSet, RuleSource, load_ignore_rules,
};
pub use split::{SECTION_DELIMITER, SplitReport, parse_document, split, write_records};
