use crate::error::{DirstitchError, Result};
use crate::ignore_rules::IgnoreRuleSet;
use globset::GlobSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Reads the contents of a text file at the given path
///
/// # Errors
///
/// - `DirstitchError::FileNotFound` if the path doesn't exist or isn't a file.
/// - `DirstitchError::Io` if there's an error reading the file, including
///   content that is not valid UTF-8.
pub fn read_file_contents(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(DirstitchError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    fs::read_to_string(path).map_err(Into::into)
}

/// Checks that `path` exists and is a directory
///
/// # Errors
///
/// Returns `DirstitchError::DirectoryNotFound` otherwise.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(DirstitchError::DirectoryNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Renders a path relative to `base_dir` with forward slashes.
///
/// Returns `None` when `path` is not under `base_dir`. The base directory
/// itself renders as an empty string.
#[must_use]
pub fn relative_posix_path(path: &Path, base_dir: &Path) -> Option<String> {
    let relative = path.strip_prefix(base_dir).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}

/// Filter predicate applied to both directories and files during the walk.
///
/// A path is excluded when its base name starts with `.` or when its
/// relative path matches the ignore rules.
#[must_use]
pub fn should_include(path: &Path, base_dir: &Path, rules: &IgnoreRuleSet, is_dir: bool) -> bool {
    let Ok(relative) = path.strip_prefix(base_dir) else {
        return false;
    };

    if let Some(name) = path.file_name()
        && name.to_string_lossy().starts_with('.')
    {
        return false;
    }

    !rules.is_ignored(relative, is_dir)
}

/// Returns true if `relative_path` matches any of the extra exclude globs
#[must_use]
pub fn is_excluded(relative_path: &str, exclude: Option<&GlobSet>) -> bool {
    exclude.is_some_and(|set| set.is_match(relative_path))
}

/// Normalizes a user-supplied extension to its dotted form (`py` -> `.py`)
#[must_use]
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim();
    if trimmed.is_empty() || trimmed.starts_with('.') {
        trimmed.to_string()
    } else {
        format!(".{trimmed}")
    }
}

/// Checks a file name against a dotted allow-list; an empty list allows everything
#[must_use]
pub fn has_allowed_extension(path: &Path, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }

    let Some(extension) = path.extension() else {
        return false;
    };
    let dotted = format!(".{}", extension.to_string_lossy());
    allowed.iter().any(|candidate| *candidate == dotted)
}

/// Resolves a section path from a concatenated document under `output_dir`.
///
/// Only plain relative paths are accepted so that splitting never writes
/// outside the output directory.
///
/// # Errors
///
/// Returns `DirstitchError::PathTraversal` for empty or absolute paths and
/// for paths containing `..`.
pub fn resolve_output_path(relative_path: &str, output_dir: &Path) -> Result<PathBuf> {
    let candidate = Path::new(relative_path);
    let is_plain = !relative_path.is_empty()
        && candidate
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
        && candidate
            .components()
            .any(|component| matches!(component, Component::Normal(_)));

    if !is_plain {
        return Err(DirstitchError::PathTraversal {
            path: candidate.to_path_buf(),
        });
    }

    Ok(output_dir.join(candidate))
}
