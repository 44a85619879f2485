use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dirstitch operations
#[derive(Error, Debug)]
pub enum DirstitchError {
    /// IO error when reading or writing files and directories
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// File not found error with specific path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Directory not found error with specific path
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// A split section names a path outside the output directory
    #[error("Path escapes the output directory: {path}")]
    PathTraversal { path: PathBuf },

    /// Invalid exclude glob
    #[error("Glob error: {0}")]
    Glob(#[from] globset::Error),
}

pub type Result<T> = std::result::Result<T, DirstitchError>;
