//! Error types for the harness
//!
//! Only [`SanityError`] is fatal to a run. [`LoadError`]s are downgraded by the driver to invalid-file entries, and
//! assertion failures or procedure panics never surface as errors at all.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::scanner::ScanError;

/// Errors that abort a run before or during discovery.
#[derive(Debug, Error, Diagnostic)]
pub enum SanityError {
    #[error("The root path provided does not exist: {}", .0.display())]
    #[diagnostic(code(sanity::root_not_found), help("pass the directory to search for test files"))]
    RootNotFound(PathBuf),

    #[error("The root path provided is not a directory: {}", .0.display())]
    #[diagnostic(code(sanity::root_not_directory), help("pass the directory to search for test files"))]
    RootNotDirectory(PathBuf),

    #[error("The config file path provided is not valid: {}", .0.display())]
    #[diagnostic(code(sanity::config_not_found))]
    ConfigNotFound(PathBuf),

    #[error("failed to load config file {}", path.display())]
    #[diagnostic(
        code(sanity::config_load),
        help("config files are JSON objects such as {{\"testFileExtension\": \".test.json\"}}")
    )]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error(transparent)]
    #[diagnostic(code(sanity::scan))]
    Scan(#[from] ScanError),

    #[error("failed to write report: {0}")]
    #[diagnostic(code(sanity::report))]
    Report(#[from] io::Error),
}

/// Errors produced while turning a file into a test collection or a configuration.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

impl LoadError {
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        LoadError::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The error without its path, for listings that already show the path.
    pub fn reason(&self) -> String {
        match self {
            LoadError::Read { source, .. } => format!("failed to read: {source}"),
            LoadError::Json { source, .. } => format!("invalid JSON: {source}"),
            LoadError::Malformed { message, .. } => message.clone(),
        }
    }
}
