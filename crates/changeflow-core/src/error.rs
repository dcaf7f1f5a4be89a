use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangeflowError {
    #[error("not initialized: run 'changeflow init'")]
    NotInitialized,

    #[error("change not found: {0}")]
    ChangeNotFound(String),

    #[error("change already exists: {0}")]
    ChangeExists(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid task filename: {0}")]
    InvalidTaskFilename(String),

    #[error("change '{0}' already has the maximum of 999 task files")]
    TaskLimitReached(String),

    #[error("no status field: expected a 'status:' line at the top of the task file")]
    MissingStatus,

    #[error("invalid status '{0}': expected to-do, in-progress, or done")]
    InvalidStatus(String),

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl ChangeflowError {
    /// Map an I/O error on `path` to the taxonomy, surfacing permission
    /// failures as their own variant so callers can report them distinctly.
    pub fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            ChangeflowError::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else {
            ChangeflowError::Io(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, ChangeflowError>;
