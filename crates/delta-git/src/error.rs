use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("not a git repository: '{path}'")]
    NotARepository { path: PathBuf },

    #[error("failed to resolve revision '{refspec}': {message}")]
    RefNotFound { refspec: String, message: String },

    #[error("HEAD is detached, not on a branch")]
    DetachedHead,

    #[error("diff delta has no file path")]
    MissingDeltaPath,

    #[error("invalid changed path")]
    InvalidPath(#[from] delta_core::CoreError),

    #[error("branch '{0}' already exists")]
    BranchExists(String),

    #[error("branch '{0}' not found")]
    BranchNotFound(String),
}
