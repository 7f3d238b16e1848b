use std::path::Path;

use delta_core::{ChangedFile, DiffFilter};
use delta_git::CommitInfo;

use crate::Result;

/// Version-control backend.
pub trait VcsProvider {
    /// Lists files that differ between `source` and `target`, or between the
    /// working tree and `target` when `source` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OperationError::Backend`] carrying the backend's
    /// diagnostic if the comparison cannot be run.
    fn changed_files(
        &self,
        repo_root: &Path,
        source: Option<&str>,
        target: &str,
        filter: DiffFilter,
    ) -> Result<Vec<ChangedFile>>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be created.
    fn init_repository(&self, path: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the remote cannot be configured.
    fn set_origin(&self, repo_root: &Path, url: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or its status read.
    fn is_working_tree_clean(&self, repo_root: &Path) -> Result<bool>;

    /// Whether `relative` (to `repo_root`) is a tracked file or holds one.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or its index read.
    fn tracks_path(&self, repo_root: &Path, relative: &Path) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the branches cannot be listed.
    fn branches(&self, repo_root: &Path) -> Result<Vec<String>>;

    /// Creates `name` at HEAD and checks it out.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch exists or cannot be checked out.
    fn create_branch(&self, repo_root: &Path, name: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the branch does not exist or checkout would
    /// overwrite local changes.
    fn checkout_branch(&self, repo_root: &Path, name: &str) -> Result<()>;

    /// Stages every change in the working tree, including deletions.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be updated.
    fn stage_all(&self, repo_root: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the commit cannot be created.
    fn commit(&self, repo_root: &Path, message: &str) -> Result<CommitInfo>;
}
