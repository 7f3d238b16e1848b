use std::path::Path;

use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::DetachedHead`] if HEAD is not on a branch.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.inner.head()?;

        if !head.is_branch() {
            return Err(GitError::DetachedHead);
        }

        head.shorthand()
            .map(String::from)
            .ok_or(GitError::DetachedHead)
    }

    /// # Errors
    ///
    /// Returns an error if the git status operation fails.
    pub fn is_working_tree_clean(&self) -> Result<bool> {
        let statuses = self.inner.statuses(Some(
            git2::StatusOptions::new()
                .include_untracked(true)
                .recurse_untracked_dirs(true),
        ))?;

        Ok(statuses.is_empty())
    }

    /// Whether the index holds `relative` itself or any file below it.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be read.
    pub fn tracks_path(&self, relative: &Path) -> Result<bool> {
        let index = self.inner.index()?;
        Ok(index.iter().any(|entry| {
            let path = String::from_utf8_lossy(&entry.path);
            Path::new(path.as_ref()).starts_with(relative)
        }))
    }
}
