use tracing::debug;

use crate::{CommitInfo, Result};

use super::Repository;

impl Repository {
    /// Commits the current index on HEAD. Works on an unborn branch too.
    ///
    /// # Errors
    ///
    /// Returns an error if no signature is configured or the commit cannot be created.
    pub fn commit(&self, message: &str) -> Result<CommitInfo> {
        let sig = self.inner.signature()?;
        let mut index = self.inner.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.inner.find_tree(tree_id)?;

        let parent = self.inner.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let commit_oid = self
            .inner
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;

        let sha = commit_oid.to_string();
        debug!(sha = %sha, "created commit");

        Ok(CommitInfo {
            sha,
            message: message.to_string(),
        })
    }
}
