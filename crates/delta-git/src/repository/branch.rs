use tracing::debug;

use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// Lists local branch names in name order.
    ///
    /// # Errors
    ///
    /// Returns an error if the branches cannot be enumerated.
    pub fn branches(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for branch in self.inner.branches(Some(git2::BranchType::Local))? {
            let (branch, _) = branch?;
            if let Some(name) = branch.name()? {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Creates `name` at the current HEAD commit and checks it out, like
    /// `git checkout -b`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::BranchExists`] if the branch already exists.
    pub fn create_branch(&self, name: &str) -> Result<()> {
        if self
            .inner
            .find_branch(name, git2::BranchType::Local)
            .is_ok()
        {
            return Err(GitError::BranchExists(name.to_string()));
        }

        let head = self.inner.head()?.peel_to_commit()?;
        self.inner.branch(name, &head, false)?;
        debug!(branch = name, from = %head.id(), "created branch");

        self.checkout_branch(name)
    }

    /// Switches the working tree and HEAD to an existing local branch.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::BranchNotFound`] if no such branch exists, or a git
    /// error if local changes would be overwritten.
    pub fn checkout_branch(&self, name: &str) -> Result<()> {
        let branch = self
            .inner
            .find_branch(name, git2::BranchType::Local)
            .map_err(|_| GitError::BranchNotFound(name.to_string()))?;

        let reference = branch.into_reference();
        let refname = reference
            .name()
            .ok_or_else(|| GitError::BranchNotFound(name.to_string()))?
            .to_string();
        let tree = reference.peel_to_tree()?;

        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.safe();
        self.inner
            .checkout_tree(tree.as_object(), Some(&mut checkout))?;
        self.inner.set_head(&refname)?;
        debug!(branch = name, "checked out branch");

        Ok(())
    }
}
