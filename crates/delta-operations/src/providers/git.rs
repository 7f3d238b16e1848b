use std::path::Path;

use delta_core::{ChangedFile, DiffFilter};
use delta_git::{CommitInfo, Repository};

use crate::traits::VcsProvider;
use crate::{OperationError, Result};

const BACKEND: &str = "git";

pub struct Git2Provider;

impl Git2Provider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Git2Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl VcsProvider for Git2Provider {
    fn changed_files(
        &self,
        repo_root: &Path,
        source: Option<&str>,
        target: &str,
        filter: DiffFilter,
    ) -> Result<Vec<ChangedFile>> {
        Repository::open(repo_root)
            .and_then(|repo| repo.changed_files(source, target, filter))
            .map_err(|e| OperationError::backend(BACKEND, &e.to_string()))
    }

    fn init_repository(&self, path: &Path) -> Result<()> {
        Repository::init(path)?;
        Ok(())
    }

    fn set_origin(&self, repo_root: &Path, url: &str) -> Result<()> {
        let repo = Repository::open(repo_root)?;
        Ok(repo.set_origin(url)?)
    }

    fn is_working_tree_clean(&self, repo_root: &Path) -> Result<bool> {
        let repo = Repository::open(repo_root)?;
        Ok(repo.is_working_tree_clean()?)
    }

    fn tracks_path(&self, repo_root: &Path, relative: &Path) -> Result<bool> {
        let repo = Repository::open(repo_root)?;
        Ok(repo.tracks_path(relative)?)
    }

    fn branches(&self, repo_root: &Path) -> Result<Vec<String>> {
        let repo = Repository::open(repo_root)?;
        Ok(repo.branches()?)
    }

    fn create_branch(&self, repo_root: &Path, name: &str) -> Result<()> {
        let repo = Repository::open(repo_root)?;
        Ok(repo.create_branch(name)?)
    }

    fn checkout_branch(&self, repo_root: &Path, name: &str) -> Result<()> {
        let repo = Repository::open(repo_root)?;
        Ok(repo.checkout_branch(name)?)
    }

    fn stage_all(&self, repo_root: &Path) -> Result<()> {
        let repo = Repository::open(repo_root)?;
        Ok(repo.stage_all()?)
    }

    fn commit(&self, repo_root: &Path, message: &str) -> Result<CommitInfo> {
        let repo = Repository::open(repo_root)?;
        Ok(repo.commit(message)?)
    }
}
