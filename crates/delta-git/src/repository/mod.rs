mod branch;
mod commit;
mod diff;
mod remote;
mod staging;
mod status;

use std::path::{Path, PathBuf};

use crate::{GitError, Result};

pub struct Repository {
    pub(crate) inner: git2::Repository,
    root: PathBuf,
}

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::NotARepository`] if the path is not inside a git repository.
    pub fn open(path: &Path) -> Result<Self> {
        let inner = git2::Repository::discover(path).map_err(|_| GitError::NotARepository {
            path: path.to_path_buf(),
        })?;
        Self::from_inner(inner, path)
    }

    /// Creates a new repository at `path`, like `git init`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be created.
    pub fn init(path: &Path) -> Result<Self> {
        let inner = git2::Repository::init(path)?;
        Self::from_inner(inner, path)
    }

    fn from_inner(inner: git2::Repository, path: &Path) -> Result<Self> {
        let root = inner.workdir().ok_or_else(|| GitError::NotARepository {
            path: path.to_path_buf(),
        })?;

        // Strip the \\?\ prefix Windows puts on workdir paths.
        let root = dunce::simplified(root).to_path_buf();

        Ok(Self { inner, root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}
