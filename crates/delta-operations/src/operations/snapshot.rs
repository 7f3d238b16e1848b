use std::path::PathBuf;
use std::sync::Arc;

use delta_git::CommitInfo;
use tracing::info;

use super::retrieve::retrieve_quietly;
use crate::traits::{MetadataRetriever, VcsProvider};
use crate::{OperationError, Result};

#[derive(Debug, Clone)]
pub struct SnapshotInput {
    pub repo_root: PathBuf,
    pub branch: String,
    pub org: String,
    pub metadata_types: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct SnapshotOutput {
    pub branch: String,
    /// Whether the branch had to be created.
    pub created_branch: bool,
    pub retrieved: Vec<String>,
    pub commit: CommitInfo,
}

/// Records an org's current metadata as a commit on a branch.
pub struct SnapshotOperation<R, V> {
    retriever: Arc<R>,
    vcs: Arc<V>,
}

impl<R, V> SnapshotOperation<R, V>
where
    R: MetadataRetriever,
    V: VcsProvider,
{
    pub fn new(retriever: Arc<R>, vcs: Arc<V>) -> Self {
        Self { retriever, vcs }
    }

    /// # Errors
    ///
    /// Returns [`OperationError::DirtyWorkingTree`] if the repository has
    /// uncommitted changes, or the first failing backend call's error.
    pub fn execute(&self, input: &SnapshotInput) -> Result<SnapshotOutput> {
        let root = input.repo_root.as_path();
        if !self.vcs.is_working_tree_clean(root)? {
            return Err(OperationError::DirtyWorkingTree);
        }

        let exists = self
            .vcs
            .branches(root)?
            .iter()
            .any(|b| *b == input.branch);
        if exists {
            self.vcs.checkout_branch(root, &input.branch)?;
        } else {
            self.vcs.create_branch(root, &input.branch)?;
        }
        info!(branch = %input.branch, created = !exists, "switched branch");

        let retrieved =
            retrieve_quietly(self.retriever.as_ref(), &input.org, &input.metadata_types, root)?;

        self.vcs.stage_all(root)?;
        let commit = self.vcs.commit(root, &input.message)?;
        info!(sha = %commit.sha, branch = %input.branch, "committed snapshot");

        Ok(SnapshotOutput {
            branch: input.branch.clone(),
            created_branch: !exists,
            retrieved,
            commit,
        })
    }
}
