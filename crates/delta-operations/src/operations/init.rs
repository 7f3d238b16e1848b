use std::path::{Path, PathBuf};
use std::sync::Arc;

use delta_git::CommitInfo;
use tracing::info;

use super::retrieve::retrieve_quietly;
use crate::Result;
use crate::traits::{MetadataRetriever, ProjectScaffolder, VcsProvider};

const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

#[derive(Debug, Clone)]
pub struct InitInput {
    pub parent_dir: PathBuf,
    pub name: String,
    pub org: String,
    pub metadata_types: Vec<String>,
    /// Remote configured as `origin`, if any.
    pub remote: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InitOutput {
    pub project_dir: PathBuf,
    pub retrieved: Vec<String>,
    pub commit: CommitInfo,
}

/// Scaffolds a project, fills it from an org and puts it under version control.
pub struct InitOperation<S, R, V> {
    scaffolder: Arc<S>,
    retriever: Arc<R>,
    vcs: Arc<V>,
}

impl<S, R, V> InitOperation<S, R, V>
where
    S: ProjectScaffolder,
    R: MetadataRetriever,
    V: VcsProvider,
{
    pub fn new(scaffolder: Arc<S>, retriever: Arc<R>, vcs: Arc<V>) -> Self {
        Self {
            scaffolder,
            retriever,
            vcs,
        }
    }

    /// # Errors
    ///
    /// Returns the first failing step's error. Steps already done are not
    /// undone.
    pub fn execute(&self, input: &InitInput) -> Result<InitOutput> {
        self.scaffolder
            .create_project(&input.parent_dir, &input.name)?;
        let project_dir = input.parent_dir.join(&input.name);
        info!(project = %project_dir.display(), "created project");

        let retrieved = retrieve_quietly(
            self.retriever.as_ref(),
            &input.org,
            &input.metadata_types,
            &project_dir,
        )?;

        let commit = self.commit_project(&project_dir, input.remote.as_deref())?;
        info!(sha = %commit.sha, "committed initial snapshot");

        Ok(InitOutput {
            project_dir,
            retrieved,
            commit,
        })
    }

    fn commit_project(&self, project_dir: &Path, remote: Option<&str>) -> Result<CommitInfo> {
        self.vcs.init_repository(project_dir)?;
        if let Some(url) = remote {
            self.vcs.set_origin(project_dir, url)?;
        }
        self.vcs.stage_all(project_dir)?;
        self.vcs.commit(project_dir, INITIAL_COMMIT_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OperationError;
    use crate::mocks::{MockMetadataBackend, MockScaffolder, MockVcs};
    use tempfile::TempDir;

    fn input(parent: &Path, remote: Option<&str>) -> InitInput {
        InitInput {
            parent_dir: parent.to_path_buf(),
            name: "acme".to_string(),
            org: "prod".to_string(),
            metadata_types: vec!["ApexClass".to_string()],
            remote: remote.map(str::to_string),
        }
    }

    #[test]
    fn scaffolds_retrieves_and_commits() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let scaffolder = Arc::new(MockScaffolder::new());
        let backend = Arc::new(
            MockMetadataBackend::new()
                .with_retrieved_file("force-app/main/default/classes/A.cls", "class A {}")
                .with_retrieve_lines(&["A.cls"]),
        );
        let vcs = Arc::new(MockVcs::new());
        let op = InitOperation::new(
            Arc::clone(&scaffolder),
            Arc::clone(&backend),
            Arc::clone(&vcs),
        );

        let output = op.execute(&input(dir.path(), Some("git@example.com:acme.git")))?;

        let project = dir.path().join("acme");
        assert_eq!(output.project_dir, project);
        assert_eq!(output.retrieved, vec!["A.cls"]);
        assert!(project.join("force-app/main/default/classes/A.cls").is_file());
        assert_eq!(backend.retrievals()[0].2, project);
        assert_eq!(vcs.initialized(), vec![project]);
        assert_eq!(vcs.origins(), vec!["git@example.com:acme.git"]);
        assert_eq!(vcs.stage_calls(), 1);
        assert_eq!(vcs.commits(), vec!["Initial commit"]);
        assert_eq!(output.commit.message, "Initial commit");
        Ok(())
    }

    #[test]
    fn remote_is_optional() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let vcs = Arc::new(MockVcs::new());
        let op = InitOperation::new(
            Arc::new(MockScaffolder::new()),
            Arc::new(MockMetadataBackend::new()),
            Arc::clone(&vcs),
        );

        op.execute(&input(dir.path(), None))?;

        assert!(vcs.origins().is_empty());
        assert_eq!(vcs.commits().len(), 1);
        Ok(())
    }

    #[test]
    fn scaffold_failure_stops_before_retrieval() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let backend = Arc::new(MockMetadataBackend::new());
        let vcs = Arc::new(MockVcs::new());
        let op = InitOperation::new(
            Arc::new(MockScaffolder::new().failing(1, "name already in use")),
            Arc::clone(&backend),
            Arc::clone(&vcs),
        );

        let result = op.execute(&input(dir.path(), None));

        assert!(matches!(
            result,
            Err(OperationError::ProjectCreate { status: 1, .. })
        ));
        assert!(backend.retrievals().is_empty());
        assert!(vcs.initialized().is_empty());
        Ok(())
    }

    #[test]
    fn retrieve_failure_leaves_repository_uninitialized() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let vcs = Arc::new(MockVcs::new());
        let op = InitOperation::new(
            Arc::new(MockScaffolder::new()),
            Arc::new(MockMetadataBackend::new().failing_retrieve("expired session")),
            Arc::clone(&vcs),
        );

        let result = op.execute(&input(dir.path(), None));

        assert!(matches!(result, Err(OperationError::Backend { .. })));
        assert!(vcs.initialized().is_empty());
        assert!(vcs.commits().is_empty());
        Ok(())
    }
}
