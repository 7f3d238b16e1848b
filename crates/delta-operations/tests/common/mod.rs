#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use delta_core::TestLevel;
use delta_operations::traits::{DeployReport, DeploySubmission, Deployer, FormatConverter};
use delta_operations::{OperationError, Result};
use tempfile::TempDir;

pub const CLASSES: &str = "force-app/main/default/classes";

/// A throwaway repository with one initial commit.
pub struct GitFixture {
    pub dir: TempDir,
    pub repo: git2::Repository,
}

impl GitFixture {
    pub fn new() -> anyhow::Result<Self> {
        Self::init(TempDir::new()?)
    }

    /// A repository created as a subdirectory of `parent`.
    pub fn new_in(parent: &Path) -> anyhow::Result<Self> {
        Self::init(TempDir::new_in(parent)?)
    }

    fn init(dir: TempDir) -> anyhow::Result<Self> {
        let repo = git2::Repository::init(dir.path())?;
        {
            let mut config = repo.config()?;
            config.set_str("user.name", "Test")?;
            config.set_str("user.email", "test@example.com")?;
        }
        let fixture = Self { dir, repo };
        fixture.write("sfdx-project.json", r#"{"packageDirectories":[{"path":"force-app"}]}"#)?;
        fixture.write("README.md", "baseline")?;
        fixture.commit_all("Initial commit")?;
        Ok(fixture)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, content: &str) -> anyhow::Result<()> {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Writes `<name>.cls` and its descriptor with content unique to `name`.
    pub fn write_class(&self, name: &str) -> anyhow::Result<()> {
        self.write(
            &format!("{CLASSES}/{name}.cls"),
            &format!("public with sharing class {name} {{\n}}\n"),
        )?;
        self.write(
            &format!("{CLASSES}/{name}.cls-meta.xml"),
            &format!("<ApexClass><!-- {name} --><apiVersion>58.0</apiVersion></ApexClass>\n"),
        )
    }

    pub fn commit_all(&self, message: &str) -> anyhow::Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;
        let tree = self.repo.find_tree(index.write_tree()?)?;
        let sig = self.repo.signature()?;
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub package_dir: PathBuf,
    pub org: String,
    pub scope: String,
    pub test_level: TestLevel,
    pub check_only: bool,
}

/// Converter and deployer that records what it was asked to do.
#[derive(Default)]
pub struct RecordingBackend {
    pub deploy_failure: Option<String>,
    conversions: Mutex<Vec<(PathBuf, PathBuf, PathBuf)>>,
    submissions: Mutex<Vec<Submitted>>,
}

impl RecordingBackend {
    pub fn failing_deploy(diagnostic: &str) -> Self {
        Self {
            deploy_failure: Some(diagnostic.to_string()),
            ..Self::default()
        }
    }

    pub fn conversions(&self) -> Vec<(PathBuf, PathBuf, PathBuf)> {
        self.conversions.lock().expect("lock poisoned").clone()
    }

    pub fn submissions(&self) -> Vec<Submitted> {
        self.submissions.lock().expect("lock poisoned").clone()
    }
}

impl FormatConverter for RecordingBackend {
    fn convert(&self, project_dir: &Path, source_root: &Path, output_dir: &Path) -> Result<()> {
        self.conversions.lock().expect("lock poisoned").push((
            project_dir.to_path_buf(),
            source_root.to_path_buf(),
            output_dir.to_path_buf(),
        ));
        fs::create_dir_all(output_dir)?;
        fs::write(output_dir.join("package.xml"), "<Package/>")?;
        Ok(())
    }
}

impl Deployer for RecordingBackend {
    fn deploy(&self, submission: &DeploySubmission<'_>) -> Result<DeployReport> {
        self.submissions.lock().expect("lock poisoned").push(Submitted {
            package_dir: submission.package_dir.to_path_buf(),
            org: submission.org.to_string(),
            scope: submission.scope.serialized().to_string(),
            test_level: submission.test_level,
            check_only: submission.check_only,
        });
        if let Some(diagnostic) = &self.deploy_failure {
            return Err(OperationError::Backend {
                backend: "sfdx",
                diagnostic: diagnostic.clone(),
            });
        }
        Ok(DeployReport {
            package_dir: submission.package_dir.to_path_buf(),
            diagnostic: "Deploy Succeeded.".to_string(),
        })
    }
}
