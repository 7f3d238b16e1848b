use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use delta_core::{ChangedFile, DiffFilter, FileStatus, TestLevel};
use delta_git::CommitInfo;

use crate::providers::{CommandOutput, CommandRunner};
use crate::traits::{
    AuthorizedOrg, DeployReport, DeploySubmission, Deployer, FormatConverter, JwtGrant,
    MetadataRetriever, OrgAuthenticator, OrgManager, OrgSummary, ProjectScaffolder, VcsProvider,
};
use crate::{OperationError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRequest {
    pub source: Option<String>,
    pub target: String,
    pub filter: DiffFilter,
}

pub struct MockVcs {
    changed_files: Vec<ChangedFile>,
    diff_failure: Option<String>,
    clean: bool,
    tracked: Vec<PathBuf>,
    branches: Mutex<Vec<String>>,
    diff_requests: Mutex<Vec<DiffRequest>>,
    initialized: Mutex<Vec<PathBuf>>,
    origins: Mutex<Vec<String>>,
    created_branches: Mutex<Vec<String>>,
    checkouts: Mutex<Vec<String>>,
    stage_calls: Mutex<usize>,
    commits: Mutex<Vec<String>>,
}

impl MockVcs {
    #[must_use]
    pub fn new() -> Self {
        Self {
            changed_files: Vec::new(),
            diff_failure: None,
            clean: true,
            tracked: Vec::new(),
            branches: Mutex::new(vec!["main".to_string()]),
            diff_requests: Mutex::new(Vec::new()),
            initialized: Mutex::new(Vec::new()),
            origins: Mutex::new(Vec::new()),
            created_branches: Mutex::new(Vec::new()),
            checkouts: Mutex::new(Vec::new()),
            stage_calls: Mutex::new(0),
            commits: Mutex::new(Vec::new()),
        }
    }

    /// # Panics
    ///
    /// Panics if a path is empty.
    #[must_use]
    pub fn with_changed_files(mut self, files: Vec<(&str, FileStatus)>) -> Self {
        self.changed_files = files
            .into_iter()
            .map(|(path, status)| ChangedFile::new(path, status).expect("valid path"))
            .collect();
        self
    }

    #[must_use]
    pub fn failing_diff(mut self, diagnostic: &str) -> Self {
        self.diff_failure = Some(diagnostic.to_string());
        self
    }

    #[must_use]
    pub fn is_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    #[must_use]
    pub fn with_tracked(mut self, paths: &[&str]) -> Self {
        self.tracked = paths.iter().map(PathBuf::from).collect();
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_branches(self, branches: &[&str]) -> Self {
        *self.branches.lock().expect("lock poisoned") =
            branches.iter().map(|b| (*b).to_string()).collect();
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn last_diff_request(&self) -> Option<DiffRequest> {
        self.diff_requests.lock().expect("lock poisoned").last().cloned()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn diff_request_count(&self) -> usize {
        self.diff_requests.lock().expect("lock poisoned").len()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn initialized(&self) -> Vec<PathBuf> {
        self.initialized.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn origins(&self) -> Vec<String> {
        self.origins.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn created_branches(&self) -> Vec<String> {
        self.created_branches.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn checkouts(&self) -> Vec<String> {
        self.checkouts.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn stage_calls(&self) -> usize {
        *self.stage_calls.lock().expect("lock poisoned")
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn commits(&self) -> Vec<String> {
        self.commits.lock().expect("lock poisoned").clone()
    }
}

impl VcsProvider for MockVcs {
    fn changed_files(
        &self,
        _repo_root: &Path,
        source: Option<&str>,
        target: &str,
        filter: DiffFilter,
    ) -> Result<Vec<ChangedFile>> {
        self.diff_requests
            .lock()
            .expect("lock poisoned")
            .push(DiffRequest {
                source: source.map(str::to_string),
                target: target.to_string(),
                filter,
            });
        if let Some(diagnostic) = &self.diff_failure {
            return Err(OperationError::backend("git", diagnostic));
        }
        Ok(self
            .changed_files
            .iter()
            .filter(|f| filter.contains(f.status()))
            .cloned()
            .collect())
    }

    fn init_repository(&self, path: &Path) -> Result<()> {
        self.initialized
            .lock()
            .expect("lock poisoned")
            .push(path.to_path_buf());
        Ok(())
    }

    fn set_origin(&self, _repo_root: &Path, url: &str) -> Result<()> {
        self.origins
            .lock()
            .expect("lock poisoned")
            .push(url.to_string());
        Ok(())
    }

    fn is_working_tree_clean(&self, _repo_root: &Path) -> Result<bool> {
        Ok(self.clean)
    }

    fn tracks_path(&self, _repo_root: &Path, relative: &Path) -> Result<bool> {
        Ok(self.tracked.iter().any(|path| path.starts_with(relative)))
    }

    fn branches(&self, _repo_root: &Path) -> Result<Vec<String>> {
        Ok(self.branches.lock().expect("lock poisoned").clone())
    }

    fn create_branch(&self, _repo_root: &Path, name: &str) -> Result<()> {
        let mut branches = self.branches.lock().expect("lock poisoned");
        if branches.iter().any(|b| b == name) {
            return Err(delta_git::GitError::BranchExists(name.to_string()).into());
        }
        branches.push(name.to_string());
        self.created_branches
            .lock()
            .expect("lock poisoned")
            .push(name.to_string());
        Ok(())
    }

    fn checkout_branch(&self, _repo_root: &Path, name: &str) -> Result<()> {
        self.checkouts
            .lock()
            .expect("lock poisoned")
            .push(name.to_string());
        Ok(())
    }

    fn stage_all(&self, _repo_root: &Path) -> Result<()> {
        *self.stage_calls.lock().expect("lock poisoned") += 1;
        Ok(())
    }

    fn commit(&self, _repo_root: &Path, message: &str) -> Result<CommitInfo> {
        let mut commits = self.commits.lock().expect("lock poisoned");
        commits.push(message.to_string());
        Ok(CommitInfo {
            sha: format!("{:040x}", commits.len()),
            message: message.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub package_dir: PathBuf,
    pub org: String,
    pub scope: String,
    pub test_level: TestLevel,
    pub wait: Duration,
    pub check_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRecord {
    pub project_dir: PathBuf,
    pub source_root: PathBuf,
    pub output_dir: PathBuf,
}

/// Retrieval, conversion and deployment backend in one.
pub struct MockMetadataBackend {
    retrieve_lines: Vec<String>,
    retrieved_files: Vec<(String, String)>,
    retrieve_failure: Option<String>,
    convert_failure: Option<String>,
    deploy_failure: Option<String>,
    retrievals: Mutex<Vec<(String, Vec<String>, PathBuf)>>,
    conversions: Mutex<Vec<ConversionRecord>>,
    deployments: Mutex<Vec<DeploymentRecord>>,
}

impl MockMetadataBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            retrieve_lines: Vec::new(),
            retrieved_files: Vec::new(),
            retrieve_failure: None,
            convert_failure: None,
            deploy_failure: None,
            retrievals: Mutex::new(Vec::new()),
            conversions: Mutex::new(Vec::new()),
            deployments: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_retrieve_lines(mut self, lines: &[&str]) -> Self {
        self.retrieve_lines = lines.iter().map(|l| (*l).to_string()).collect();
        self
    }

    /// Files written into the project directory on each retrieval.
    #[must_use]
    pub fn with_retrieved_file(mut self, rel: &str, content: &str) -> Self {
        self.retrieved_files
            .push((rel.to_string(), content.to_string()));
        self
    }

    #[must_use]
    pub fn failing_retrieve(mut self, diagnostic: &str) -> Self {
        self.retrieve_failure = Some(diagnostic.to_string());
        self
    }

    #[must_use]
    pub fn failing_convert(mut self, diagnostic: &str) -> Self {
        self.convert_failure = Some(diagnostic.to_string());
        self
    }

    #[must_use]
    pub fn failing_deploy(mut self, diagnostic: &str) -> Self {
        self.deploy_failure = Some(diagnostic.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn retrievals(&self) -> Vec<(String, Vec<String>, PathBuf)> {
        self.retrievals.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn conversions(&self) -> Vec<ConversionRecord> {
        self.conversions.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn deployments(&self) -> Vec<DeploymentRecord> {
        self.deployments.lock().expect("lock poisoned").clone()
    }
}

impl MetadataRetriever for MockMetadataBackend {
    fn retrieve(
        &self,
        org: &str,
        metadata_types: &[String],
        project_dir: &Path,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<Vec<String>> {
        self.retrievals.lock().expect("lock poisoned").push((
            org.to_string(),
            metadata_types.to_vec(),
            project_dir.to_path_buf(),
        ));
        if let Some(diagnostic) = &self.retrieve_failure {
            return Err(OperationError::backend("sfdx", diagnostic));
        }
        for (rel, content) in &self.retrieved_files {
            let path = project_dir.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
        }
        for line in &self.retrieve_lines {
            on_line(line);
        }
        Ok(self.retrieve_lines.clone())
    }
}

impl FormatConverter for MockMetadataBackend {
    fn convert(&self, project_dir: &Path, source_root: &Path, output_dir: &Path) -> Result<()> {
        self.conversions
            .lock()
            .expect("lock poisoned")
            .push(ConversionRecord {
                project_dir: project_dir.to_path_buf(),
                source_root: source_root.to_path_buf(),
                output_dir: output_dir.to_path_buf(),
            });
        if let Some(diagnostic) = &self.convert_failure {
            return Err(OperationError::backend("sfdx", diagnostic));
        }
        Ok(())
    }
}

impl Deployer for MockMetadataBackend {
    fn deploy(&self, submission: &DeploySubmission<'_>) -> Result<DeployReport> {
        self.deployments
            .lock()
            .expect("lock poisoned")
            .push(DeploymentRecord {
                package_dir: submission.package_dir.to_path_buf(),
                org: submission.org.to_string(),
                scope: submission.scope.serialized().to_string(),
                test_level: submission.test_level,
                wait: submission.wait,
                check_only: submission.check_only,
            });
        if let Some(diagnostic) = &self.deploy_failure {
            return Err(OperationError::backend("sfdx", diagnostic));
        }
        Ok(DeployReport {
            package_dir: submission.package_dir.to_path_buf(),
            diagnostic: "Deploy Succeeded.".to_string(),
        })
    }
}

pub struct MockOrgBackend {
    orgs: Vec<OrgSummary>,
    reject_grants: bool,
    grants: Mutex<Vec<(String, PathBuf, String, String)>>,
    logged_out: Mutex<Vec<String>>,
}

impl MockOrgBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            orgs: Vec::new(),
            reject_grants: false,
            grants: Mutex::new(Vec::new()),
            logged_out: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_org(mut self, username: &str, org_id: &str) -> Self {
        self.orgs.push(OrgSummary {
            username: username.to_string(),
            org_id: org_id.to_string(),
            alias: None,
            instance_url: None,
        });
        self
    }

    #[must_use]
    pub fn rejecting_grants(mut self) -> Self {
        self.reject_grants = true;
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn grants(&self) -> Vec<(String, PathBuf, String, String)> {
        self.grants.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn logged_out(&self) -> Vec<String> {
        self.logged_out.lock().expect("lock poisoned").clone()
    }
}

impl OrgAuthenticator for MockOrgBackend {
    fn authorize_jwt(&self, grant: &JwtGrant<'_>) -> Result<AuthorizedOrg> {
        self.grants.lock().expect("lock poisoned").push((
            grant.user.to_string(),
            grant.key_file.to_path_buf(),
            grant.client_id.to_string(),
            grant.alias.to_string(),
        ));
        if self.reject_grants {
            return Err(OperationError::backend("sfdx", "invalid_grant"));
        }
        Ok(AuthorizedOrg {
            org_id: "00D000000000001".to_string(),
            instance_url: "https://test.my.salesforce.com".to_string(),
            username: Some(grant.user.to_string()),
        })
    }
}

impl OrgManager for MockOrgBackend {
    fn list_orgs(&self) -> Result<Vec<OrgSummary>> {
        Ok(self.orgs.clone())
    }

    fn logout(&self, user: &str) -> Result<()> {
        self.logged_out
            .lock()
            .expect("lock poisoned")
            .push(user.to_string());
        Ok(())
    }
}

/// Creates `<parent>/<name>/sfdx-project.json` like the real scaffolder.
pub struct MockScaffolder {
    failure: Option<(i64, String)>,
    created: Mutex<Vec<PathBuf>>,
}

impl MockScaffolder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            failure: None,
            created: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn failing(mut self, status: i64, output: &str) -> Self {
        self.failure = Some((status, output.to_string()));
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn created(&self) -> Vec<PathBuf> {
        self.created.lock().expect("lock poisoned").clone()
    }
}

impl ProjectScaffolder for MockScaffolder {
    fn create_project(&self, parent_dir: &Path, name: &str) -> Result<()> {
        if let Some((status, output)) = &self.failure {
            return Err(OperationError::ProjectCreate {
                status: *status,
                output: output.clone(),
            });
        }
        let project = parent_dir.join(name);
        fs::create_dir_all(project.join("force-app"))?;
        fs::write(project.join("sfdx-project.json"), "{}")?;
        self.created.lock().expect("lock poisoned").push(project);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

/// Command runner that replays canned responses in order and records calls.
/// Once the script runs out, every call succeeds with empty output.
pub struct ScriptedRunner {
    responses: Mutex<VecDeque<CommandOutput>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedRunner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn respond_ok(self, stdout: &str) -> Self {
        self.responses
            .lock()
            .expect("lock poisoned")
            .push_back(CommandOutput {
                success: true,
                stdout: stdout.to_string(),
                stderr: String::new(),
            });
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn respond_err(self, stderr: &str) -> Self {
        self.responses
            .lock()
            .expect("lock poisoned")
            .push_back(CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: stderr.to_string(),
            });
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    fn next(&self, program: &str, args: &[String], cwd: Option<&Path>) -> CommandOutput {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(RecordedCall {
                program: program.to_string(),
                args: args.to_vec(),
                cwd: cwd.map(Path::to_path_buf),
            });
        self.responses
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or(CommandOutput {
                success: true,
                ..CommandOutput::default()
            })
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[String], cwd: Option<&Path>) -> Result<CommandOutput> {
        Ok(self.next(program, args, cwd))
    }

    fn stream(
        &self,
        program: &str,
        args: &[String],
        cwd: Option<&Path>,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<CommandOutput> {
        let output = self.next(program, args, cwd);
        for line in output.stdout.lines() {
            on_line(line);
        }
        Ok(output)
    }
}
