use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::command::{CommandOutput, CommandRunner, SystemCommandRunner};
use crate::traits::{
    AuthorizedOrg, DeployReport, DeploySubmission, Deployer, FormatConverter, JwtGrant,
    MetadataRetriever, OrgAuthenticator, OrgManager, OrgSummary, ProjectScaffolder,
};
use crate::{OperationError, Result};

const BACKEND: &str = "sfdx";
const DEFAULT_PROGRAM: &str = "sfdx";

/// Adapter for the Salesforce `sfdx` command-line tool.
pub struct SfdxCli<R = SystemCommandRunner> {
    program: String,
    runner: R,
}

impl SfdxCli<SystemCommandRunner> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_runner(SystemCommandRunner)
    }
}

impl Default for SfdxCli<SystemCommandRunner> {
    fn default() -> Self {
        Self::new()
    }
}

/// Envelope every `--json` invocation prints.
#[derive(Debug, Deserialize)]
struct JsonEnvelope<T> {
    status: i64,
    result: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrgListResult {
    #[serde(default)]
    non_scratch_orgs: Vec<OrgSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectCreateResult {
    #[serde(default)]
    raw_output: Option<String>,
}

impl<R: CommandRunner> SfdxCli<R> {
    #[must_use]
    pub fn with_runner(runner: R) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            runner,
        }
    }

    /// Overrides the executable, e.g. an absolute path to `sfdx`.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn run(&self, args: &[String], cwd: Option<&Path>) -> Result<CommandOutput> {
        let output = self.runner.run(&self.program, args, cwd)?;
        if output.success {
            Ok(output)
        } else {
            Err(OperationError::backend(BACKEND, output.diagnostic()))
        }
    }

    fn run_json<T: DeserializeOwned>(&self, args: &[String], cwd: Option<&Path>) -> Result<T> {
        let output = self.run(args, cwd)?;
        let envelope: JsonEnvelope<T> = parse_json(&output.stdout)?;
        match envelope.result {
            Some(result) if envelope.status == 0 => Ok(result),
            _ => Err(OperationError::backend(
                BACKEND,
                envelope
                    .message
                    .as_deref()
                    .unwrap_or("command returned no result"),
            )),
        }
    }
}

fn parse_json<T: DeserializeOwned>(stdout: &str) -> Result<T> {
    serde_json::from_str(stdout.trim()).map_err(|source| OperationError::BackendOutput {
        backend: BACKEND,
        source,
    })
}

fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|p| (*p).to_string()).collect()
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl<R: CommandRunner> MetadataRetriever for SfdxCli<R> {
    fn retrieve(
        &self,
        org: &str,
        metadata_types: &[String],
        project_dir: &Path,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<Vec<String>> {
        let types = metadata_types.join(",");
        let args = args(["force:source:retrieve", "-u", org, "-m", &types]);

        let output = self
            .runner
            .stream(&self.program, &args, Some(project_dir), on_line)?;
        if !output.success {
            return Err(OperationError::backend(BACKEND, output.diagnostic()));
        }

        let lines: Vec<String> = output.stdout.lines().map(str::to_string).collect();
        info!(org, types = %types, lines = lines.len(), "retrieved metadata");
        Ok(lines)
    }
}

impl<R: CommandRunner> FormatConverter for SfdxCli<R> {
    fn convert(&self, project_dir: &Path, source_root: &Path, output_dir: &Path) -> Result<()> {
        let args = args([
            "force:source:convert",
            "-r",
            &path_arg(source_root),
            "-d",
            &path_arg(output_dir),
        ]);
        self.run(&args, Some(project_dir))?;
        debug!(output = %output_dir.display(), "converted source to package format");
        Ok(())
    }
}

impl<R: CommandRunner> Deployer for SfdxCli<R> {
    fn deploy(&self, submission: &DeploySubmission<'_>) -> Result<DeployReport> {
        let minutes = submission.wait.as_secs().div_ceil(60).max(1).to_string();
        let mut args = args([
            "force:mdapi:deploy",
            "-d",
            &path_arg(submission.package_dir),
            "-u",
            submission.org,
            "-l",
            submission.test_level.as_str(),
            "-r",
            submission.scope.serialized(),
            "-w",
            &minutes,
        ]);
        if submission.check_only {
            args.push("-c".to_string());
        }

        let output = self.run(&args, None)?;
        Ok(DeployReport {
            package_dir: submission.package_dir.to_path_buf(),
            diagnostic: delta_core::collapse_diagnostic(&output.stdout),
        })
    }
}

impl<R: CommandRunner> OrgAuthenticator for SfdxCli<R> {
    fn authorize_jwt(&self, grant: &JwtGrant<'_>) -> Result<AuthorizedOrg> {
        let args = args([
            "force:auth:jwt:grant",
            "-u",
            grant.user,
            "-f",
            &path_arg(grant.key_file),
            "-i",
            grant.client_id,
            "-a",
            grant.alias,
            "--json",
        ]);
        self.run_json(&args, None)
    }
}

impl<R: CommandRunner> OrgManager for SfdxCli<R> {
    fn list_orgs(&self) -> Result<Vec<OrgSummary>> {
        let result: OrgListResult = self.run_json(&args(["force:org:list", "--json"]), None)?;
        Ok(result.non_scratch_orgs)
    }

    fn logout(&self, user: &str) -> Result<()> {
        self.run(&args(["force:auth:logout", "-u", user, "-p"]), None)?;
        Ok(())
    }
}

impl<R: CommandRunner> ProjectScaffolder for SfdxCli<R> {
    fn create_project(&self, parent_dir: &Path, name: &str) -> Result<()> {
        let args = args([
            "force:project:create",
            "--projectname",
            name,
            "--template",
            "standard",
            "--json",
        ]);
        let output = self.runner.run(&self.program, &args, Some(parent_dir))?;

        // A failed create still prints the JSON envelope on stdout.
        let envelope: JsonEnvelope<ProjectCreateResult> = match parse_json(&output.stdout) {
            Ok(envelope) => envelope,
            Err(_) if !output.success => {
                return Err(OperationError::backend(BACKEND, output.diagnostic()));
            }
            Err(err) => return Err(err),
        };

        let raw_output = envelope
            .result
            .and_then(|r| r.raw_output)
            .or(envelope.message)
            .unwrap_or_default();

        if envelope.status != 0 {
            return Err(OperationError::ProjectCreate {
                status: envelope.status,
                output: delta_core::collapse_diagnostic(&raw_output),
            });
        }

        info!(project = name, "created project");
        debug!(output = %delta_core::collapse_diagnostic(&raw_output), "project scaffold output");
        Ok(())
    }
}
