use std::path::{Path, PathBuf};
use std::time::Duration;

use delta_core::{DeploymentScope, TestLevel};

use crate::Result;

/// Pulls metadata from an org into a source-format project.
pub trait MetadataRetriever {
    /// Retrieves `metadata_types` from `org` into `project_dir`, passing each
    /// line of backend output to `on_line` as it arrives.
    ///
    /// Returns every output line once the backend has finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be launched or exits unsuccessfully.
    fn retrieve(
        &self,
        org: &str,
        metadata_types: &[String],
        project_dir: &Path,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<Vec<String>>;
}

/// Turns a source-format tree into a deployable package layout.
pub trait FormatConverter {
    /// Converts `source_root` (relative to `project_dir`) into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if conversion fails.
    fn convert(&self, project_dir: &Path, source_root: &Path, output_dir: &Path) -> Result<()>;
}

/// Everything a deployment backend needs for one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySubmission<'a> {
    pub package_dir: &'a Path,
    pub org: &'a str,
    pub scope: &'a DeploymentScope,
    pub test_level: TestLevel,
    pub wait: Duration,
    pub check_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub package_dir: PathBuf,
    /// Backend output, collapsed to one line.
    pub diagnostic: String,
}

pub trait Deployer {
    /// # Errors
    ///
    /// Returns an error if the deployment or its test run fails.
    fn deploy(&self, submission: &DeploySubmission<'_>) -> Result<DeployReport>;
}
