use std::path::PathBuf;

use serde::Deserialize;

use crate::config::EmptyChangesetPolicy;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct ConfigFile {
    pub(crate) pipeline: Option<PipelineSection>,
    #[serde(default, rename = "instance")]
    pub(crate) instances: Vec<InstanceSection>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct PipelineSection {
    pub(crate) working_dir: Option<PathBuf>,
    pub(crate) staging_dir: Option<PathBuf>,
    pub(crate) package_dir: Option<PathBuf>,
    pub(crate) package_root: Option<PathBuf>,
    pub(crate) diff_filter: Option<String>,
    pub(crate) max_scope_chars: Option<usize>,
    pub(crate) wait_seconds: Option<u64>,
    pub(crate) empty_changeset: Option<EmptyChangesetPolicy>,
    pub(crate) companion_required_extensions: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) ignored_files: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct InstanceSection {
    pub(crate) alias: String,
    pub(crate) url: String,
    pub(crate) stage_label: Option<String>,
    pub(crate) user: String,
    pub(crate) client_id: String,
    pub(crate) test_level: Option<String>,
    pub(crate) key_file: Option<PathBuf>,
}
