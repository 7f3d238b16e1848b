use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use delta_core::{DEFAULT_MAX_SCOPE_CHARS, DiffFilter, TestLevel};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::file::{ConfigFile, InstanceSection, PipelineSection};

const DEFAULT_STAGING_DIR: &str = "staging";
const DEFAULT_PACKAGE_DIR: &str = "mdapi";
const DEFAULT_PACKAGE_ROOT: &str = "force-app";
const DEFAULT_WAIT_SECONDS: u64 = 600;
const DEFAULT_COMPANION_EXTENSIONS: [&str; 4] = ["cls", "trigger", "page", "component"];

/// What a deploy run does when the revision diff is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyChangesetPolicy {
    /// Report that there is nothing to deploy and finish successfully.
    #[default]
    Skip,
    /// Treat the empty diff as a failed run.
    Fail,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    working_dir: PathBuf,
    staging_dir: PathBuf,
    package_dir: PathBuf,
    package_root: PathBuf,
    diff_filter: DiffFilter,
    max_scope_chars: usize,
    wait: Duration,
    empty_changeset: EmptyChangesetPolicy,
    companion_required_extensions: Vec<String>,
    ignored_files: GlobSet,
}

impl PipelineConfig {
    /// Defaults rooted at `working_dir`.
    #[must_use]
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            package_dir: PathBuf::from(DEFAULT_PACKAGE_DIR),
            package_root: PathBuf::from(DEFAULT_PACKAGE_ROOT),
            diff_filter: DiffFilter::default(),
            max_scope_chars: DEFAULT_MAX_SCOPE_CHARS,
            wait: Duration::from_secs(DEFAULT_WAIT_SECONDS),
            empty_changeset: EmptyChangesetPolicy::default(),
            companion_required_extensions: DEFAULT_COMPANION_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            ignored_files: GlobSet::empty(),
        }
    }

    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Absolute (or working-dir relative) root of the staging tree.
    #[must_use]
    pub fn staging_root(&self) -> PathBuf {
        self.working_dir.join(&self.staging_dir)
    }

    /// Directory the format-conversion backend writes the package into.
    #[must_use]
    pub fn package_output(&self) -> PathBuf {
        self.working_dir.join(&self.package_dir)
    }

    /// Source-format root inside the staging tree handed to conversion.
    #[must_use]
    pub fn package_root(&self) -> &Path {
        &self.package_root
    }

    #[must_use]
    pub fn diff_filter(&self) -> DiffFilter {
        self.diff_filter
    }

    #[must_use]
    pub fn max_scope_chars(&self) -> usize {
        self.max_scope_chars
    }

    #[must_use]
    pub fn wait(&self) -> Duration {
        self.wait
    }

    #[must_use]
    pub fn empty_changeset(&self) -> EmptyChangesetPolicy {
        self.empty_changeset
    }

    #[must_use]
    pub fn companion_required_extensions(&self) -> &[String] {
        &self.companion_required_extensions
    }

    /// Whether a primary file with this extension must ship with a
    /// `-meta.xml` descriptor.
    #[must_use]
    pub fn requires_companion(&self, extension: &str) -> bool {
        self.companion_required_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }

    #[must_use]
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignored_files.is_match(path)
    }

    #[must_use]
    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }

    #[must_use]
    pub fn with_diff_filter(mut self, diff_filter: DiffFilter) -> Self {
        self.diff_filter = diff_filter;
        self
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MustBePositive`] for a zero budget.
    pub fn with_max_scope_chars(mut self, max_scope_chars: usize) -> Result<Self, ConfigError> {
        if max_scope_chars == 0 {
            return Err(ConfigError::MustBePositive {
                field: "max-scope-chars",
            });
        }
        self.max_scope_chars = max_scope_chars;
        Ok(self)
    }

    #[must_use]
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    #[must_use]
    pub fn with_empty_changeset(mut self, policy: EmptyChangesetPolicy) -> Self {
        self.empty_changeset = policy;
        self
    }

    #[must_use]
    pub fn with_companion_required_extensions(mut self, extensions: Vec<String>) -> Self {
        self.companion_required_extensions = extensions;
        self
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::GlobPattern`] if any pattern is invalid.
    pub fn with_ignored_files(mut self, patterns: &[String]) -> Result<Self, ConfigError> {
        self.ignored_files = build_glob_set(patterns)?;
        Ok(self)
    }
}

/// A Salesforce org the tool can authenticate against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgInstance {
    pub alias: String,
    pub url: String,
    pub stage_label: String,
    pub user: String,
    pub client_id: String,
    pub test_level: TestLevel,
    pub key_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pipeline: PipelineConfig,
    instances: Vec<OrgInstance>,
}

impl Config {
    #[must_use]
    pub fn new(pipeline: PipelineConfig) -> Self {
        Self {
            pipeline,
            instances: Vec::new(),
        }
    }

    #[must_use]
    pub fn pipeline(&self) -> &PipelineConfig {
        &self.pipeline
    }

    #[must_use]
    pub fn into_pipeline(self) -> PipelineConfig {
        self.pipeline
    }

    #[must_use]
    pub fn instances(&self) -> &[OrgInstance] {
        &self.instances
    }

    #[must_use]
    pub fn instance(&self, alias: &str) -> Option<&OrgInstance> {
        self.instances.iter().find(|i| i.alias == alias)
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::GlobPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::GlobPattern {
        pattern: patterns.join(", "),
        source,
    })
}

fn build_pipeline_config(
    section: Option<PipelineSection>,
    base_dir: &Path,
) -> Result<PipelineConfig, ConfigError> {
    let section = section.unwrap_or_default();
    let defaults = PipelineConfig::new(base_dir);

    let working_dir = section
        .working_dir
        .map_or_else(|| base_dir.to_path_buf(), |dir| base_dir.join(dir));

    let diff_filter = match section.diff_filter {
        Some(raw) => raw
            .parse()
            .map_err(|source| ConfigError::InvalidValue {
                field: "diff-filter",
                source,
            })?,
        None => defaults.diff_filter,
    };

    let config = PipelineConfig {
        working_dir,
        staging_dir: section.staging_dir.unwrap_or(defaults.staging_dir),
        package_dir: section.package_dir.unwrap_or(defaults.package_dir),
        package_root: section.package_root.unwrap_or(defaults.package_root),
        diff_filter,
        max_scope_chars: defaults.max_scope_chars,
        wait: section
            .wait_seconds
            .map_or(defaults.wait, Duration::from_secs),
        empty_changeset: section.empty_changeset.unwrap_or(defaults.empty_changeset),
        companion_required_extensions: section
            .companion_required_extensions
            .unwrap_or(defaults.companion_required_extensions),
        ignored_files: build_glob_set(&section.ignored_files)?,
    };

    match section.max_scope_chars {
        Some(max) => config.with_max_scope_chars(max),
        None => Ok(config),
    }
}

fn build_instance(section: InstanceSection, base_dir: &Path) -> Result<OrgInstance, ConfigError> {
    let test_level = match section.test_level {
        Some(raw) => raw
            .parse()
            .map_err(|source| ConfigError::InvalidValue {
                field: "test-level",
                source,
            })?,
        None => TestLevel::default(),
    };

    Ok(OrgInstance {
        stage_label: section
            .stage_label
            .unwrap_or_else(|| section.alias.clone()),
        alias: section.alias,
        url: section.url,
        user: section.user,
        client_id: section.client_id,
        test_level,
        key_file: section.key_file.map(|key| base_dir.join(key)),
    })
}

/// Parses configuration text. Relative paths resolve against `base_dir`.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or a value is out of range.
pub fn parse_config(content: &str, base_dir: &Path, origin: &Path) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;

    let pipeline = build_pipeline_config(file.pipeline, base_dir)?;

    let mut seen = HashSet::new();
    let mut instances = Vec::with_capacity(file.instances.len());
    for section in file.instances {
        if !seen.insert(section.alias.clone()) {
            return Err(ConfigError::DuplicateInstance(section.alias));
        }
        instances.push(build_instance(section, base_dir)?);
    }

    Ok(Config {
        pipeline,
        instances,
    })
}

/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_config(&content, base_dir, path)
}

/// Loads `sfdx-delta.toml` from `root`, falling back to defaults rooted at
/// `root` when the file does not exist.
///
/// # Errors
///
/// Returns an error if an existing file cannot be read or parsed.
pub fn discover_config(root: &Path) -> Result<Config, ConfigError> {
    let candidate = root.join(crate::DEFAULT_CONFIG_FILE);
    if candidate.is_file() {
        load_config(&candidate)
    } else {
        Ok(Config::new(PipelineConfig::new(root)))
    }
}
