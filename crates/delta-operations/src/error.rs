use std::path::PathBuf;

use delta_core::DiffFilter;
use delta_pipeline::PipelineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Core(#[from] delta_core::CoreError),

    #[error(transparent)]
    Git(#[from] delta_git::GitError),

    #[error(transparent)]
    Config(#[from] delta_config::ConfigError),

    #[error("{backend} backend failed: {diagnostic}")]
    Backend {
        backend: &'static str,
        diagnostic: String,
    },

    #[error("failed to launch '{program}'")]
    BackendLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read output of '{program}'")]
    BackendRead {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected output from {backend} backend")]
    BackendOutput {
        backend: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("companion descriptor '{}' is missing", path.display())]
    MissingCompanion { path: PathBuf },

    #[error("no test classes found in the changeset; refusing to deploy without test coverage")]
    NoTestCoverage,

    #[error("test scope is {length} characters, exceeding the limit of {max}")]
    ScopeTooLarge { length: usize, max: usize },

    #[error("no changes match diff filter '{filter}'")]
    EmptyChangeset { filter: DiffFilter },

    #[error("failed to stage '{}'", path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write path list '{}'", path.display())]
    PathListWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to use '{}' as an output directory: {reason}", path.display())]
    UnsafeOutputDir { path: PathBuf, reason: String },

    #[error(
        "staging directory '{}' and package directory '{}' overlap",
        staging.display(),
        package.display()
    )]
    OverlappingOutputDirs { staging: PathBuf, package: PathBuf },

    #[error("a target org is required unless running with --dry-run")]
    MissingTargetOrg,

    #[error("no org instance with alias '{0}' is configured")]
    UnknownInstance(String),

    #[error("org instance '{0}' has no key-file configured")]
    MissingKeyFile(String),

    #[error("project creation failed with status {status}: {output}")]
    ProjectCreate { status: i64, output: String },

    #[error("working tree has uncommitted changes; commit or stash them first")]
    DirtyWorkingTree,

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("{stage} failed")]
    StageFailed {
        stage: &'static str,
        #[source]
        source: Box<OperationError>,
    },

    #[error("pipeline could not run: {reason}")]
    PipelineBroken { reason: String },
}

pub type Result<T> = std::result::Result<T, OperationError>;

impl From<PipelineError<OperationError>> for OperationError {
    fn from(err: PipelineError<OperationError>) -> Self {
        let stage = err.stage().unwrap_or("pipeline");
        match err.into_stage_error() {
            Ok(source) => Self::StageFailed {
                stage,
                source: Box::new(source),
            },
            Err(other) => Self::PipelineBroken {
                reason: other.to_string(),
            },
        }
    }
}

impl OperationError {
    /// Unwraps [`OperationError::StageFailed`] to the error the stage raised.
    #[must_use]
    pub fn root_stage_error(&self) -> &Self {
        match self {
            Self::StageFailed { source, .. } => source.root_stage_error(),
            other => other,
        }
    }

    /// Collapses a backend's raw output into a single-line diagnostic.
    pub(crate) fn backend(backend: &'static str, raw: &str) -> Self {
        Self::Backend {
            backend,
            diagnostic: delta_core::collapse_diagnostic(raw),
        }
    }
}
