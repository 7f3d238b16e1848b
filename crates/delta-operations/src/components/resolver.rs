use std::fmt;
use std::path::Path;

use delta_config::PipelineConfig;
use delta_core::ChangedFile;
use tracing::{debug, info};

use crate::Result;
use crate::traits::VcsProvider;

/// The two sides of a comparison. Without a `source`, the working tree
/// (including the index) is compared against `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRange {
    pub source: Option<String>,
    pub target: String,
}

impl RevisionRange {
    #[must_use]
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            target: target.into(),
        }
    }

    #[must_use]
    pub fn working_tree(target: impl Into<String>) -> Self {
        Self {
            source: None,
            target: target.into(),
        }
    }
}

impl fmt::Display for RevisionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{source}..{}", self.target),
            None => write!(f, "working tree..{}", self.target),
        }
    }
}

/// Lists the changed files in `range`, applying the configured diff filter
/// and dropping paths that match `ignored-files`.
///
/// An empty result is not an error.
///
/// # Errors
///
/// Returns [`crate::OperationError::Backend`] if the comparison cannot run.
pub fn resolve<V>(
    vcs: &V,
    repo_root: &Path,
    range: &RevisionRange,
    config: &PipelineConfig,
) -> Result<Vec<ChangedFile>>
where
    V: VcsProvider + ?Sized,
{
    let filter = config.diff_filter();
    let changed = vcs.changed_files(repo_root, range.source.as_deref(), &range.target, filter)?;
    let total = changed.len();

    let kept: Vec<ChangedFile> = changed
        .into_iter()
        .filter(|file| {
            let ignored = config.is_ignored(Path::new(file.path()));
            if ignored {
                debug!(path = file.path(), "ignoring changed file");
            }
            !ignored
        })
        .collect();

    info!(
        range = %range,
        filter = %filter,
        changed = kept.len(),
        ignored = total - kept.len(),
        "resolved changeset"
    );
    Ok(kept)
}
