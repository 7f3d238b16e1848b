use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use delta_config::PipelineConfig;
use delta_core::ChangedFile;
use tracing::info;

use crate::components::{RevisionRange, resolve};
use crate::traits::VcsProvider;
use crate::{OperationError, Result};

/// Runs only the change-set resolution step.
pub struct ChangesOperation<V> {
    vcs: Arc<V>,
}

impl<V> ChangesOperation<V>
where
    V: VcsProvider,
{
    pub fn new(vcs: Arc<V>) -> Self {
        Self { vcs }
    }

    /// # Errors
    ///
    /// Returns [`OperationError::Backend`] if the comparison cannot run.
    pub fn execute(
        &self,
        repo_root: &Path,
        config: &PipelineConfig,
        range: &RevisionRange,
    ) -> Result<Vec<ChangedFile>> {
        resolve(self.vcs.as_ref(), repo_root, range, config)
    }
}

/// Writes one line per entry to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`OperationError::PathListWrite`] if the file cannot be written.
pub fn write_path_list<I, S>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let to_error = |source: std::io::Error| OperationError::PathListWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(path).map_err(to_error)?;
    let mut count = 0usize;
    for line in lines {
        writeln!(file, "{}", line.as_ref()).map_err(to_error)?;
        count += 1;
    }
    file.flush().map_err(to_error)?;

    info!(path = %path.display(), count, "wrote path list");
    Ok(())
}
