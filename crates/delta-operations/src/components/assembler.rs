use std::fs;
use std::path::{Path, PathBuf};

use delta_config::PipelineConfig;
use delta_core::{ClassifiedEntry, FileStatus, PackageManifest};
use tracing::{debug, info, warn};

use crate::{OperationError, Result};

/// Copies changed components and their descriptors into a staging tree that
/// mirrors the repository layout.
pub struct PackageAssembler<'a> {
    source_root: &'a Path,
    dest_root: &'a Path,
    config: &'a PipelineConfig,
}

impl<'a> PackageAssembler<'a> {
    #[must_use]
    pub fn new(source_root: &'a Path, dest_root: &'a Path, config: &'a PipelineConfig) -> Self {
        Self {
            source_root,
            dest_root,
            config,
        }
    }

    /// Stages every non-descriptor entry, in input order.
    ///
    /// Writes only below the destination root. Running it again over the
    /// same tree overwrites the staged files and yields the same manifest.
    ///
    /// # Errors
    ///
    /// - [`OperationError::MissingCompanion`] if a type that needs a
    ///   `-meta.xml` descriptor has none
    /// - [`OperationError::NoTestCoverage`] if no test class was staged
    /// - [`OperationError::Staging`] on I/O failure
    pub fn assemble(&self, entries: &[ClassifiedEntry]) -> Result<PackageManifest> {
        let mut manifest = PackageManifest::new();

        for entry in entries {
            if entry.is_descriptor() {
                continue;
            }
            if entry.status == FileStatus::Deleted {
                warn!(path = %entry.source_path, "skipping deleted file; deletions are not deployed");
                continue;
            }

            let primary = PathBuf::from(&entry.source_path);
            let dest = self.copy_into_staging(&primary)?;
            manifest.record_staged(primary.clone(), dest);

            let companion = PathBuf::from(entry.descriptor_path());
            if self.source_root.join(&companion).is_file() {
                let dest = self.copy_into_staging(&companion)?;
                manifest.record_staged(companion, dest);
            } else if self.companion_required(&primary) {
                return Err(OperationError::MissingCompanion { path: companion });
            } else {
                debug!(path = %entry.source_path, "no companion descriptor");
            }

            if let Some(name) = entry.derived_test_name() {
                manifest.record_test(name);
            }
        }

        if !manifest.has_test_coverage() {
            return Err(OperationError::NoTestCoverage);
        }

        info!(
            staged = manifest.staged_files().len(),
            tests = manifest.test_class_names().len(),
            dest = %self.dest_root.display(),
            "assembled package"
        );
        Ok(manifest)
    }

    fn companion_required(&self, primary: &Path) -> bool {
        primary
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.config.requires_companion(ext))
    }

    fn copy_into_staging(&self, relative: &Path) -> Result<PathBuf> {
        let source = self.source_root.join(relative);
        let dest = self.dest_root.join(relative);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| OperationError::Staging {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::copy(&source, &dest).map_err(|e| OperationError::Staging {
            path: source.clone(),
            source: e,
        })?;

        debug!(from = %source.display(), to = %dest.display(), "staged file");
        Ok(dest)
    }
}
