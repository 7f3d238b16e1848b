use delta_core::{ChangedFile, DiffFilter, FileStatus};
use tracing::debug;

use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// Lists files that differ between two revisions, keeping only statuses
    /// accepted by `filter`.
    ///
    /// With a `source`, compares the trees `source..target` directly (no
    /// merge base). Without one, compares the working tree and index against
    /// `target`, like `git diff <target>`. Untracked files are not reported.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if either revision cannot be resolved.
    pub fn changed_files(
        &self,
        source: Option<&str>,
        target: &str,
        filter: DiffFilter,
    ) -> Result<Vec<ChangedFile>> {
        let target_tree = self.resolve_tree(target)?;

        let mut diff = match source {
            Some(refspec) => {
                let source_tree = self.resolve_tree(refspec)?;
                self.inner
                    .diff_tree_to_tree(Some(&source_tree), Some(&target_tree), None)?
            }
            None => self
                .inner
                .diff_tree_to_workdir_with_index(Some(&target_tree), None)?,
        };

        let mut find_opts = git2::DiffFindOptions::new();
        find_opts.renames(true);
        find_opts.copies(true);
        diff.find_similar(Some(&mut find_opts))?;

        let mut changes = Vec::new();

        for delta in diff.deltas() {
            let status = match delta.status() {
                git2::Delta::Added => FileStatus::Added,
                git2::Delta::Deleted => FileStatus::Deleted,
                git2::Delta::Modified => FileStatus::Modified,
                git2::Delta::Renamed => FileStatus::Renamed,
                git2::Delta::Copied => FileStatus::Copied,
                _ => continue,
            };

            if !filter.contains(status) {
                continue;
            }

            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .ok_or(GitError::MissingDeltaPath)?;

            changes.push(ChangedFile::new(path, status)?);
        }

        debug!(
            source = source.unwrap_or("<working tree>"),
            target,
            filter = %filter,
            count = changes.len(),
            "computed revision diff"
        );

        Ok(changes)
    }

    fn resolve_tree(&self, refspec: &str) -> Result<git2::Tree<'_>> {
        let obj = self
            .inner
            .revparse_single(refspec)
            .map_err(|e| GitError::RefNotFound {
                refspec: refspec.to_string(),
                message: e.message().to_string(),
            })?;

        obj.peel_to_tree().map_err(|e| GitError::RefNotFound {
            refspec: refspec.to_string(),
            message: e.message().to_string(),
        })
    }
}
