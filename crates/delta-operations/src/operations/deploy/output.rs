use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use delta_config::PipelineConfig;
use tracing::debug;

use crate::traits::VcsProvider;
use crate::{OperationError, Result};

/// Written into every output directory a run prepares. It keeps the
/// directory out of `git status` and marks it as safe to clear next time.
pub(crate) const OUTPUT_MARKER: &str = ".gitignore";
const MARKER_CONTENT: &str = "# Output of sfdx-delta, cleared on every deploy run.\n*\n";

/// Refuses staging and package directories that would overlap the
/// repository's own files or each other.
pub(crate) fn check_output_dirs<V: VcsProvider>(
    vcs: &V,
    repo_root: &Path,
    config: &PipelineConfig,
) -> Result<()> {
    let repo = resolve(repo_root)?;
    let sources = resolve(&repo_root.join(config.package_root()))?;
    let staging = resolve(&config.staging_root())?;
    let package = resolve(&config.package_output())?;

    check_output_dir(vcs, &staging, &repo, &sources)?;
    check_output_dir(vcs, &package, &repo, &sources)?;

    if overlaps(&staging, &package) {
        return Err(OperationError::OverlappingOutputDirs { staging, package });
    }
    Ok(())
}

fn check_output_dir<V: VcsProvider>(
    vcs: &V,
    dir: &Path,
    repo: &Path,
    sources: &Path,
) -> Result<()> {
    let refuse = |reason: String| OperationError::UnsafeOutputDir {
        path: dir.to_path_buf(),
        reason,
    };

    if repo.starts_with(dir) {
        return Err(refuse("it contains the repository".to_string()));
    }
    if overlaps(dir, sources) {
        return Err(refuse(format!(
            "it overlaps the source root '{}'",
            sources.display()
        )));
    }
    if let Ok(relative) = dir.strip_prefix(repo) {
        if relative.starts_with(".git") {
            return Err(refuse("it is inside the git directory".to_string()));
        }
        if vcs.tracks_path(repo, relative)? {
            return Err(refuse("it holds tracked files".to_string()));
        }
    }
    Ok(())
}

/// Prepares `dir` for a new run: creates it, or empties it when it is empty
/// already or carries the marker of an earlier run.
pub(crate) fn reset_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(OperationError::UnsafeOutputDir {
                path: dir.to_path_buf(),
                reason: "it is not a directory".to_string(),
            });
        }
        if !is_marked(dir) && !is_empty(dir)? {
            return Err(OperationError::UnsafeOutputDir {
                path: dir.to_path_buf(),
                reason: format!("it has content but no {OUTPUT_MARKER} written by sfdx-delta"),
            });
        }
        debug!(dir = %dir.display(), "clearing previous output");
        fs::remove_dir_all(dir).map_err(staging_error(dir))?;
    }

    fs::create_dir_all(dir).map_err(staging_error(dir))?;
    fs::write(dir.join(OUTPUT_MARKER), MARKER_CONTENT).map_err(staging_error(dir))?;
    Ok(())
}

fn is_marked(dir: &Path) -> bool {
    fs::read_to_string(dir.join(OUTPUT_MARKER)).is_ok_and(|content| content == MARKER_CONTENT)
}

fn is_empty(dir: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(dir).map_err(staging_error(dir))?;
    Ok(entries.next().is_none())
}

fn overlaps(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

/// Makes `path` absolute, resolving symlinks and `..` through the part of it
/// that exists. The missing remainder is normalised lexically.
fn resolve(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(staging_error(path))?;
    let mut resolved = PathBuf::new();

    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                resolved.push(component);
                continue;
            }
            Component::CurDir => continue,
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => resolved.push(name),
        }
        if resolved.exists() {
            resolved = dunce::canonicalize(&resolved).map_err(staging_error(&resolved))?;
        }
    }
    Ok(resolved)
}

fn staging_error(path: &Path) -> impl FnOnce(io::Error) -> OperationError {
    let path = path.to_path_buf();
    move |source| OperationError::Staging { path, source }
}
