use std::path::Path;

/// Converts a path reported by a backend into the repository-relative,
/// forward-slash form used throughout the pipeline.
#[must_use]
pub fn normalize_repo_path(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    raw.strip_prefix("./").unwrap_or(&raw).to_string()
}

/// Collapses multi-line backend output into a single log-friendly line.
///
/// Leading and trailing line breaks are dropped; interior line breaks become
/// single spaces.
#[must_use]
pub fn collapse_diagnostic(raw: &str) -> String {
    raw.trim_matches(|c| c == '\n' || c == '\r')
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .collect::<Vec<_>>()
        .join(" ")
}
