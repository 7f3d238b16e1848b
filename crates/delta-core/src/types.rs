use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Deleted,
    Modified,
    Renamed,
    Copied,
}

impl FileStatus {
    const ALL: [Self; 5] = [
        Self::Added,
        Self::Deleted,
        Self::Modified,
        Self::Renamed,
        Self::Copied,
    ];

    /// Single-letter status code, as used by `--diff-filter`.
    #[must_use]
    pub fn code(self) -> char {
        match self {
            Self::Added => 'A',
            Self::Deleted => 'D',
            Self::Modified => 'M',
            Self::Renamed => 'R',
            Self::Copied => 'C',
        }
    }

    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == code.to_ascii_uppercase())
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Added => "added",
            Self::Deleted => "deleted",
            Self::Modified => "modified",
            Self::Renamed => "renamed",
            Self::Copied => "copied",
        };
        write!(f, "{s}")
    }
}

/// Set of file statuses a revision diff reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffFilter {
    statuses: [bool; 5],
}

impl DiffFilter {
    #[must_use]
    pub fn contains(&self, status: FileStatus) -> bool {
        FileStatus::ALL
            .iter()
            .position(|s| *s == status)
            .is_some_and(|index| self.statuses[index])
    }

    pub fn statuses(&self) -> impl Iterator<Item = FileStatus> + '_ {
        FileStatus::ALL
            .into_iter()
            .zip(self.statuses)
            .filter_map(|(status, enabled)| enabled.then_some(status))
    }
}

impl Default for DiffFilter {
    fn default() -> Self {
        Self {
            statuses: [true, true, true, false, false],
        }
    }
}

impl FromStr for DiffFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidDiffFilter {
                filter: s.to_string(),
                reason: "no status letters given".to_string(),
            });
        }

        let mut statuses = [false; 5];
        for code in trimmed.chars() {
            let status = FileStatus::from_code(code).ok_or_else(|| CoreError::InvalidDiffFilter {
                filter: s.to_string(),
                reason: format!("unknown status letter '{code}'"),
            })?;
            if let Some(index) = FileStatus::ALL.iter().position(|s| *s == status) {
                statuses[index] = true;
            }
        }

        Ok(Self { statuses })
    }
}

impl fmt::Display for DiffFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for status in self.statuses() {
            write!(f, "{}", status.code())?;
        }
        Ok(())
    }
}

/// One entry from a revision diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    path: String,
    status: FileStatus,
}

impl ChangedFile {
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyPath`] if the path is empty after normalization.
    pub fn new(path: impl AsRef<Path>, status: FileStatus) -> Result<Self> {
        let path = crate::normalize_repo_path(path.as_ref());
        if path.is_empty() {
            return Err(CoreError::EmptyPath);
        }
        Ok(Self { path, status })
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn status(&self) -> FileStatus {
        self.status
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Descriptor,
    Component,
    TestClass { name: String },
}

/// A changed file annotated with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEntry {
    pub source_path: String,
    pub status: FileStatus,
    pub kind: EntryKind,
}

impl ClassifiedEntry {
    #[must_use]
    pub fn is_descriptor(&self) -> bool {
        matches!(self.kind, EntryKind::Descriptor)
    }

    #[must_use]
    pub fn is_test_class(&self) -> bool {
        matches!(self.kind, EntryKind::TestClass { .. })
    }

    #[must_use]
    pub fn derived_test_name(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::TestClass { name } => Some(name),
            EntryKind::Descriptor | EntryKind::Component => None,
        }
    }

    /// Repository-relative path of the companion descriptor.
    #[must_use]
    pub fn descriptor_path(&self) -> String {
        format!("{}{}", self.source_path, crate::DESCRIPTOR_SUFFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
}

/// Result of staging changed components into a package tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    staged_files: Vec<StagedFile>,
    test_class_names: IndexSet<String>,
}

impl PackageManifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_staged(&mut self, source_path: PathBuf, dest_path: PathBuf) {
        self.staged_files.push(StagedFile {
            source_path,
            dest_path,
        });
    }

    /// Returns `false` if the name was already recorded.
    pub fn record_test(&mut self, name: impl Into<String>) -> bool {
        self.test_class_names.insert(name.into())
    }

    #[must_use]
    pub fn staged_files(&self) -> &[StagedFile] {
        &self.staged_files
    }

    #[must_use]
    pub fn test_class_names(&self) -> &IndexSet<String> {
        &self.test_class_names
    }

    #[must_use]
    pub fn has_test_coverage(&self) -> bool {
        !self.test_class_names.is_empty()
    }
}

/// The comma-joined list of tests handed to the deployment backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentScope {
    test_names: Vec<String>,
    serialized: String,
}

impl DeploymentScope {
    /// Deduplicates `names` in first-seen order and joins them with commas.
    ///
    /// No size bound is applied here.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: IndexSet<String> = names.into_iter().map(Into::into).collect();
        let test_names: Vec<String> = unique.into_iter().collect();
        let serialized = test_names.join(",");
        Self {
            test_names,
            serialized,
        }
    }

    #[must_use]
    pub fn test_names(&self) -> &[String] {
        &self.test_names
    }

    #[must_use]
    pub fn serialized(&self) -> &str {
        &self.serialized
    }

    /// Length of the serialized scope in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.serialized.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.test_names.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TestLevel {
    NoTestRun,
    #[default]
    RunSpecifiedTests,
    RunLocalTests,
    RunAllTestsInOrg,
}

impl TestLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoTestRun => "NoTestRun",
            Self::RunSpecifiedTests => "RunSpecifiedTests",
            Self::RunLocalTests => "RunLocalTests",
            Self::RunAllTestsInOrg => "RunAllTestsInOrg",
        }
    }
}

impl fmt::Display for TestLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        [
            Self::NoTestRun,
            Self::RunSpecifiedTests,
            Self::RunLocalTests,
            Self::RunAllTestsInOrg,
        ]
        .into_iter()
        .find(|level| level.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| CoreError::UnknownTestLevel(s.to_string()))
    }
}
