use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use super::changes::write_path_list;
use crate::Result;
use crate::traits::MetadataRetriever;

#[derive(Debug, Clone)]
pub struct RetrieveInput {
    pub org: String,
    pub metadata_types: Vec<String>,
    pub project_dir: PathBuf,
    /// Also write every output line to this file.
    pub write_list: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrieveOutput {
    pub lines: Vec<String>,
    pub list_file: Option<PathBuf>,
}

/// Pulls metadata types from an org into a project directory.
pub struct RetrieveOperation<R> {
    retriever: Arc<R>,
}

impl<R> RetrieveOperation<R>
where
    R: MetadataRetriever,
{
    pub fn new(retriever: Arc<R>) -> Self {
        Self { retriever }
    }

    /// Retrieves, passing each backend line to `on_line` as it arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval fails or the path list cannot be written.
    pub fn execute(
        &self,
        input: &RetrieveInput,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<RetrieveOutput> {
        info!(
            org = %input.org,
            types = %input.metadata_types.join(","),
            "retrieving metadata"
        );
        let lines = self.retriever.retrieve(
            &input.org,
            &input.metadata_types,
            &input.project_dir,
            on_line,
        )?;

        if let Some(path) = &input.write_list {
            write_path_list(path, &lines)?;
        }

        Ok(RetrieveOutput {
            lines,
            list_file: input.write_list.clone(),
        })
    }
}

/// Retrieves into `project_dir` without surfacing progress lines.
pub(crate) fn retrieve_quietly<R>(
    retriever: &R,
    org: &str,
    metadata_types: &[String],
    project_dir: &Path,
) -> Result<Vec<String>>
where
    R: MetadataRetriever + ?Sized,
{
    retriever.retrieve(org, metadata_types, project_dir, &mut |line| {
        debug!(line, "retrieve");
    })
}
