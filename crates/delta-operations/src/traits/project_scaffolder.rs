use std::path::Path;

use crate::Result;

pub trait ProjectScaffolder {
    /// Creates a standard source-format project `name` inside `parent_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend reports a non-zero status.
    fn create_project(&self, parent_dir: &Path, name: &str) -> Result<()>;
}
