use crate::{Repository, Result};

impl Repository {
    /// Registers `url` as the `origin` remote.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote already exists or the URL is invalid.
    pub fn set_origin(&self, url: &str) -> Result<()> {
        self.inner.remote("origin", url)?;
        Ok(())
    }
}
