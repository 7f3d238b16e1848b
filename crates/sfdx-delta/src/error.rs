use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("configuration error")]
    Config(#[from] delta_config::ConfigError),

    #[error(transparent)]
    Operation(#[from] delta_operations::OperationError),

    #[error("invalid argument")]
    Argument(#[from] delta_core::CoreError),

    #[error("pass --user, --key-file and --client-id together, or --instance")]
    IncompleteGrant,

    #[error("nothing to log out of: pass user names or --staging")]
    NoLogoutTarget,
}

pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// The error and each of its causes, joined on one line.
    #[must_use]
    pub fn report(&self) -> String {
        let mut line = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            line.push_str(": ");
            line.push_str(&cause.to_string());
            source = cause.source();
        }
        line.lines()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
