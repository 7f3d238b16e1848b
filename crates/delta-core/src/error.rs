use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid diff filter '{filter}': {reason}")]
    InvalidDiffFilter {
        filter: String,
        reason: String,
    },

    #[error("changed file path is empty")]
    EmptyPath,

    #[error("unknown test level '{0}'")]
    UnknownTestLevel(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
