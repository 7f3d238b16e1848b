use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for '{field}'")]
    InvalidValue {
        field: &'static str,
        #[source]
        source: delta_core::CoreError,
    },

    #[error("'{field}' must be greater than zero")]
    MustBePositive { field: &'static str },

    #[error("invalid glob pattern '{pattern}'")]
    GlobPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("org instance alias '{0}' is defined more than once")]
    DuplicateInstance(String),
}
