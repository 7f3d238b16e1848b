mod config;
mod error;
mod file;

/// File name looked up in the working root when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "sfdx-delta.toml";

pub use config::{
    Config, EmptyChangesetPolicy, OrgInstance, PipelineConfig, discover_config, load_config,
    parse_config,
};
pub use error::ConfigError;

pub type Result<T> = std::result::Result<T, ConfigError>;
