pub mod error;
mod path;
pub mod types;

pub use error::*;
pub use path::{collapse_diagnostic, normalize_repo_path};
pub use types::*;

/// Suffix of the sidecar descriptor that accompanies a primary metadata file.
pub const DESCRIPTOR_SUFFIX: &str = "-meta.xml";

/// Default upper bound on the serialized test scope, in characters.
pub const DEFAULT_MAX_SCOPE_CHARS: usize = 200;
