use delta_core::{DeploymentScope, PackageManifest};
use tracing::debug;

use crate::{OperationError, Result};

/// Serializes the manifest's tests into a scope no longer than `max_chars`.
///
/// # Errors
///
/// Returns [`OperationError::ScopeTooLarge`] when the serialized scope
/// exceeds `max_chars`. The scope is never truncated.
pub fn build_scope(manifest: &PackageManifest, max_chars: usize) -> Result<DeploymentScope> {
    let scope = DeploymentScope::from_names(manifest.test_class_names().iter().cloned());
    let length = scope.len();

    if length > max_chars {
        return Err(OperationError::ScopeTooLarge {
            length,
            max: max_chars,
        });
    }

    debug!(tests = scope.test_names().len(), length, max_chars, "built test scope");
    Ok(scope)
}
