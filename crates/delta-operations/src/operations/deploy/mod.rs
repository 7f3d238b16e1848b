mod context;
mod operation;
mod output;
mod stages;
mod state;

pub use context::DeployContext;
pub use operation::{DeployInput, DeployOperation, DeployOutcome, DeployPlan};
pub use stages::{CarriesManifest, ConvertedPackage, DeployedPackage, Scoped};
pub use state::DeployState;
