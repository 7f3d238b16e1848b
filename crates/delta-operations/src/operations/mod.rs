mod auth;
mod changes;
mod deploy;
mod init;
mod orgs;
mod retrieve;
mod snapshot;

pub use auth::{AuthInput, AuthOperation};
pub use changes::{ChangesOperation, write_path_list};
pub use deploy::{
    CarriesManifest, ConvertedPackage, DeployContext, DeployInput, DeployOperation, DeployOutcome,
    DeployPlan, DeployState, DeployedPackage, Scoped,
};
pub use init::{InitInput, InitOperation, InitOutput};
pub use orgs::OrgsOperation;
pub use retrieve::{RetrieveInput, RetrieveOperation, RetrieveOutput};
pub use snapshot::{SnapshotInput, SnapshotOperation, SnapshotOutput};
