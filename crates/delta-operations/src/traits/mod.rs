mod metadata;
mod org;
mod project_scaffolder;
mod vcs_provider;

pub use metadata::{DeployReport, DeploySubmission, Deployer, FormatConverter, MetadataRetriever};
pub use org::{AuthorizedOrg, JwtGrant, OrgAuthenticator, OrgManager, OrgSummary};
pub use project_scaffolder::ProjectScaffolder;
pub use vcs_provider::VcsProvider;
