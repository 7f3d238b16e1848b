mod auth;
mod changes;
mod deploy;
mod init;
mod orgs;
mod retrieve;
mod snapshot;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};
use delta_config::{Config, PipelineConfig};
use delta_core::DiffFilter;
use delta_operations::components::RevisionRange;
use delta_operations::providers::SfdxCli;

use crate::error::Result;

/// Everything a command needs besides its own arguments.
pub(crate) struct RunContext {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
    pub(crate) sfdx: String,
}

impl RunContext {
    pub(crate) fn sfdx(&self) -> Arc<SfdxCli> {
        Arc::new(SfdxCli::new().with_program(self.sfdx.clone()))
    }
}

/// The two revisions to compare.
#[derive(Args, Debug, Clone)]
pub(crate) struct RangeArgs {
    /// Base revision. Omit to compare the working tree against --target
    #[arg(long, short = 's')]
    source: Option<String>,

    /// Revision holding the changes to deploy
    #[arg(long, short = 't', default_value = "HEAD")]
    target: String,

    /// Statuses to keep, as letters from A, C, D, M, R (default from config)
    #[arg(long)]
    diff_filter: Option<String>,
}

impl RangeArgs {
    fn revision_range(&self) -> RevisionRange {
        match &self.source {
            Some(source) => RevisionRange::between(source.clone(), self.target.clone()),
            None => RevisionRange::working_tree(self.target.clone()),
        }
    }

    /// Overrides the configured diff filter when one was given.
    fn apply(&self, config: PipelineConfig) -> Result<PipelineConfig> {
        match &self.diff_filter {
            Some(letters) => Ok(config.with_diff_filter(letters.parse::<DiffFilter>()?)),
            None => Ok(config),
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Deploy the changed components and run only their tests
    Deploy(deploy::DeployArgs),
    /// List the changed files between two revisions
    Changes(changes::ChangesArgs),
    /// Pull metadata types from an org into a project directory
    Retrieve(retrieve::RetrieveArgs),
    /// Create a project, fill it from an org and commit it
    Init(init::InitArgs),
    /// Commit an org's current metadata on a branch
    Snapshot(snapshot::SnapshotArgs),
    /// Authorize an org with a JWT grant
    Auth(auth::AuthArgs),
    /// List authenticated orgs
    Orgs,
    /// Log out of orgs
    Logout(orgs::LogoutArgs),
}

impl Commands {
    pub(crate) fn execute(self, ctx: &RunContext) -> Result<()> {
        match self {
            Self::Deploy(args) => deploy::run(ctx, args),
            Self::Changes(args) => changes::run(ctx, &args),
            Self::Retrieve(args) => retrieve::run(ctx, args),
            Self::Init(args) => init::run(ctx, args),
            Self::Snapshot(args) => snapshot::run(ctx, args),
            Self::Auth(args) => auth::run(ctx, args),
            Self::Orgs => orgs::list(ctx),
            Self::Logout(args) => orgs::logout(ctx, &args),
        }
    }
}
