use std::sync::Arc;
use std::time::Duration;

use clap::{Args, ValueEnum};
use delta_config::{EmptyChangesetPolicy, PipelineConfig};
use delta_operations::operations::{DeployInput, DeployOperation};
use delta_operations::providers::Git2Provider;
use tracing::debug;

use super::{RangeArgs, RunContext};
use crate::error::Result;
use crate::output::{DeployFormatter, PlainTextDeployFormatter};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum EmptyChangesetArg {
    Skip,
    Fail,
}

impl From<EmptyChangesetArg> for EmptyChangesetPolicy {
    fn from(arg: EmptyChangesetArg) -> Self {
        match arg {
            EmptyChangesetArg::Skip => Self::Skip,
            EmptyChangesetArg::Fail => Self::Fail,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct DeployArgs {
    #[command(flatten)]
    range: RangeArgs,

    /// Org alias or username to deploy to (required unless --dry-run)
    #[arg(long, short = 'u', value_name = "ORG")]
    org: Option<String>,

    /// Validate the deployment and run its tests without saving
    #[arg(long)]
    check_only: bool,

    /// Stage the package and build the test scope, then stop
    #[arg(long)]
    dry_run: bool,

    /// Longest allowed test scope, in characters
    #[arg(long, value_name = "CHARS")]
    max_scope_chars: Option<usize>,

    /// Seconds to wait for the deployment to finish
    #[arg(long, value_name = "SECONDS")]
    wait: Option<u64>,

    /// What to do when nothing changed
    #[arg(long, value_enum)]
    empty_changeset: Option<EmptyChangesetArg>,
}

impl DeployArgs {
    fn apply(&self, config: PipelineConfig) -> Result<PipelineConfig> {
        let mut config = self.range.apply(config)?;
        if let Some(max) = self.max_scope_chars {
            config = config.with_max_scope_chars(max)?;
        }
        if let Some(seconds) = self.wait {
            config = config.with_wait(Duration::from_secs(seconds));
        }
        if let Some(policy) = self.empty_changeset {
            config = config.with_empty_changeset(policy.into());
        }
        Ok(config)
    }
}

pub(crate) fn run(ctx: &RunContext, args: DeployArgs) -> Result<()> {
    let config = args.apply(ctx.config.pipeline().clone())?;
    debug!(
        staging = %config.staging_root().display(),
        package = %config.package_output().display(),
        "resolved pipeline settings"
    );

    let sfdx = ctx.sfdx();
    let operation = DeployOperation::new(Arc::new(Git2Provider::new()), Arc::clone(&sfdx), sfdx);
    let input = DeployInput {
        range: args.range.revision_range(),
        target_org: args.org,
        check_only: args.check_only,
        dry_run: args.dry_run,
    };

    let outcome = operation.execute(&ctx.root, &config, &input)?;
    print!("{}", PlainTextDeployFormatter.format_outcome(&outcome));
    Ok(())
}
