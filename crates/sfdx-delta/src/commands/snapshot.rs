use std::sync::Arc;

use clap::Args;
use delta_operations::operations::{SnapshotInput, SnapshotOperation};
use delta_operations::providers::Git2Provider;

use super::RunContext;
use crate::error::Result;

#[derive(Args, Debug)]
pub(crate) struct SnapshotArgs {
    /// Branch to commit on; created from HEAD if missing
    #[arg(long, short = 'b')]
    branch: String,

    /// Org to snapshot
    #[arg(long, short = 'u', value_name = "ORG")]
    org: String,

    /// Metadata types to retrieve, comma separated
    #[arg(long, short = 'm', value_delimiter = ',', required = true)]
    types: Vec<String>,

    /// Commit message (default: "Snapshot of <ORG>")
    #[arg(long)]
    message: Option<String>,
}

pub(crate) fn run(ctx: &RunContext, args: SnapshotArgs) -> Result<()> {
    let operation = SnapshotOperation::new(ctx.sfdx(), Arc::new(Git2Provider::new()));
    let message = args
        .message
        .unwrap_or_else(|| format!("Snapshot of {}", args.org));
    let input = SnapshotInput {
        repo_root: ctx.root.clone(),
        branch: args.branch,
        org: args.org,
        metadata_types: args.types,
        message,
    };

    let output = operation.execute(&input)?;

    let verb = if output.created_branch {
        "created"
    } else {
        "updated"
    };
    println!(
        "Branch '{}' {verb} at {} ({} entries retrieved)",
        output.branch,
        output.commit.sha,
        output.retrieved.len()
    );
    Ok(())
}
