use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use delta_operations::operations::{InitInput, InitOperation};
use delta_operations::providers::Git2Provider;

use super::RunContext;
use crate::error::Result;

#[derive(Args, Debug)]
pub(crate) struct InitArgs {
    /// Name of the project directory to create
    name: String,

    /// Org to fill the project from
    #[arg(long, short = 'u', value_name = "ORG")]
    org: String,

    /// Metadata types to retrieve, comma separated
    #[arg(long, short = 'm', value_delimiter = ',', required = true)]
    types: Vec<String>,

    /// Directory to create the project in (default: current root)
    #[arg(long)]
    parent_dir: Option<PathBuf>,

    /// URL to register as the `origin` remote
    #[arg(long)]
    remote: Option<String>,
}

pub(crate) fn run(ctx: &RunContext, args: InitArgs) -> Result<()> {
    let sfdx = ctx.sfdx();
    let operation = InitOperation::new(Arc::clone(&sfdx), sfdx, Arc::new(Git2Provider::new()));
    let input = InitInput {
        parent_dir: args.parent_dir.unwrap_or_else(|| ctx.root.clone()),
        name: args.name,
        org: args.org,
        metadata_types: args.types,
        remote: args.remote,
    };

    let output = operation.execute(&input)?;

    println!("Created {}", output.project_dir.display());
    println!("Retrieved {} entries", output.retrieved.len());
    println!("Committed {}", output.commit.sha);
    Ok(())
}
