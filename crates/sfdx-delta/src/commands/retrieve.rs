use std::path::PathBuf;

use clap::Args;
use delta_operations::operations::{RetrieveInput, RetrieveOperation};

use super::RunContext;
use crate::error::Result;

#[derive(Args, Debug)]
pub(crate) struct RetrieveArgs {
    /// Org alias or username to retrieve from
    #[arg(long, short = 'u', value_name = "ORG")]
    org: String,

    /// Metadata types, comma separated (e.g. ApexClass,ApexTrigger)
    #[arg(long, short = 'm', value_delimiter = ',', required = true)]
    types: Vec<String>,

    /// Project directory to retrieve into (default: repository root)
    #[arg(long)]
    project_dir: Option<PathBuf>,

    /// Also write the retrieve output to this file, one line per entry
    #[arg(long, value_name = "FILE")]
    write_list: Option<PathBuf>,
}

pub(crate) fn run(ctx: &RunContext, args: RetrieveArgs) -> Result<()> {
    let operation = RetrieveOperation::new(ctx.sfdx());
    let input = RetrieveInput {
        org: args.org,
        metadata_types: args.types,
        project_dir: args.project_dir.unwrap_or_else(|| ctx.root.clone()),
        write_list: args.write_list,
    };

    let output = operation.execute(&input, &mut |line| println!("{line}"))?;

    if let Some(path) = &output.list_file {
        eprintln!("Wrote {} lines to {}", output.lines.len(), path.display());
    }
    Ok(())
}
