use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use delta_core::ChangedFile;
use delta_operations::operations::{ChangesOperation, write_path_list};
use delta_operations::providers::Git2Provider;

use super::{RangeArgs, RunContext};
use crate::error::Result;

#[derive(Args, Debug)]
pub(crate) struct ChangesArgs {
    #[command(flatten)]
    range: RangeArgs,

    /// Also write the paths to this file, one per line
    #[arg(long, value_name = "FILE")]
    write_list: Option<PathBuf>,
}

pub(crate) fn run(ctx: &RunContext, args: &ChangesArgs) -> Result<()> {
    let config = args.range.apply(ctx.config.pipeline().clone())?;
    let operation = ChangesOperation::new(Arc::new(Git2Provider::new()));

    let changed = operation.execute(&ctx.root, &config, &args.range.revision_range())?;

    for file in &changed {
        println!("{}\t{}", file.status().code(), file.path());
    }
    if let Some(path) = &args.write_list {
        write_path_list(path, changed.iter().map(ChangedFile::path))?;
    }
    Ok(())
}
