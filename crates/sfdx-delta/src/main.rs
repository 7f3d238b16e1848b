mod commands;
mod error;
mod logging;
mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use delta_config::{Config, discover_config, load_config};

use crate::commands::{Commands, RunContext};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "sfdx-delta")]
#[command(bin_name = "sfdx-delta")]
#[command(about = "Deploy only what changed between two revisions, with only the tests that cover it", long_about = None)]
#[command(version)]
struct Cli {
    /// Repository root (default: current directory)
    #[arg(long = "path", short = 'C', global = true)]
    path: Option<PathBuf>,

    /// Configuration file (default: sfdx-delta.toml in the repository root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Program used for org, retrieve, convert and deploy calls
    #[arg(long = "sfdx", global = true, default_value = "sfdx")]
    sfdx: String,

    /// Log debug detail to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let ctx = match build_context(cli.path, cli.config.as_deref(), cli.sfdx) {
        Ok(ctx) => ctx,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = cli.command.execute(&ctx) {
        print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn build_context(
    path: Option<PathBuf>,
    config_file: Option<&Path>,
    sfdx: String,
) -> Result<RunContext, CliError> {
    let root = match path {
        Some(p) => p,
        None => std::env::current_dir().map_err(CliError::CurrentDir)?,
    };
    let config: Config = match config_file {
        Some(file) => load_config(file)?,
        None => discover_config(&root)?,
    };
    Ok(RunContext { root, config, sfdx })
}

fn print_error(error: &CliError) {
    eprintln!("error: {}", error.report());
}
