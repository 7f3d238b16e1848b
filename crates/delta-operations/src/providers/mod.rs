mod command;
mod git;
mod sfdx;

pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use git::Git2Provider;
pub use sfdx::SfdxCli;
