use clap::Args;
use delta_operations::operations::OrgsOperation;

use super::RunContext;
use crate::error::{CliError, Result};

#[derive(Args, Debug)]
pub(crate) struct LogoutArgs {
    /// Usernames to log out of
    users: Vec<String>,

    /// Log out of every configured instance user that is logged in
    #[arg(long, conflicts_with = "users")]
    staging: bool,
}

pub(crate) fn list(ctx: &RunContext) -> Result<()> {
    let orgs = OrgsOperation::new(ctx.sfdx()).list()?;

    if orgs.is_empty() {
        println!("No authenticated orgs.");
        return Ok(());
    }
    for org in &orgs {
        match &org.alias {
            Some(alias) => println!("{alias}\t{}\t{}", org.username, org.org_id),
            None => println!("-\t{}\t{}", org.username, org.org_id),
        }
    }
    Ok(())
}

pub(crate) fn logout(ctx: &RunContext, args: &LogoutArgs) -> Result<()> {
    let operation = OrgsOperation::new(ctx.sfdx());

    let done = if args.staging {
        operation.logout_staging(&ctx.config)?
    } else if args.users.is_empty() {
        return Err(CliError::NoLogoutTarget);
    } else {
        operation.logout(args.users.iter().map(String::as_str))?
    };

    for user in &done {
        println!("Logged out {user}");
    }
    Ok(())
}
