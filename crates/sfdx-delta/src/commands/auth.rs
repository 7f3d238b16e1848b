use std::path::PathBuf;

use clap::Args;
use delta_operations::operations::{AuthInput, AuthOperation};

use super::RunContext;
use crate::error::{CliError, Result};

#[derive(Args, Debug)]
pub(crate) struct AuthArgs {
    /// Use the `[[instance]]` with this alias from the configuration file
    #[arg(long, conflicts_with_all = ["user", "key_file", "client_id"])]
    instance: Option<String>,

    /// Username to authorize
    #[arg(long)]
    user: Option<String>,

    /// Private key that signs the JWT
    #[arg(long, short = 'f')]
    key_file: Option<PathBuf>,

    /// Connected app consumer key
    #[arg(long, short = 'i')]
    client_id: Option<String>,

    /// Alias to store the org under (default: the username)
    #[arg(long, short = 'a')]
    alias: Option<String>,
}

impl AuthArgs {
    fn into_input(self) -> Result<AuthInput> {
        if let Some(name) = self.instance {
            return Ok(AuthInput::Instance(name));
        }
        match (self.user, self.key_file, self.client_id) {
            (Some(user), Some(key_file), Some(client_id)) => Ok(AuthInput::Explicit {
                alias: self.alias.unwrap_or_else(|| user.clone()),
                user,
                key_file,
                client_id,
            }),
            _ => Err(CliError::IncompleteGrant),
        }
    }
}

pub(crate) fn run(ctx: &RunContext, args: AuthArgs) -> Result<()> {
    let input = args.into_input()?;
    let operation = AuthOperation::new(ctx.sfdx());

    let org = operation.execute(&ctx.config, &input)?;

    println!(
        "Authorized {} ({}) at {}",
        org.username.as_deref().unwrap_or("org"),
        org.org_id,
        org.instance_url
    );
    Ok(())
}
