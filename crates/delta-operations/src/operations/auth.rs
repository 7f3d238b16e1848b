use std::path::PathBuf;
use std::sync::Arc;

use delta_config::Config;
use tracing::info;

use crate::traits::{AuthorizedOrg, JwtGrant, OrgAuthenticator};
use crate::{OperationError, Result};

/// Where the JWT grant parameters come from.
#[derive(Debug, Clone)]
pub enum AuthInput {
    Explicit {
        user: String,
        key_file: PathBuf,
        client_id: String,
        alias: String,
    },
    /// An `[[instance]]` from the configuration file.
    Instance(String),
}

pub struct AuthOperation<A> {
    authenticator: Arc<A>,
}

impl<A> AuthOperation<A>
where
    A: OrgAuthenticator,
{
    pub fn new(authenticator: Arc<A>) -> Self {
        Self { authenticator }
    }

    /// # Errors
    ///
    /// Returns [`OperationError::UnknownInstance`] or
    /// [`OperationError::MissingKeyFile`] for unusable instance aliases, or
    /// the backend's error if the grant is rejected.
    pub fn execute(&self, config: &Config, input: &AuthInput) -> Result<AuthorizedOrg> {
        let authorized = match input {
            AuthInput::Explicit {
                user,
                key_file,
                client_id,
                alias,
            } => self.authenticator.authorize_jwt(&JwtGrant {
                user,
                key_file,
                client_id,
                alias,
            })?,
            AuthInput::Instance(name) => {
                let instance = config
                    .instance(name)
                    .ok_or_else(|| OperationError::UnknownInstance(name.clone()))?;
                let key_file = instance
                    .key_file
                    .as_deref()
                    .ok_or_else(|| OperationError::MissingKeyFile(name.clone()))?;
                self.authenticator.authorize_jwt(&JwtGrant {
                    user: &instance.user,
                    key_file,
                    client_id: &instance.client_id,
                    alias: &instance.alias,
                })?
            }
        };

        info!(
            org_id = %authorized.org_id,
            instance_url = %authorized.instance_url,
            "authorized org"
        );
        Ok(authorized)
    }
}
