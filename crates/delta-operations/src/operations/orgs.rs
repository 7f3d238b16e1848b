use std::sync::Arc;

use delta_config::Config;
use indexmap::IndexSet;
use tracing::{debug, info};

use crate::Result;
use crate::traits::{OrgManager, OrgSummary};

/// Lists and logs out of authenticated orgs.
pub struct OrgsOperation<M> {
    manager: Arc<M>,
}

impl<M> OrgsOperation<M>
where
    M: OrgManager,
{
    pub fn new(manager: Arc<M>) -> Self {
        Self { manager }
    }

    /// # Errors
    ///
    /// Returns an error if the backend cannot list orgs.
    pub fn list(&self) -> Result<Vec<OrgSummary>> {
        self.manager.list_orgs()
    }

    /// Logs out of each user once, in the given order.
    ///
    /// # Errors
    ///
    /// Stops at the first logout the backend refuses.
    pub fn logout<I, S>(&self, users: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let users: IndexSet<String> = users.into_iter().map(Into::into).collect();
        for user in &users {
            self.manager.logout(user)?;
            info!(user = %user, "logged out");
        }
        Ok(users.into_iter().collect())
    }

    /// Logs out of every configured instance user that is currently
    /// authenticated.
    ///
    /// # Errors
    ///
    /// Returns an error if the org list cannot be read or a logout fails.
    pub fn logout_staging(&self, config: &Config) -> Result<Vec<String>> {
        let authenticated: IndexSet<String> = self
            .manager
            .list_orgs()?
            .into_iter()
            .map(|org| org.username)
            .collect();

        let users: Vec<&str> = config
            .instances()
            .iter()
            .map(|instance| instance.user.as_str())
            .filter(|user| {
                let known = authenticated.contains(*user);
                if !known {
                    debug!(user, "instance user not authenticated; skipping");
                }
                known
            })
            .collect();

        self.logout(users)
    }
}
