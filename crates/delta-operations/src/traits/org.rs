use std::path::Path;

use serde::Deserialize;

use crate::Result;

#[derive(Debug, Clone, Copy)]
pub struct JwtGrant<'a> {
    pub user: &'a str,
    pub key_file: &'a Path,
    pub client_id: &'a str,
    pub alias: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedOrg {
    pub org_id: String,
    pub instance_url: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// A non-scratch org the CLI holds credentials for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgSummary {
    pub username: String,
    pub org_id: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub instance_url: Option<String>,
}

pub trait OrgAuthenticator {
    /// Exchanges a signed JWT for an authenticated org session.
    ///
    /// # Errors
    ///
    /// Returns an error if the grant is rejected.
    fn authorize_jwt(&self, grant: &JwtGrant<'_>) -> Result<AuthorizedOrg>;
}

pub trait OrgManager {
    /// # Errors
    ///
    /// Returns an error if the org list cannot be read.
    fn list_orgs(&self) -> Result<Vec<OrgSummary>>;

    /// # Errors
    ///
    /// Returns an error if the backend refuses to log out `user`.
    fn logout(&self, user: &str) -> Result<()>;
}
