//! Workflow selection and the values flowing between workflow steps.

use crate::domain::config::{
    AUTH_GITHUB_ID, AUTH_GITHUB_SECRET, AUTH_SECRET, CLOUDFLARE_ACCOUNT_ID, ConfigEntries,
    DATABASE_ID, DATABASE_NAME, KV_NAMESPACE_ID,
};
use crate::domain::error::InputError;

/// One operator-selectable operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    /// Register the app, provision Cloudflare, deploy.
    FullPipeline,
    RegisterApp,
    ProvisionCloud,
    Deploy,
}

impl Workflow {
    /// All workflows in menu order (choices 1–4).
    pub const ALL: [Workflow; 4] = [
        Workflow::FullPipeline,
        Workflow::RegisterApp,
        Workflow::ProvisionCloud,
        Workflow::Deploy,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Workflow::FullPipeline => "Run the full pipeline",
            Workflow::RegisterApp => "Register the GitHub OAuth app only",
            Workflow::ProvisionCloud => "Provision Cloudflare resources only",
            Workflow::Deploy => "Deploy from GitHub only",
        }
    }
}

/// Result of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    Run(Workflow),
}

/// Parse a menu answer in the range 0–4.
///
/// # Errors
///
/// Returns [`InputError::InvalidChoice`] for anything else.
pub fn parse_menu_choice(input: &str) -> Result<MenuChoice, InputError> {
    let n: usize = input.trim().parse().map_err(|_| InputError::InvalidChoice)?;
    match n {
        0 => Ok(MenuChoice::Exit),
        n => Workflow::ALL
            .get(n - 1)
            .copied()
            .map(MenuChoice::Run)
            .ok_or(InputError::InvalidChoice),
    }
}

/// Credentials of the registered GitHub OAuth application.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl OAuthCredentials {
    /// Config entries persisted after registration.
    #[must_use]
    pub fn to_entries(&self, shared_secret: &str) -> ConfigEntries {
        ConfigEntries::from([
            (AUTH_GITHUB_ID.to_string(), self.client_id.clone()),
            (AUTH_GITHUB_SECRET.to_string(), self.client_secret.clone()),
            (AUTH_SECRET.to_string(), shared_secret.to_string()),
        ])
    }
}

/// Identifiers of the provisioned Cloudflare resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudResources {
    pub kv_namespace_id: String,
    pub database_id: String,
    pub database_name: String,
    pub account_id: String,
}

impl CloudResources {
    #[must_use]
    pub fn to_entries(&self) -> ConfigEntries {
        ConfigEntries::from([
            (KV_NAMESPACE_ID.to_string(), self.kv_namespace_id.clone()),
            (DATABASE_ID.to_string(), self.database_id.clone()),
            (DATABASE_NAME.to_string(), self.database_name.clone()),
            (CLOUDFLARE_ACCOUNT_ID.to_string(), self.account_id.clone()),
        ])
    }
}
