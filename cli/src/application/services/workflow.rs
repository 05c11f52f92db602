//! Application service: the four operator-selectable workflows.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Steps run strictly in order; the first failure aborts the workflow and
//! everything persisted by earlier steps stays in place for a retry.

use std::future::Future;

use anyhow::Result;

use crate::application::ports::{
    CloudHost, CodeHost, ConfigStore, CookieJar, Operator, ProgressReporter, SessionStore,
};
use crate::application::services::platform::provision_all;
use crate::application::services::session::authenticate;
use crate::application::services::setup::shared_secret;
use crate::domain::config::{
    AUTH_SECRET, CLOUDFLARE_API_TOKEN, MOE_MAIL_DOMAIN, PAGES_SECRET_KEYS, REPOSITORY_SECRET_KEYS,
};
use crate::domain::{ConfigEntries, ProvisionError, SiteDomain, Workflow};

/// Names of what gets created and forked.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Name of the KV namespace, the D1 database and the Pages project.
    pub project_name: String,
    /// Fork page of the upstream repository.
    pub fork_url: String,
}

/// Everything a workflow touches, injected by the caller.
pub struct Orchestrator<'a, G, C, S, J, K, O, R> {
    pub github: &'a G,
    pub cloudflare: &'a C,
    pub sessions: &'a S,
    pub jar: &'a J,
    pub config: &'a K,
    pub operator: &'a O,
    pub reporter: &'a R,
    pub options: DeployOptions,
}

impl<G, C, S, J, K, O, R> Orchestrator<'_, G, C, S, J, K, O, R>
where
    G: CodeHost,
    C: CloudHost,
    S: SessionStore,
    J: CookieJar,
    K: ConfigStore,
    O: Operator,
    R: ProgressReporter,
{
    /// Run `workflow` to completion or to its first failing step.
    ///
    /// # Errors
    ///
    /// Returns the failing step's error, with the step name as context.
    pub async fn run(&self, workflow: Workflow) -> Result<()> {
        tracing::info!(workflow = workflow.label(), "workflow started");
        match workflow {
            Workflow::FullPipeline => {
                self.register_app().await?;
                self.provision_cloud().await?;
                self.deploy().await?;
            }
            Workflow::RegisterApp => self.register_app().await?,
            Workflow::ProvisionCloud => self.provision_cloud().await?,
            Workflow::Deploy => self.deploy().await?,
        }
        tracing::info!(workflow = workflow.label(), "workflow finished");
        Ok(())
    }

    /// GitHub login → OAuth app → credentials → persist.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::MissingConfig`] when no site domain is
    /// stored, or the first failing step's error.
    pub async fn register_app(&self) -> Result<()> {
        let domain = self.site_domain()?;

        self.step(
            "Authenticating with GitHub",
            authenticate(self.github, self.sessions, self.jar, self.reporter),
        )
        .await?;
        self.step("Registering OAuth application", self.github.create_oauth_app(&domain))
            .await?;
        let credentials = self
            .step("Reading OAuth credentials", self.github.oauth_credentials())
            .await?;
        self.step("Saving OAuth credentials", async {
            let secret = shared_secret(self.config, AUTH_SECRET);
            self.config.merge_update(&credentials.to_entries(&secret))
        })
        .await
    }

    /// Cloudflare login → KV, D1, Pages and Pages secrets → persist ids.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::MissingConfig`] when the OAuth values are
    /// not stored yet, or the first failing step's error.
    pub async fn provision_cloud(&self) -> Result<()> {
        let pages_secrets = require_keys(self.config, PAGES_SECRET_KEYS)?;

        self.step(
            "Authenticating with Cloudflare",
            authenticate(self.cloudflare, self.sessions, self.jar, self.reporter),
        )
        .await?;
        let resources = self
            .step(
                "Provisioning Cloudflare resources",
                provision_all(
                    self.cloudflare,
                    &self.options.project_name,
                    &pages_secrets,
                    self.reporter,
                ),
            )
            .await?;
        self.step("Saving Cloudflare identifiers", async {
            self.config.merge_update(&resources.to_entries())
        })
        .await
    }

    /// GitHub login → fork → repository secrets → deploy workflow.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::MissingConfig`] when a cloud identifier is
    /// not stored yet, or the first failing step's error.
    pub async fn deploy(&self) -> Result<()> {
        let secrets = self.repository_secrets()?;

        self.step(
            "Authenticating with GitHub",
            authenticate(self.github, self.sessions, self.jar, self.reporter),
        )
        .await?;
        self.step(
            "Forking repository and triggering deployment",
            self.github.fork_and_trigger(&self.options.fork_url, &secrets),
        )
        .await
    }

    async fn step<T>(&self, name: &str, work: impl Future<Output = Result<T>>) -> Result<T> {
        self.reporter.step(&format!("{name}..."));
        tracing::debug!(step = name, "step started");
        match work.await {
            Ok(value) => {
                tracing::info!(step = name, "step succeeded");
                self.reporter.success(name);
                Ok(value)
            }
            Err(e) => {
                tracing::error!(step = name, error = %format!("{e:#}"), "step failed");
                Err(e.context(format!("{name} failed")))
            }
        }
    }

    fn site_domain(&self) -> Result<SiteDomain> {
        let raw = stored(self.config, MOE_MAIL_DOMAIN).ok_or_else(|| {
            ProvisionError::MissingConfig {
                keys: vec![MOE_MAIL_DOMAIN.to_string()],
            }
        })?;
        Ok(SiteDomain::parse(&raw)?)
    }

    /// Repository secrets in submission order. The API token is the only
    /// value no step produces, so it is asked for and persisted here.
    fn repository_secrets(&self) -> Result<ConfigEntries> {
        let produced: Vec<&str> = REPOSITORY_SECRET_KEYS
            .iter()
            .copied()
            .filter(|key| *key != CLOUDFLARE_API_TOKEN)
            .collect();
        let mut found = require_keys(self.config, &produced)?;

        let token = match stored(self.config, CLOUDFLARE_API_TOKEN) {
            Some(token) => token,
            None => {
                self.reporter
                    .warn(&format!("{CLOUDFLARE_API_TOKEN} is not set yet"));
                let token = self
                    .operator
                    .ask_secret("Cloudflare API token (Workers, Pages and D1 edit permission)")?;
                let token = token.trim().to_string();
                if token.is_empty() {
                    return Err(ProvisionError::MissingConfig {
                        keys: vec![CLOUDFLARE_API_TOKEN.to_string()],
                    }
                    .into());
                }
                self.config.merge_update(&ConfigEntries::from([(
                    CLOUDFLARE_API_TOKEN.to_string(),
                    token.clone(),
                )]))?;
                token
            }
        };
        found.insert(CLOUDFLARE_API_TOKEN.to_string(), token);

        Ok(REPOSITORY_SECRET_KEYS
            .iter()
            .filter_map(|key| found.swap_remove_entry(*key))
            .collect())
    }
}

fn stored(config: &impl ConfigStore, key: &str) -> Option<String> {
    config.get(key).filter(|v| !v.trim().is_empty())
}

/// Look up `keys`, failing with every absent one at once.
fn require_keys(config: &impl ConfigStore, keys: &[&str]) -> Result<ConfigEntries> {
    let mut found = ConfigEntries::new();
    let mut missing = Vec::new();
    for key in keys {
        match stored(config, key) {
            Some(value) => {
                found.insert((*key).to_string(), value);
            }
            None => missing.push((*key).to_string()),
        }
    }
    if !missing.is_empty() {
        tracing::warn!(keys = ?missing, "required configuration missing");
        return Err(ProvisionError::MissingConfig { keys: missing }.into());
    }
    Ok(found)
}
