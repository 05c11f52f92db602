//! GitHub adapter: OAuth app registration, fork, repository secrets and
//! workflow dispatch.

use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::application::ports::{BrowserDriver, CodeHost, Operator, PageElement, Platform};
use crate::application::services::platform::{LOGIN_INDICATOR, interactive_login};
use crate::application::services::ui::Ui;
use crate::domain::platform::{
    OAUTH_APP_NAME, new_repository_secret_url, repository_actions_url, repository_root,
};
use crate::domain::{
    ConfigEntries, OAuthCredentials, PlatformIdentity, PlatformSelectors, SiteDomain, UiTiming,
};

const FORK_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Every selector this adapter looks up.
pub const REQUIRED_ELEMENTS: &[&str] = &[
    LOGIN_INDICATOR,
    "new_oauth_app",
    "app_name_input",
    "app_url_input",
    "callback_url_input",
    "register_app_button",
    "app_created_notice",
    "client_id",
    "generate_secret_button",
    "sudo_prompt",
    "secret_created_notice",
    "client_secret",
    "existing_fork_link",
    "create_fork_button",
    "secret_name_input",
    "secret_value_input",
    "add_secret_button",
    "enable_workflows_button",
    "deploy_workflow_link",
    "run_workflow_menu",
    "run_workflow_option_1",
    "run_workflow_option_2",
    "run_workflow_option_3",
    "run_workflow_button",
];

/// Checkboxes of the "Run workflow" dialog, ticked in order.
const RUN_WORKFLOW_OPTIONS: &[&str] = &[
    "run_workflow_option_1",
    "run_workflow_option_2",
    "run_workflow_option_3",
];

/// GitHub driven through a browser tab.
pub struct GitHub<'a, B, O> {
    identity: PlatformIdentity,
    ui: Ui<'a, B>,
    operator: &'a O,
}

impl<'a, B: BrowserDriver, O: Operator> GitHub<'a, B, O> {
    /// # Errors
    ///
    /// Returns an error if `selectors` lacks any of [`REQUIRED_ELEMENTS`].
    pub fn new(
        browser: &'a B,
        selectors: &'a PlatformSelectors,
        timing: UiTiming,
        operator: &'a O,
    ) -> Result<Self> {
        selectors.require(REQUIRED_ELEMENTS)?;
        Ok(Self {
            identity: PlatformIdentity::github(),
            ui: Ui::new(browser, selectors, timing),
            operator,
        })
    }

    /// Follow the existing fork link, or create the fork. Returns the
    /// repository root URL of the fork.
    async fn open_fork(&self, fork_url: &str) -> Result<String> {
        self.ui.navigate(fork_url).await?;
        if let Some(link) = self.ui.probe("existing_fork_link").await? {
            tracing::info!("fork already exists, reusing it");
            self.ui.settle().await;
            link.click().await.context("opening existing fork")?;
        } else {
            tracing::info!("no fork yet, creating one");
            self.ui.settle().await;
            self.ui.click("create_fork_button").await?;
        }
        self.ui.settle().await;

        // Fork creation redirects asynchronously; the tab stays on the
        // upstream page until it does.
        let upstream = repository_root(fork_url);
        let deadline = tokio::time::Instant::now() + self.ui.timing().element_timeout;
        loop {
            let url = self.ui.current_url().await?;
            let landed = repository_root(&url).filter(|root| {
                !upstream
                    .as_deref()
                    .is_some_and(|up| up.eq_ignore_ascii_case(root))
            });
            if let Some(root) = landed {
                return Ok(root);
            }
            if tokio::time::Instant::now() >= deadline {
                bail!("expected to land on the forked repository, still on {url}");
            }
            tokio::time::sleep(FORK_POLL_INTERVAL).await;
        }
    }

    async fn add_repository_secret(&self, repo: &str, key: &str, value: &str) -> Result<()> {
        self.ui.navigate(&new_repository_secret_url(repo)).await?;
        self.ui.fill("secret_name_input", key).await?;
        self.ui.fill("secret_value_input", value).await?;
        self.ui.click("add_secret_button").await?;
        self.ui.settle().await;
        tracing::info!(key, "repository secret saved");
        Ok(())
    }

    async fn run_deploy_workflow(&self, repo: &str) -> Result<()> {
        self.ui.navigate(&repository_actions_url(repo)).await?;
        // Freshly forked repositories gate Actions behind a confirmation.
        if let Some(gate) = self.ui.probe("enable_workflows_button").await? {
            gate.click().await.context("enabling workflows")?;
            self.ui.settle().await;
        }
        self.ui.click("deploy_workflow_link").await?;
        self.ui.click("run_workflow_menu").await?;
        for option in RUN_WORKFLOW_OPTIONS {
            self.ui.click(option).await?;
        }
        self.ui.click("run_workflow_button").await?;
        tracing::info!(repo, "deploy workflow dispatched");
        Ok(())
    }
}

impl<B: BrowserDriver, O: Operator> Platform for GitHub<'_, B, O> {
    fn identity(&self) -> &PlatformIdentity {
        &self.identity
    }

    async fn visit_main_page(&self) -> Result<()> {
        self.ui.navigate(&self.identity.main_url).await
    }

    async fn login(&self) -> Result<bool> {
        interactive_login(&self.ui, self.operator, &self.identity).await
    }
}

impl<B: BrowserDriver, O: Operator> CodeHost for GitHub<'_, B, O> {
    async fn create_oauth_app(&self, domain: &SiteDomain) -> Result<()> {
        self.ui.navigate(&self.identity.main_url).await?;
        self.ui.click("new_oauth_app").await?;
        self.ui.fill("app_name_input", OAUTH_APP_NAME).await?;
        self.ui.fill("app_url_input", domain.as_str()).await?;
        self.ui
            .fill("callback_url_input", &domain.callback_url())
            .await?;
        self.ui.click("register_app_button").await?;
        self.ui.element("app_created_notice").await?;
        tracing::info!(%domain, "OAuth application registered");
        Ok(())
    }

    async fn oauth_credentials(&self) -> Result<OAuthCredentials> {
        let client_id = self.ui.read("client_id").await?;
        self.ui.click("generate_secret_button").await?;

        if self.ui.probe("sudo_prompt").await?.is_some() {
            tokio::time::sleep(self.ui.timing().reveal_delay).await;
            self.operator.pause(
                "GitHub asks to confirm access. Complete it in the browser, then press Enter",
            )?;
        }

        self.ui.element("secret_created_notice").await?;
        let client_secret = self.ui.read("client_secret").await?;
        tracing::info!(client_id = %client_id, "OAuth credentials read");
        Ok(OAuthCredentials {
            client_id,
            client_secret,
        })
    }

    async fn fork_and_trigger(&self, fork_url: &str, secrets: &ConfigEntries) -> Result<()> {
        let repo = self.open_fork(fork_url).await?;
        tracing::info!(repo = %repo, "using fork");
        for (key, value) in secrets {
            self.add_repository_secret(&repo, key, value)
                .await
                .with_context(|| format!("adding repository secret {key}"))?;
        }
        self.run_deploy_workflow(&repo).await
    }
}
