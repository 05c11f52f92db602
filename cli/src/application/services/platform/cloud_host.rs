//! Cloudflare adapter: KV namespace, D1 database, Pages project and its
//! encrypted variables.

use anyhow::{Context, Result};

use crate::application::ports::{BrowserDriver, CloudHost, Operator, Platform, ProgressReporter};
use crate::application::services::platform::{LOGIN_INDICATOR, interactive_login};
use crate::application::services::ui::{Ui, non_empty};
use crate::domain::{
    CloudResources, ConfigEntries, PlatformIdentity, PlatformSelectors, ProvisionError, UiTiming,
};

pub const REQUIRED_ELEMENTS: &[&str] = &[
    LOGIN_INDICATOR,
    "storage_menu",
    "kv_menu",
    "d1_menu",
    "create_resource_button",
    "kv_name_input",
    "kv_add_button",
    "d1_name_input",
    "d1_create_button",
    "kv_namespace_id",
    "database_id",
    "workers_menu",
    "pages_tab",
    "upload_assets_button",
    "pages_name_input",
    "pages_create_button",
    "home_menu",
    "account_id",
    "project_link",
    "settings_tab",
    "deployments_tab",
    "add_variable_button",
    "variable_type_dropdown",
    "variable_type_secret",
    "variable_name_input",
    "variable_value_input",
    "save_variable_button",
];

/// Cloudflare dashboard driven through a browser tab.
pub struct Cloudflare<'a, B, O> {
    identity: PlatformIdentity,
    ui: Ui<'a, B>,
    operator: &'a O,
}

impl<'a, B: BrowserDriver, O: Operator> Cloudflare<'a, B, O> {
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
            identity: PlatformIdentity::cloudflare(),
            ui: Ui::new(browser, selectors, timing),
            operator,
        })
    }

    async fn open_storage(&self, section: &str) -> Result<()> {
        self.ui.click("storage_menu").await?;
        self.ui.click(section).await
    }

    async fn add_secret_variable(&self, key: &str, value: &str) -> Result<()> {
        self.ui.click("add_variable_button").await?;
        self.ui.click("variable_type_dropdown").await?;
        self.ui.click("variable_type_secret").await?;
        self.ui.fill("variable_name_input", key).await?;
        self.ui.fill("variable_value_input", value).await?;
        self.ui.click("save_variable_button").await?;
        self.ui.settle().await;
        tracing::info!(key, "pages secret saved");
        Ok(())
    }
}

impl<B: BrowserDriver, O: Operator> Platform for Cloudflare<'_, B, O> {
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

impl<B: BrowserDriver, O: Operator> CloudHost for Cloudflare<'_, B, O> {
    async fn create_kv_namespace(&self, name: &str) -> Result<String> {
        self.open_storage("kv_menu").await?;
        self.ui.click("create_resource_button").await?;
        self.ui.fill("kv_name_input", name).await?;
        self.ui.settle().await;
        self.ui.click("kv_add_button").await?;
        self.ui.expect_text(name).await?;

        let id = self.ui.read("kv_namespace_id").await?;
        tracing::info!(name, id = %id, "KV namespace created");
        Ok(id)
    }

    async fn create_database(&self, name: &str) -> Result<String> {
        self.open_storage("d1_menu").await?;
        self.ui.click("create_resource_button").await?;
        self.ui.fill("d1_name_input", name).await?;
        self.ui.click("d1_create_button").await?;
        self.ui.expect_text(name).await?;

        // The detail page has no id; the list has.
        self.ui.click("kv_menu").await?;
        self.ui.click("d1_menu").await?;
        let id = self.ui.read("database_id").await?;
        tracing::info!(name, id = %id, "D1 database created");
        Ok(id)
    }

    async fn create_pages_project(&self, name: &str) -> Result<String> {
        self.ui.click("workers_menu").await?;
        self.ui.click("pages_tab").await?;
        self.ui.click("upload_assets_button").await?;
        self.ui.fill("pages_name_input", name).await?;
        self.ui.settle().await;
        self.ui.click("pages_create_button").await?;
        self.ui.settle().await;

        // The account panel only renders after the overview is reloaded.
        let refreshes = self.ui.timing().panel_refreshes;
        for attempt in 1..=refreshes {
            self.ui.click("home_menu").await?;
            self.ui.settle().await;
            self.ui.click("workers_menu").await?;
            if let Some(panel) = self.ui.probe("account_id").await? {
                let account_id = non_empty(&self.identity.name, "account_id", &panel).await?;
                tracing::info!(name, attempt, "pages project created");
                return Ok(account_id);
            }
            tracing::debug!(attempt, refreshes, "account id panel not shown yet");
        }
        Err(ProvisionError::ElementNotFound {
            platform: self.identity.name.clone(),
            element: "account_id".to_string(),
            timeout_secs: self.ui.timing().probe_timeout.as_secs() * u64::from(refreshes),
        }
        .into())
    }

    async fn configure_deployment_secrets(&self, secrets: &ConfigEntries) -> Result<()> {
        self.ui.click("project_link").await?;
        for (index, (key, value)) in secrets.iter().enumerate() {
            if index > 0 {
                self.ui.click("deployments_tab").await?;
            }
            self.ui.click("settings_tab").await?;
            self.add_secret_variable(key, value)
                .await
                .with_context(|| format!("adding pages secret {key}"))?;
        }
        Ok(())
    }
}

/// Create every cloud resource for `project` and configure `pages_secrets`
/// on the Pages project.
///
/// # Errors
///
/// Returns the first failing capability's error; nothing after it runs.
pub async fn provision_all(
    cloud: &impl CloudHost,
    project: &str,
    pages_secrets: &ConfigEntries,
    reporter: &impl ProgressReporter,
) -> Result<CloudResources> {
    reporter.step(&format!("creating KV namespace '{project}'..."));
    let kv_namespace_id = cloud.create_kv_namespace(project).await?;

    reporter.step(&format!("creating D1 database '{project}'..."));
    let database_id = cloud.create_database(project).await?;

    reporter.step(&format!("creating Pages project '{project}'..."));
    let account_id = cloud.create_pages_project(project).await?;

    reporter.step("configuring Pages secrets...");
    cloud.configure_deployment_secrets(pages_secrets).await?;

    Ok(CloudResources {
        kv_namespace_id,
        database_id,
        database_name: project.to_string(),
        account_id,
    })
}
