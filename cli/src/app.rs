//! Application context: everything a run needs besides the browser.
//!
//! Constructed once in `Cli::run()` before the menu is shown, so a bad
//! setting or selector file fails the run before any prompt.

use anyhow::Result;

use crate::application::services::platform::{cloud_host, code_host};
use crate::domain::{PlatformIdentity, PlatformSelectors};
use crate::infra::env_store::{ENV_FILE_NAME, EnvFileStore};
use crate::infra::operator::ConsoleOperator;
use crate::infra::selectors::load_catalog;
use crate::infra::session_store::CookieFileStore;
use crate::infra::settings::Settings;
use crate::output::OutputContext;

/// Unified application context passed to the workflow runner.
pub struct AppContext {
    /// Terminal output context (colors).
    pub output: OutputContext,
    /// `MOEMAIL_*` runtime settings.
    pub settings: Settings,
    /// The `.env` store in the base directory.
    pub config: EnvFileStore,
    /// Per-platform cookie files in the base directory.
    pub sessions: CookieFileStore,
    /// Console prompts.
    pub operator: ConsoleOperator,
    pub github_selectors: PlatformSelectors,
    pub cloudflare_selectors: PlatformSelectors,
}

impl AppContext {
    /// Load settings, the config store and the selector catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if a setting is invalid, the base directory cannot
    /// be determined, `.env` cannot be read, or a platform lacks selectors.
    pub fn new() -> Result<Self> {
        let settings = Settings::from_env()?;
        let base_dir = settings.base_dir()?;
        tracing::debug!(base_dir = %base_dir.display(), "using base directory");

        let catalog = load_catalog(settings.selectors.as_deref())?;
        let github_selectors = catalog.platform(&PlatformIdentity::github().name)?;
        github_selectors.require(code_host::REQUIRED_ELEMENTS)?;
        let cloudflare_selectors = catalog.platform(&PlatformIdentity::cloudflare().name)?;
        cloudflare_selectors.require(cloud_host::REQUIRED_ELEMENTS)?;

        Ok(Self {
            output: OutputContext::new(),
            config: EnvFileStore::open(base_dir.join(ENV_FILE_NAME))?,
            sessions: CookieFileStore::new(&base_dir),
            operator: ConsoleOperator,
            github_selectors,
            cloudflare_selectors,
            settings,
        })
    }
}
