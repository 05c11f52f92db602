//! CLI argument parsing with clap derive, and the interactive run loop.

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::platform::{Cloudflare, GitHub};
use crate::application::services::resource::run_then_release;
use crate::application::services::setup::ensure_domain;
use crate::application::services::workflow::{DeployOptions, Orchestrator};
use crate::domain::config::TRACKED_KEYS;
use crate::domain::{MenuChoice, Workflow};
use crate::infra::webdriver::WebDriverBrowser;
use crate::output::TerminalReporter;

/// Provision GitHub and Cloudflare for a MoeMail deployment through a browser.
///
/// Reads and writes `.env` and `<platform>_cookies.json` in `MOEMAIL_HOME`
/// (default: the executable's directory). Needs a WebDriver server such as
/// chromedriver at `MOEMAIL_WEBDRIVER_URL` (default: http://localhost:9515).
#[derive(Parser)]
#[command(name = "moemail-deploy", version)]
pub struct Cli {}

impl Cli {
    /// Show the menu and run the chosen workflow.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the chosen workflow, or a setup error.
    pub async fn run(self) -> Result<()> {
        let app = AppContext::new()?;

        app.output.menu();
        let workflow = match app.operator.choose()? {
            MenuChoice::Exit => {
                app.output.success("Nothing to do, bye");
                return Ok(());
            }
            MenuChoice::Run(workflow) => workflow,
        };

        if matches!(workflow, Workflow::FullPipeline | Workflow::RegisterApp) {
            let domain = ensure_domain(&app.config, &app.operator)?;
            app.output.kv("Site", domain.as_str());
            app.output.kv("Callback", &domain.callback_url());
        }

        let result = run_with_browser(&app, workflow).await;
        match &result {
            Ok(()) => app.output.success(&format!("{} finished", workflow.label())),
            Err(_) => app.output.error(&format!("{} stopped", workflow.label())),
        }
        app.output.config_status(TRACKED_KEYS, |key| {
            app.config.get(key).is_some_and(|v| !v.trim().is_empty())
        });
        result
    }
}

/// Open the browser, run `workflow`, and close the browser on every path,
/// including Ctrl-C.
async fn run_with_browser(app: &AppContext, workflow: Workflow) -> Result<()> {
    let browser = WebDriverBrowser::connect(&app.settings.webdriver_url).await?;
    run_then_release(&browser, async {
        tokio::select! {
            result = drive(app, &browser, workflow) => result,
            signal = tokio::signal::ctrl_c() => {
                signal.context("listening for Ctrl-C")?;
                tracing::warn!("interrupted by operator");
                Err(anyhow!("interrupted"))
            }
        }
    })
    .await
}

async fn drive(app: &AppContext, browser: &WebDriverBrowser, workflow: Workflow) -> Result<()> {
    let timing = app.settings.timing();
    let github = GitHub::new(browser, &app.github_selectors, timing, &app.operator)?;
    let cloudflare = Cloudflare::new(browser, &app.cloudflare_selectors, timing, &app.operator)?;
    let reporter = TerminalReporter::new(&app.output);

    let orchestrator = Orchestrator {
        github: &github,
        cloudflare: &cloudflare,
        sessions: &app.sessions,
        jar: browser,
        config: &app.config,
        operator: &app.operator,
        reporter: &reporter,
        options: DeployOptions {
            project_name: app.settings.project_name.clone(),
            fork_url: app.settings.fork_url.clone(),
        },
    };
    orchestrator.run(workflow).await
}
