//! Platform adapters: one per automated web platform.
//!
//! Each adapter implements [`Platform`](crate::application::ports::Platform)
//! plus its capability port, driving the browser through [`Ui`] with the
//! platform's selectors.

pub mod cloud_host;
pub mod code_host;

pub use cloud_host::{Cloudflare, provision_all};
pub use code_host::GitHub;

use anyhow::Result;

use crate::application::ports::{BrowserDriver, Operator};
use crate::application::services::ui::Ui;
use crate::domain::PlatformIdentity;

/// Selector every platform uses to recognise a logged-in page.
pub const LOGIN_INDICATOR: &str = "login_indicator";

/// Shared interactive login: open the login page, let the operator sign in,
/// then wait for the platform's logged-in indicator.
async fn interactive_login<B: BrowserDriver>(
    ui: &Ui<'_, B>,
    operator: &impl Operator,
    identity: &PlatformIdentity,
) -> Result<bool> {
    ui.navigate(&identity.login_url).await?;
    operator.pause(&format!(
        "Log in to {} in the browser window, then press Enter to continue",
        identity.name
    ))?;
    let confirmed = ui.probe_within(LOGIN_INDICATOR, ui.timing().element_timeout).await?;
    if confirmed.is_some() {
        tracing::info!(platform = %identity.name, "login confirmed");
        Ok(true)
    } else {
        tracing::warn!(platform = %identity.name, "login indicator did not appear");
        Ok(false)
    }
}
