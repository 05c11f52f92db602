//! Application service: platform authentication.
//!
//! "Authenticate" means: resume the persisted session when there is one,
//! otherwise run the platform's interactive login once and persist the
//! resulting cookies.

use anyhow::{Context, Result};

use crate::application::ports::{CookieJar, Platform, ProgressReporter, SessionStore};
use crate::domain::ProvisionError;

/// Authenticate against `platform`.
///
/// A restored session always counts as success; whether the platform still
/// accepts it only surfaces in later steps.
///
/// # Errors
///
/// Returns [`ProvisionError::AuthenticationFailed`] when an interactive login
/// is not confirmed, or an I/O error from the session store or browser.
pub async fn authenticate(
    platform: &impl Platform,
    sessions: &impl SessionStore,
    jar: &impl CookieJar,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let identity = platform.identity();
    let name = identity.name.as_str();

    if let Some(cookies) = sessions.load(name).await? {
        reporter.step(&format!("resuming saved {name} session..."));
        jar.restore(&identity.main_url, &cookies)
            .await
            .with_context(|| format!("restoring {name} session"))?;
        platform.visit_main_page().await?;
        tracing::info!(platform = name, cookies = cookies.len(), "session restored");
        return Ok(());
    }

    reporter.step(&format!("no saved {name} session, starting login..."));
    if !platform.login().await? {
        tracing::warn!(platform = name, "login not confirmed");
        return Err(ProvisionError::AuthenticationFailed {
            platform: name.to_string(),
        }
        .into());
    }

    let cookies = jar
        .cookies()
        .await
        .with_context(|| format!("reading {name} cookies"))?;
    sessions.save(name, &cookies).await?;
    tracing::info!(platform = name, cookies = cookies.len(), "session saved");
    reporter.success(&format!("logged in to {name}, session saved"));
    Ok(())
}
