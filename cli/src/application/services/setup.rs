//! Application service: values that must exist before any workflow runs.

use anyhow::Result;

use crate::application::ports::{ConfigStore, Operator};
use crate::domain::config::{MOE_MAIL_DOMAIN, generate_shared_secret, SHARED_SECRET_LEN};
use crate::domain::{ConfigEntries, SiteDomain};

/// Return the persisted site domain, asking the operator when it is unset or
/// unusable. A newly entered domain is persisted before returning.
///
/// # Errors
///
/// Returns an error if the prompt fails or the domain cannot be persisted.
pub fn ensure_domain(config: &impl ConfigStore, operator: &impl Operator) -> Result<SiteDomain> {
    if let Some(stored) = config.get(MOE_MAIL_DOMAIN) {
        match SiteDomain::parse(&stored) {
            Ok(domain) => return Ok(domain),
            Err(e) => tracing::warn!(error = %e, "stored {MOE_MAIL_DOMAIN} is unusable"),
        }
    }
    let domain = operator.ask_domain()?;
    config.merge_update(&ConfigEntries::from([(
        MOE_MAIL_DOMAIN.to_string(),
        domain.as_str().to_string(),
    )]))?;
    Ok(domain)
}

/// Keep the stored shared secret when there is one so that sessions of an
/// already deployed site stay valid; otherwise generate a new one.
#[must_use]
pub fn shared_secret(config: &impl ConfigStore, key: &str) -> String {
    config
        .get(key)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| generate_shared_secret(SHARED_SECRET_LEN))
}
