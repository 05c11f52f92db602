//! Platform identities, the site domain, and UI timing bounds.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::domain::error::InputError;

/// Path appended to the site domain to form the OAuth callback URL.
pub const CALLBACK_PATH: &str = "/api/auth/callback/github";

/// Name given to the registered OAuth application.
pub const OAUTH_APP_NAME: &str = "MoeMail";

static SITE_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^https?://[^\s/?#]+(/[^\s?#]*)?$").expect("valid regex")
});

static REPOSITORY_ROOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^(https?://[^/]+/[^/?#]+/[^/?#]+)").expect("valid regex")
});

/// Name and entry points of one automated web platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformIdentity {
    /// Display name, also the session key.
    pub name: String,
    /// Page visited after a session is restored.
    pub main_url: String,
    /// Page where interactive login starts.
    pub login_url: String,
}

impl PlatformIdentity {
    #[must_use]
    pub fn github() -> Self {
        Self {
            name: "GitHub".to_string(),
            main_url: "https://github.com/settings/developers".to_string(),
            login_url: "https://github.com/login".to_string(),
        }
    }

    #[must_use]
    pub fn cloudflare() -> Self {
        Self {
            name: "Cloudflare".to_string(),
            main_url: "https://dash.cloudflare.com/".to_string(),
            login_url: "https://dash.cloudflare.com/".to_string(),
        }
    }
}

/// File name holding the persisted session of `platform`.
#[must_use]
pub fn session_file_name(platform: &str) -> String {
    format!("{}_cookies.json", platform.to_lowercase())
}

/// The public URL the deployed site will be served from.
///
/// Always stored without a trailing `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDomain(String);

impl SiteDomain {
    /// Parse and normalise an operator-supplied domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty or not an `http(s)://` URL.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(InputError::EmptyDomain);
        }
        if !SITE_DOMAIN_RE.is_match(trimmed) {
            return Err(InputError::InvalidDomain(raw.trim().to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// OAuth callback URL derived from the domain.
    #[must_use]
    pub fn callback_url(&self) -> String {
        format!("{}{CALLBACK_PATH}", self.0)
    }
}

impl std::fmt::Display for SiteDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `https://host/owner/repo` part of any URL inside a repository.
#[must_use]
pub fn repository_root(url: &str) -> Option<String> {
    REPOSITORY_ROOT_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Form for adding one Actions secret to a repository.
#[must_use]
pub fn new_repository_secret_url(repo_root: &str) -> String {
    format!("{repo_root}/settings/secrets/actions/new")
}

/// Actions overview of a repository.
#[must_use]
pub fn repository_actions_url(repo_root: &str) -> String {
    format!("{repo_root}/actions")
}

// ── Timing ───────────────────────────────────────────────────────────────────

/// Bounds for every wait the platform adapters perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiTiming {
    /// Wait for an element the flow cannot continue without.
    pub element_timeout: Duration,
    /// Wait for an element whose absence selects another branch.
    pub probe_timeout: Duration,
    /// Pause after actions that trigger a page transition.
    pub settle_delay: Duration,
    /// Pause before asking the operator to confirm a sudo/2FA prompt.
    pub reveal_delay: Duration,
    /// Number of console re-navigations while waiting for the account id.
    pub panel_refreshes: u32,
}

impl Default for UiTiming {
    fn default() -> Self {
        Self {
            element_timeout: Duration::from_secs(6),
            probe_timeout: Duration::from_secs(3),
            settle_delay: Duration::from_secs(2),
            reveal_delay: Duration::from_secs(5),
            panel_refreshes: 3,
        }
    }
}
