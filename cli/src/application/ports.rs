//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::cli`, or `crate::output`.

use std::time::Duration;

use anyhow::Result;

use crate::domain::{
    ConfigEntries, CookieRecord, Locator, OAuthCredentials, PlatformIdentity, SiteDomain,
};

// ── Browser Ports ─────────────────────────────────────────────────────────────

/// An element located on the current page.
#[allow(async_fn_in_trait)]
pub trait PageElement {
    /// Click the element.
    async fn click(&self) -> Result<()>;
    /// Replace the element's content with `text`.
    async fn input(&self, text: &str) -> Result<()>;
    /// Visible text of the element.
    async fn text(&self) -> Result<String>;
}

/// The live browser tab all adapters drive.
#[allow(async_fn_in_trait)]
pub trait BrowserDriver {
    type Element: PageElement;

    /// Load `url` in the active tab.
    async fn navigate(&self, url: &str) -> Result<()>;
    /// URL of the active tab.
    async fn current_url(&self) -> Result<String>;
    /// Look up an element without waiting; `None` if absent.
    async fn find(&self, locator: &Locator) -> Result<Option<Self::Element>>;
    /// Poll for an element until it appears or `timeout` elapses.
    async fn wait_for(&self, locator: &Locator, timeout: Duration)
    -> Result<Option<Self::Element>>;
}

/// Cookie access on the live browser context.
#[allow(async_fn_in_trait)]
pub trait CookieJar {
    /// All cookies visible to the active tab.
    async fn cookies(&self) -> Result<Vec<CookieRecord>>;
    /// Open `origin` and install `cookies` for it.
    async fn restore(&self, origin: &str, cookies: &[CookieRecord]) -> Result<()>;
}

/// A process-wide resource that must be released exactly once.
#[allow(async_fn_in_trait)]
pub trait Releasable {
    /// Release the resource. Later calls are no-ops.
    async fn release(&self) -> Result<()>;
}

// ── Persistence Ports ─────────────────────────────────────────────────────────

/// Durable key/value store of provisioning outputs and secrets.
pub trait ConfigStore {
    /// Most recent value of `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
    /// Overlay `entries` on the persisted set and write it back as a whole.
    ///
    /// All-or-nothing: on error neither the file nor later `get` calls
    /// observe any of `entries`.
    fn merge_update(&self, entries: &ConfigEntries) -> Result<()>;
    /// Current merged view.
    fn snapshot(&self) -> ConfigEntries;
}

/// Per-platform persisted browser sessions.
#[allow(async_fn_in_trait)]
pub trait SessionStore {
    /// Load the session of `platform`, returning `None` if none was saved.
    async fn load(&self, platform: &str) -> Result<Option<Vec<CookieRecord>>>;
    /// Persist the session of `platform`, replacing any previous one.
    async fn save(&self, platform: &str, cookies: &[CookieRecord]) -> Result<()>;
}

// ── Operator Ports ────────────────────────────────────────────────────────────

/// The human at the console. Every method blocks until they answer.
pub trait Operator {
    /// Show `message` and wait for the operator to press Enter.
    fn pause(&self, message: &str) -> Result<()>;
    /// Ask for a secret value without echoing it.
    fn ask_secret(&self, prompt: &str) -> Result<String>;
    /// Ask for the site domain, re-prompting until it parses.
    fn ask_domain(&self) -> Result<SiteDomain>;
}

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Synchronous.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Platform Ports ────────────────────────────────────────────────────────────

/// Platform-specific half of authentication.
///
/// `services::session::authenticate` supplies the shared half.
#[allow(async_fn_in_trait)]
pub trait Platform {
    fn identity(&self) -> &PlatformIdentity;
    /// Lightweight visit that confirms or refreshes a restored session.
    async fn visit_main_page(&self) -> Result<()>;
    /// Interactive login; `Ok(false)` when it was not confirmed in time.
    async fn login(&self) -> Result<bool>;
}

/// Capabilities of the code-hosting platform.
#[allow(async_fn_in_trait)]
pub trait CodeHost: Platform {
    /// Register the OAuth application for `domain`.
    async fn create_oauth_app(&self, domain: &SiteDomain) -> Result<()>;
    /// Read the client id and a freshly generated client secret.
    async fn oauth_credentials(&self) -> Result<OAuthCredentials>;
    /// Fork (or reuse a fork), store `secrets` on it, and run its deploy workflow.
    async fn fork_and_trigger(&self, fork_url: &str, secrets: &ConfigEntries) -> Result<()>;
}

/// Capabilities of the cloud-hosting platform.
#[allow(async_fn_in_trait)]
pub trait CloudHost: Platform {
    /// Create a KV namespace, returning its id.
    async fn create_kv_namespace(&self, name: &str) -> Result<String>;
    /// Create a D1 database, returning its id.
    async fn create_database(&self, name: &str) -> Result<String>;
    /// Create a Pages project, returning the account id.
    async fn create_pages_project(&self, name: &str) -> Result<String>;
    /// Store `secrets` as encrypted variables of the Pages project.
    async fn configure_deployment_secrets(&self, secrets: &ConfigEntries) -> Result<()>;
}
