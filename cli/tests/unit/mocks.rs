//! Shared mock infrastructure for unit tests.
//!
//! Every mock records the calls it receives so tests can assert on order and
//! on what never happened. Calls a test does not expect fail loudly.

#![allow(clippy::expect_used, dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use moemail_deploy::application::ports::{
    BrowserDriver, CloudHost, CodeHost, ConfigStore, CookieJar, Operator, PageElement, Platform,
    ProgressReporter, Releasable, SessionStore,
};
use moemail_deploy::domain::{
    ConfigEntries, CookieRecord, Locator, OAuthCredentials, PlatformIdentity, PlatformSelectors,
    SiteDomain, UiTiming, merge_entries,
};
use moemail_deploy::infra::selectors::load_catalog;

fn unexpected<T>(what: &str) -> Result<T> {
    anyhow::bail!("{what} not expected in this test")
}

/// Shared, ordered call log.
#[derive(Default)]
pub struct CallLog(Mutex<Vec<String>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().expect("lock").push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().expect("lock").clone()
    }

    pub fn contains(&self, call: &str) -> bool {
        self.calls().iter().any(|c| c == call)
    }
}

pub fn entries(pairs: &[(&str, &str)]) -> ConfigEntries {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Timing with no waits, for adapters driven by [`ScriptedBrowser`].
pub fn instant_timing() -> UiTiming {
    UiTiming {
        element_timeout: Duration::ZERO,
        probe_timeout: Duration::ZERO,
        settle_delay: Duration::ZERO,
        reveal_delay: Duration::ZERO,
        panel_refreshes: 3,
    }
}

/// Selectors of `platform` from the embedded catalog.
pub fn selectors(platform: &str) -> PlatformSelectors {
    load_catalog(None)
        .expect("embedded catalog")
        .platform(platform)
        .expect("platform section")
}

// ── Config store ─────────────────────────────────────────────────────────────

/// In-memory `ConfigStore`. `fail_writes` makes every merge fail untouched.
#[derive(Default)]
pub struct MemoryConfig {
    entries: Mutex<ConfigEntries>,
    pub fail_writes: bool,
    pub writes: CallLog,
}

impl MemoryConfig {
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: Mutex::new(entries(pairs)),
            ..Self::default()
        }
    }

    /// Store holding `pairs` whose every write fails.
    pub fn read_only(pairs: &[(&str, &str)]) -> Self {
        Self {
            fail_writes: true,
            ..Self::with(pairs)
        }
    }
}

impl ConfigStore for MemoryConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("lock").get(key).cloned()
    }

    fn merge_update(&self, updates: &ConfigEntries) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("disk full");
        }
        let mut guard = self.entries.lock().expect("lock");
        *guard = merge_entries(&guard, updates);
        for key in updates.keys() {
            self.writes.push(key.clone());
        }
        Ok(())
    }

    fn snapshot(&self) -> ConfigEntries {
        self.entries.lock().expect("lock").clone()
    }
}

// ── Sessions ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemorySessions {
    saved: Mutex<HashMap<String, Vec<CookieRecord>>>,
    pub saves: CallLog,
}

impl MemorySessions {
    pub fn with(platform: &str, cookies: Vec<CookieRecord>) -> Self {
        let sessions = Self::default();
        sessions
            .saved
            .lock()
            .expect("lock")
            .insert(platform.to_string(), cookies);
        sessions
    }

    pub fn get(&self, platform: &str) -> Option<Vec<CookieRecord>> {
        self.saved.lock().expect("lock").get(platform).cloned()
    }
}

impl SessionStore for MemorySessions {
    async fn load(&self, platform: &str) -> Result<Option<Vec<CookieRecord>>> {
        Ok(self.get(platform))
    }

    async fn save(&self, platform: &str, cookies: &[CookieRecord]) -> Result<()> {
        self.saves.push(platform);
        self.saved
            .lock()
            .expect("lock")
            .insert(platform.to_string(), cookies.to_vec());
        Ok(())
    }
}

/// Cookie jar returning `live` and recording restores.
#[derive(Default)]
pub struct MockJar {
    pub live: Vec<CookieRecord>,
    pub restores: CallLog,
}

impl CookieJar for MockJar {
    async fn cookies(&self) -> Result<Vec<CookieRecord>> {
        Ok(self.live.clone())
    }

    async fn restore(&self, origin: &str, cookies: &[CookieRecord]) -> Result<()> {
        self.restores.push(format!("{origin} ({})", cookies.len()));
        Ok(())
    }
}

// ── Operator / reporter ──────────────────────────────────────────────────────

/// Operator with canned answers. `None` answers are unexpected prompts.
#[derive(Default)]
pub struct MockOperator {
    pub secret: Option<String>,
    pub domain: Option<String>,
    pub prompts: CallLog,
}

impl Operator for MockOperator {
    fn pause(&self, message: &str) -> Result<()> {
        self.prompts.push(format!("pause: {message}"));
        Ok(())
    }

    fn ask_secret(&self, prompt: &str) -> Result<String> {
        self.prompts.push(format!("secret: {prompt}"));
        match &self.secret {
            Some(s) => Ok(s.clone()),
            None => unexpected("ask_secret"),
        }
    }

    fn ask_domain(&self) -> Result<SiteDomain> {
        self.prompts.push("domain");
        match &self.domain {
            Some(d) => Ok(SiteDomain::parse(d)?),
            None => unexpected("ask_domain"),
        }
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub events: CallLog,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.push(format!("step: {message}"));
    }

    fn success(&self, message: &str) {
        self.events.push(format!("ok: {message}"));
    }

    fn warn(&self, message: &str) {
        self.events.push(format!("warn: {message}"));
    }
}

// ── Platforms ────────────────────────────────────────────────────────────────

/// Code host whose capabilities succeed unless named in `fail_on`.
pub struct MockCodeHost {
    pub identity: PlatformIdentity,
    pub login_ok: bool,
    pub fail_on: Option<&'static str>,
    pub calls: CallLog,
    pub forked_with: Mutex<Option<ConfigEntries>>,
}

impl MockCodeHost {
    pub fn new() -> Self {
        Self {
            identity: PlatformIdentity::github(),
            login_ok: true,
            fail_on: None,
            calls: CallLog::default(),
            forked_with: Mutex::new(None),
        }
    }

    pub fn failing_on(capability: &'static str) -> Self {
        Self {
            fail_on: Some(capability),
            ..Self::new()
        }
    }

    fn record(&self, call: &'static str) -> Result<()> {
        self.calls.push(call);
        if self.fail_on == Some(call) {
            anyhow::bail!("{call} broke");
        }
        Ok(())
    }
}

impl Platform for MockCodeHost {
    fn identity(&self) -> &PlatformIdentity {
        &self.identity
    }

    async fn visit_main_page(&self) -> Result<()> {
        self.record("visit_main_page")
    }

    async fn login(&self) -> Result<bool> {
        self.record("login")?;
        Ok(self.login_ok)
    }
}

impl CodeHost for MockCodeHost {
    async fn create_oauth_app(&self, _domain: &SiteDomain) -> Result<()> {
        self.record("create_oauth_app")
    }

    async fn oauth_credentials(&self) -> Result<OAuthCredentials> {
        self.record("oauth_credentials")?;
        Ok(OAuthCredentials {
            client_id: "Iv1.client".to_string(),
            client_secret: "s3cret".to_string(),
        })
    }

    async fn fork_and_trigger(&self, _fork_url: &str, secrets: &ConfigEntries) -> Result<()> {
        self.record("fork_and_trigger")?;
        *self.forked_with.lock().expect("lock") = Some(secrets.clone());
        Ok(())
    }
}

/// Cloud host whose capabilities succeed unless named in `fail_on`.
pub struct MockCloudHost {
    pub identity: PlatformIdentity,
    pub login_ok: bool,
    pub fail_on: Option<&'static str>,
    pub calls: CallLog,
    pub pages_secrets: Mutex<Option<ConfigEntries>>,
}

impl MockCloudHost {
    pub fn new() -> Self {
        Self {
            identity: PlatformIdentity::cloudflare(),
            login_ok: true,
            fail_on: None,
            calls: CallLog::default(),
            pages_secrets: Mutex::new(None),
        }
    }

    pub fn failing_on(capability: &'static str) -> Self {
        Self {
            fail_on: Some(capability),
            ..Self::new()
        }
    }

    fn record(&self, call: &'static str) -> Result<()> {
        self.calls.push(call);
        if self.fail_on == Some(call) {
            anyhow::bail!("{call} broke");
        }
        Ok(())
    }
}

impl Platform for MockCloudHost {
    fn identity(&self) -> &PlatformIdentity {
        &self.identity
    }

    async fn visit_main_page(&self) -> Result<()> {
        self.record("visit_main_page")
    }

    async fn login(&self) -> Result<bool> {
        self.record("login")?;
        Ok(self.login_ok)
    }
}

impl CloudHost for MockCloudHost {
    async fn create_kv_namespace(&self, _name: &str) -> Result<String> {
        self.record("create_kv_namespace")?;
        Ok("kv-123".to_string())
    }

    async fn create_database(&self, _name: &str) -> Result<String> {
        self.record("create_database")?;
        Ok("db-456".to_string())
    }

    async fn create_pages_project(&self, _name: &str) -> Result<String> {
        self.record("create_pages_project")?;
        Ok("acc-789".to_string())
    }

    async fn configure_deployment_secrets(&self, secrets: &ConfigEntries) -> Result<()> {
        self.record("configure_deployment_secrets")?;
        *self.pages_secrets.lock().expect("lock") = Some(secrets.clone());
        Ok(())
    }
}

// ── Releasable ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct CountingResource {
    pub released: AtomicUsize,
    pub fail_release: bool,
}

impl CountingResource {
    pub fn releases(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl Releasable for CountingResource {
    async fn release(&self) -> Result<()> {
        self.released.fetch_add(1, Ordering::SeqCst);
        if self.fail_release {
            anyhow::bail!("browser already gone");
        }
        Ok(())
    }
}

// ── Scripted browser ─────────────────────────────────────────────────────────

/// Browser whose page is a set of visible locators.
///
/// Elements are keyed by the locator's display form. An element registered
/// with `appear_after(n)` is reported absent for its first `n` lookups.
#[derive(Default)]
pub struct ScriptedBrowser {
    visible: Mutex<HashMap<String, String>>,
    misses: Mutex<HashMap<String, usize>>,
    url: Mutex<String>,
    pub actions: std::sync::Arc<CallLog>,
}

impl ScriptedBrowser {
    /// Make element `name` of `selectors` visible with `text`.
    pub fn show(&self, selectors: &PlatformSelectors, name: &str, text: &str) {
        let key = selectors.get(name).expect("known selector").to_string();
        self.visible
            .lock()
            .expect("lock")
            .insert(key, text.to_string());
    }

    /// Make every element named in `names` visible with empty text.
    pub fn show_all(&self, selectors: &PlatformSelectors, names: &[&str]) {
        for name in names {
            self.show(selectors, name, "");
        }
    }

    pub fn hide(&self, selectors: &PlatformSelectors, name: &str) {
        let key = selectors.get(name).expect("known selector").to_string();
        self.visible.lock().expect("lock").remove(&key);
    }

    pub fn show_text(&self, text: &str) {
        self.visible
            .lock()
            .expect("lock")
            .insert(Locator::Text(text.to_string()).to_string(), String::new());
    }

    pub fn appear_after(&self, selectors: &PlatformSelectors, name: &str, misses: usize) {
        let key = selectors.get(name).expect("known selector").to_string();
        self.misses.lock().expect("lock").insert(key, misses);
    }

    pub fn set_url(&self, url: &str) {
        *self.url.lock().expect("lock") = url.to_string();
    }

    /// Element name behind an action, for readable assertions.
    pub fn name_of(selectors: &PlatformSelectors, name: &str) -> String {
        selectors.get(name).expect("known selector").to_string()
    }

    fn lookup(&self, locator: &Locator) -> Option<ScriptedElement> {
        let key = locator.to_string();
        {
            let mut misses = self.misses.lock().expect("lock");
            if let Some(left) = misses.get_mut(&key) {
                if *left > 0 {
                    *left -= 1;
                    return None;
                }
            }
        }
        self.visible
            .lock()
            .expect("lock")
            .get(&key)
            .map(|text| ScriptedElement {
                key: key.clone(),
                text: text.clone(),
                actions: std::sync::Arc::clone(&self.actions),
            })
    }
}

pub struct ScriptedElement {
    key: String,
    text: String,
    actions: std::sync::Arc<CallLog>,
}

impl PageElement for ScriptedElement {
    async fn click(&self) -> Result<()> {
        self.actions.push(format!("click {}", self.key));
        Ok(())
    }

    async fn input(&self, text: &str) -> Result<()> {
        self.actions.push(format!("input {} = {text}", self.key));
        Ok(())
    }

    async fn text(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

impl BrowserDriver for ScriptedBrowser {
    type Element = ScriptedElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.actions.push(format!("goto {url}"));
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.url.lock().expect("lock").clone())
    }

    async fn find(&self, locator: &Locator) -> Result<Option<ScriptedElement>> {
        Ok(self.lookup(locator))
    }

    async fn wait_for(
        &self,
        locator: &Locator,
        _timeout: Duration,
    ) -> Result<Option<ScriptedElement>> {
        Ok(self.lookup(locator))
    }
}
