//! Runtime settings loaded from `MOEMAIL_*` environment variables via `envy`.
//!
//! Each field maps to `MOEMAIL_<FIELD>`:
//!   - `MOEMAIL_WEBDRIVER_URL`         (default `http://localhost:9515`)
//!   - `MOEMAIL_ELEMENT_TIMEOUT_SECS`  (default `6`)
//!   - `MOEMAIL_PROBE_TIMEOUT_SECS`    (default `3`)
//!   - `MOEMAIL_SETTLE_DELAY_MS`       (default `2000`)
//!   - `MOEMAIL_SELECTORS`             (optional, selector YAML overrides)
//!   - `MOEMAIL_PROJECT_NAME`          (default `moemail`)
//!   - `MOEMAIL_FORK_URL`              (default upstream fork page)
//!   - `MOEMAIL_HOME`                  (optional, default the executable's directory)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::UiTiming;

pub const ENV_PREFIX: &str = "MOEMAIL_";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// WebDriver server the browser session is opened on.
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_element_timeout_secs")]
    pub element_timeout_secs: u64,

    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Selector YAML layered over the embedded catalog.
    pub selectors: Option<PathBuf>,

    /// Name of the KV namespace, D1 database and Pages project.
    #[serde(default = "default_project_name")]
    pub project_name: String,

    #[serde(default = "default_fork_url")]
    pub fork_url: String,

    /// Directory holding `.env` and the session files.
    pub home: Option<PathBuf>,
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_element_timeout_secs() -> u64 {
    6
}

fn default_probe_timeout_secs() -> u64 {
    3
}

fn default_settle_delay_ms() -> u64 {
    2000
}

fn default_project_name() -> String {
    "moemail".to_string()
}

fn default_fork_url() -> String {
    "https://github.com/beilunyang/moemail/fork".to_string()
}

impl Settings {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a `MOEMAIL_*` variable has the wrong type.
    pub fn from_env() -> Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_env()
            .context("invalid MOEMAIL_* environment variable")
    }

    /// Load from explicit `(name, value)` pairs, names including the prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if a value has the wrong type.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter(pairs)
            .context("invalid MOEMAIL_* setting")
    }

    #[must_use]
    pub fn timing(&self) -> UiTiming {
        UiTiming {
            element_timeout: Duration::from_secs(self.element_timeout_secs),
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            ..UiTiming::default()
        }
    }

    /// Directory for `.env` and session files.
    ///
    /// # Errors
    ///
    /// Returns an error if `MOEMAIL_HOME` is unset and the executable's
    /// location cannot be determined.
    pub fn base_dir(&self) -> Result<PathBuf> {
        if let Some(home) = &self.home {
            return Ok(home.clone());
        }
        let exe = std::env::current_exe().context("cannot determine executable path")?;
        exe.parent()
            .map(std::path::Path::to_path_buf)
            .ok_or_else(|| anyhow::anyhow!("executable {} has no parent directory", exe.display()))
    }
}
