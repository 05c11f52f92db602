//! Domain types and pure functions for the `.env` configuration store.
//!
//! No filesystem access. Unescaped `$VAR` references in a hand-edited file
//! are expanded by `dotenvy` from the process environment.

use std::sync::LazyLock;

use anyhow::Result;
use indexmap::IndexMap;
use rand::Rng;
use rand::distributions::Alphanumeric;
use regex::Regex;

use crate::domain::error::ConfigError;

/// Ordered key → value mapping. File order is preserved; new keys append.
pub type ConfigEntries = IndexMap<String, String>;

// ── Well-known keys ──────────────────────────────────────────────────────────

pub const MOE_MAIL_DOMAIN: &str = "MOE_MAIL_DOMAIN";
pub const AUTH_GITHUB_ID: &str = "AUTH_GITHUB_ID";
pub const AUTH_GITHUB_SECRET: &str = "AUTH_GITHUB_SECRET";
pub const AUTH_SECRET: &str = "AUTH_SECRET";
pub const KV_NAMESPACE_ID: &str = "KV_NAMESPACE_ID";
pub const DATABASE_ID: &str = "DATABASE_ID";
pub const DATABASE_NAME: &str = "DATABASE_NAME";
pub const CLOUDFLARE_ACCOUNT_ID: &str = "CLOUDFLARE_ACCOUNT_ID";
pub const CLOUDFLARE_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";

/// Secrets configured on the Pages project, in submission order.
pub const PAGES_SECRET_KEYS: &[&str] = &[AUTH_GITHUB_ID, AUTH_GITHUB_SECRET, AUTH_SECRET];

/// Secrets configured on the forked repository, in submission order.
pub const REPOSITORY_SECRET_KEYS: &[&str] = &[
    CLOUDFLARE_ACCOUNT_ID,
    CLOUDFLARE_API_TOKEN,
    DATABASE_NAME,
    DATABASE_ID,
    KV_NAMESPACE_ID,
];

/// Every key the tool reads or writes, in the order shown to the operator.
pub const TRACKED_KEYS: &[&str] = &[
    MOE_MAIL_DOMAIN,
    AUTH_GITHUB_ID,
    AUTH_GITHUB_SECRET,
    AUTH_SECRET,
    KV_NAMESPACE_ID,
    DATABASE_ID,
    DATABASE_NAME,
    CLOUDFLARE_ACCOUNT_ID,
    CLOUDFLARE_API_TOKEN,
];

/// Length of a freshly generated `AUTH_SECRET`.
pub const SHARED_SECRET_LEN: usize = 32;

pub static CONFIG_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex")
});

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key.
///
/// # Errors
///
/// Returns an error if the key is not a valid identifier.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !CONFIG_KEY_RE.is_match(key) {
        return Err(ConfigError::InvalidKey(key.to_string()).into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value would break the line-oriented file format.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
        }
        .into());
    }
    Ok(())
}

// ── File format ──────────────────────────────────────────────────────────────

/// Result of parsing a `.env` document.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedEnv {
    pub entries: ConfigEntries,
    /// One description per entry that was dropped. Never includes values.
    pub skipped: Vec<String>,
}

/// Parse a `.env` document with `dotenvy`.
///
/// Comments, blank lines, `export ` prefixes, quoting and escapes follow
/// dotenv rules. Keys outside [`CONFIG_KEY_RE`] and unparsable lines are
/// reported in [`ParsedEnv::skipped`]. A repeated key keeps its first
/// position and its last value.
#[must_use]
pub fn parse_env(content: &str) -> ParsedEnv {
    let mut parsed = ParsedEnv::default();
    for item in dotenvy::from_read_iter(content.as_bytes()) {
        match item {
            Ok((key, value)) if CONFIG_KEY_RE.is_match(&key) => {
                parsed.entries.insert(key, value);
            }
            Ok((key, _)) => parsed.skipped.push(format!("unsupported key '{key}'")),
            Err(dotenvy::Error::LineParse(_, column)) => parsed
                .skipped
                .push(format!("unparsable entry (column {column})")),
            Err(e) => {
                parsed.skipped.push(e.to_string());
                break;
            }
        }
    }
    parsed
}

/// Render entries as `KEY="VALUE"` lines that [`parse_env`] reads back
/// unchanged. Comments are not re-emitted.
#[must_use]
pub fn render_env(entries: &ConfigEntries) -> String {
    entries
        .iter()
        .map(|(key, value)| format!("{key}=\"{}\"\n", escape_value(value)))
        .collect()
}

/// Escape the characters that are special inside a double-quoted value.
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Overlay `updates` on `base`: new keys are appended, existing keys overwritten.
#[must_use]
pub fn merge_entries(base: &ConfigEntries, updates: &ConfigEntries) -> ConfigEntries {
    let mut merged = base.clone();
    for (key, value) in updates {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Generate a random alphanumeric shared secret.
#[must_use]
pub fn generate_shared_secret(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
