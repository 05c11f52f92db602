//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator.

use thiserror::Error;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Failures raised while driving a platform or a workflow step.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("{platform} login was not confirmed. Finish logging in within the browser and retry.")]
    AuthenticationFailed { platform: String },

    #[error("{platform}: element '{element}' did not appear within {timeout_secs}s")]
    ElementNotFound {
        platform: String,
        element: String,
        timeout_secs: u64,
    },

    #[error("{platform}: element '{element}' was found but empty")]
    EmptyValue { platform: String, element: String },

    #[error("Missing configuration: {}. Run the step that produces it or add it to .env.", keys.join(", "))]
    MissingConfig { keys: Vec<String> },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration key '{0}': must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidKey(String),

    #[error("Invalid value for {key}: values cannot contain line breaks")]
    InvalidValue { key: String },
}

// ── Selector errors ───────────────────────────────────────────────────────────

/// Errors in the selector catalog.
#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("Unknown locator '{0}': expected a css:, xpath: or text: prefix")]
    UnknownKind(String),

    #[error("Empty locator after '{0}' prefix")]
    EmptyQuery(String),

    #[error("No selectors configured for platform '{0}'")]
    UnknownPlatform(String),

    #[error("Selector '{element}' is not configured for {platform}")]
    Missing { platform: String, element: String },
}

// ── Operator input errors ─────────────────────────────────────────────────────

/// Malformed operator input. Recovered locally by re-prompting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter a number between 0 and 4")]
    InvalidChoice,

    #[error("The domain cannot be empty")]
    EmptyDomain,

    #[error("Invalid domain '{0}': expected a URL such as https://example.com")]
    InvalidDomain(String),
}
