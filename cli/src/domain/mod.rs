//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, or `std::net`. All functions are synchronous and take
//! data in, returning data out.

pub mod config;
pub mod error;
pub mod platform;
pub mod selectors;
pub mod session;
pub mod workflow;

pub use config::{ConfigEntries, merge_entries, parse_env, render_env};
pub use error::{ConfigError, InputError, ProvisionError, SelectorError};
pub use platform::{PlatformIdentity, SiteDomain, UiTiming};
pub use selectors::{Locator, PlatformSelectors, SelectorCatalog};
pub use session::CookieRecord;
pub use workflow::{CloudResources, MenuChoice, OAuthCredentials, Workflow};
