//! Application layer: port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain`, never on `crate::infra`,
//! `crate::cli`, or `crate::output`.

pub mod ports;
pub mod services;

pub use ports::{
    BrowserDriver, CloudHost, CodeHost, ConfigStore, CookieJar, Operator, PageElement, Platform,
    ProgressReporter, Releasable, SessionStore,
};
