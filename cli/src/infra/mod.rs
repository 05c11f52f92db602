//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: the `.env` and session
//! files, the WebDriver browser, the console prompts, and settings.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::cli` or `crate::output` are forbidden.

pub mod env_store;
pub mod fs;
pub mod operator;
pub mod selectors;
pub mod session_store;
pub mod settings;
pub mod webdriver;
