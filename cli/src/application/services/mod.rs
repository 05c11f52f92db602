//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::cli`,
//! or `crate::output`.

pub mod platform;
pub mod resource;
pub mod session;
pub mod setup;
pub mod ui;
pub mod workflow;
