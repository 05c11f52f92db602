//! Infrastructure implementation of the `ConfigStore` port over a `.env` file.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{validate_config_key, validate_config_value};
use crate::domain::{ConfigEntries, merge_entries, parse_env, render_env};
use crate::infra::fs::{read_optional, write_atomic};

/// File name of the store inside the base directory.
pub const ENV_FILE_NAME: &str = ".env";

/// `.env` file plus the in-memory view every `get` reads from.
///
/// Keys absent from the file fall back to the process environment, so values
/// exported by the shell are honoured without being written back.
#[derive(Debug)]
pub struct EnvFileStore {
    path: PathBuf,
    entries: Mutex<ConfigEntries>,
}

impl EnvFileStore {
    /// Load the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = load(&path)?;
        tracing::debug!(path = %path.display(), keys = entries.len(), "config loaded");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn load(path: &Path) -> Result<ConfigEntries> {
    let Some(content) = read_optional(path)? else {
        return Ok(ConfigEntries::new());
    };
    let parsed = parse_env(&content);
    for problem in &parsed.skipped {
        tracing::warn!(path = %path.display(), %problem, "ignoring .env entry");
    }
    Ok(parsed.entries)
}

impl ConfigStore for EnvFileStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .cloned()
            .or_else(|| std::env::var(key).ok())
    }

    fn merge_update(&self, updates: &ConfigEntries) -> Result<()> {
        for (key, value) in updates {
            validate_config_key(key)?;
            validate_config_value(key, value)?;
        }

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        // Re-read so edits made to the file since start-up survive.
        let on_disk = load(&self.path)?;
        let merged = merge_entries(&on_disk, updates);
        write_atomic(&self.path, &render_env(&merged))?;
        *entries = merged;

        let keys: Vec<&str> = updates.keys().map(String::as_str).collect();
        tracing::info!(path = %self.path.display(), ?keys, "config updated");
        Ok(())
    }

    fn snapshot(&self) -> ConfigEntries {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
