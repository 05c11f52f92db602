//! Infrastructure implementation of the `SessionStore` port.
//!
//! One JSON file per platform, written with `spawn_blocking` and an atomic
//! rename so an interrupted save never leaves half a session behind.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::SessionStore;
use crate::domain::CookieRecord;
use crate::domain::platform::session_file_name;
use crate::infra::fs::{read_optional, write_atomic};

/// Cookie files kept side by side in one directory.
#[derive(Debug, Clone)]
pub struct CookieFileStore {
    dir: PathBuf,
}

impl CookieFileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, platform: &str) -> PathBuf {
        self.dir.join(session_file_name(platform))
    }

    fn load_sync(path: &std::path::Path) -> Result<Option<Vec<CookieRecord>>> {
        let Some(content) = read_optional(path)? else {
            return Ok(None);
        };
        match serde_json::from_str::<Vec<CookieRecord>>(&content) {
            Ok(cookies) => Ok(Some(cookies)),
            Err(e) => {
                // A corrupt file only costs a fresh login.
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable session file");
                Ok(None)
            }
        }
    }
}

impl SessionStore for CookieFileStore {
    async fn load(&self, platform: &str) -> Result<Option<Vec<CookieRecord>>> {
        let path = self.path_for(platform);
        tokio::task::spawn_blocking(move || Self::load_sync(&path))
            .await
            .context("session load task panicked")?
    }

    async fn save(&self, platform: &str, cookies: &[CookieRecord]) -> Result<()> {
        let path = self.path_for(platform);
        let content = serde_json::to_string_pretty(cookies).context("serializing session")?;
        tokio::task::spawn_blocking(move || write_atomic(&path, &content))
            .await
            .context("session save task panicked")?
    }
}
