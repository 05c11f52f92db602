//! Selector catalog: the embedded YAML, optionally overlaid by a file on disk.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::SelectorCatalog;

const EMBEDDED_SELECTORS: &str = include_str!("../../assets/selectors.yaml");

/// Load the embedded catalog and apply `overrides` when given.
///
/// # Errors
///
/// Returns an error if the override file cannot be read or either document
/// is not a valid catalog.
pub fn load_catalog(overrides: Option<&Path>) -> Result<SelectorCatalog> {
    let mut catalog =
        SelectorCatalog::from_yaml(EMBEDDED_SELECTORS).context("embedded selector catalog")?;
    if let Some(path) = overrides {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading selector overrides {}", path.display()))?;
        let extra = SelectorCatalog::from_yaml(&content)
            .with_context(|| format!("parsing selector overrides {}", path.display()))?;
        catalog.overlay(extra);
        tracing::info!(path = %path.display(), "selector overrides applied");
    }
    Ok(catalog)
}
