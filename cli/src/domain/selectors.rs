//! Typed UI locators and the per-platform selector catalog.
//!
//! Selectors are configuration data: a YAML mapping of
//! `platform → logical element name → locator string`. Locator strings carry
//! a `css:`, `xpath:` or `text:` prefix.

use std::borrow::Cow;
use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::error::SelectorError;

/// How a [`Locator`] is resolved by a WebDriver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Css,
    XPath,
}

/// One element address on a page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Locator {
    Css(String),
    XPath(String),
    /// Any element whose own text contains the given string.
    Text(String),
}

impl Locator {
    /// Strategy and query string understood by a WebDriver.
    #[must_use]
    pub fn resolve(&self) -> (Strategy, Cow<'_, str>) {
        match self {
            Self::Css(q) => (Strategy::Css, Cow::Borrowed(q)),
            Self::XPath(q) => (Strategy::XPath, Cow::Borrowed(q)),
            Self::Text(t) => (
                Strategy::XPath,
                Cow::Owned(format!("//*[contains(text(), {})]", xpath_literal(t))),
            ),
        }
    }
}

/// Quote `s` as an XPath 1.0 string literal.
fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{s}'");
    }
    if !s.contains('"') {
        return format!("\"{s}\"");
    }
    let parts: Vec<String> = s.split('\'').map(|p| format!("'{p}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

impl FromStr for Locator {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, query) = s
            .split_once(':')
            .ok_or_else(|| SelectorError::UnknownKind(s.to_string()))?;
        if query.is_empty() {
            return Err(SelectorError::EmptyQuery(kind.to_string()));
        }
        let query = query.to_string();
        match kind {
            "css" => Ok(Self::Css(query)),
            "xpath" => Ok(Self::XPath(query)),
            "text" | "tx" => Ok(Self::Text(query)),
            _ => Err(SelectorError::UnknownKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for Locator {
    type Error = SelectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(q) => write!(f, "css:{q}"),
            Self::XPath(q) => write!(f, "xpath:{q}"),
            Self::Text(t) => write!(f, "text:{t}"),
        }
    }
}

// ── Catalog ──────────────────────────────────────────────────────────────────

/// All selectors, keyed by lowercase platform name.
#[derive(Debug, Clone, Default)]
pub struct SelectorCatalog(HashMap<String, HashMap<String, Locator>>);

impl SelectorCatalog {
    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a two-level mapping of
    /// locator strings.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: HashMap<String, HashMap<String, Locator>> =
            serde_yaml::from_str(yaml).context("parsing selector catalog")?;
        Ok(Self(
            raw.into_iter()
                .map(|(platform, elements)| (platform.to_lowercase(), elements))
                .collect(),
        ))
    }

    /// Replace individual selectors with those from `overrides`.
    pub fn overlay(&mut self, overrides: SelectorCatalog) {
        for (platform, elements) in overrides.0 {
            self.0.entry(platform).or_default().extend(elements);
        }
    }

    /// Selectors for one platform.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no section in the catalog.
    pub fn platform(&self, name: &str) -> Result<PlatformSelectors, SelectorError> {
        let key = name.to_lowercase();
        self.0
            .get(&key)
            .map(|elements| PlatformSelectors {
                platform: name.to_string(),
                elements: elements.clone(),
            })
            .ok_or(SelectorError::UnknownPlatform(name.to_string()))
    }
}

/// Selectors of one platform, looked up by logical element name.
#[derive(Debug, Clone)]
pub struct PlatformSelectors {
    platform: String,
    elements: HashMap<String, Locator>,
}

impl PlatformSelectors {
    #[must_use]
    pub fn new(platform: &str, elements: HashMap<String, Locator>) -> Self {
        Self {
            platform: platform.to_string(),
            elements,
        }
    }

    #[must_use]
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Look up one locator.
    ///
    /// # Errors
    ///
    /// Returns an error if `element` is not configured.
    pub fn get(&self, element: &str) -> Result<&Locator, SelectorError> {
        self.elements.get(element).ok_or_else(|| SelectorError::Missing {
            platform: self.platform.clone(),
            element: element.to_string(),
        })
    }

    /// Check that every name in `elements` is configured.
    ///
    /// # Errors
    ///
    /// Returns the first missing selector.
    pub fn require(&self, elements: &[&str]) -> Result<(), SelectorError> {
        elements.iter().try_for_each(|e| self.get(e).map(|_| ()))
    }
}
