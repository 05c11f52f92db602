//! Selector-driven UI actions shared by the platform adapters.
//!
//! Every lookup is bounded: a required element that does not appear within
//! [`UiTiming::element_timeout`] fails with [`ProvisionError::ElementNotFound`].

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{BrowserDriver, PageElement};
use crate::domain::{Locator, PlatformSelectors, ProvisionError, UiTiming};

/// A browser tab seen through one platform's selectors.
pub struct Ui<'a, B> {
    browser: &'a B,
    selectors: &'a PlatformSelectors,
    timing: UiTiming,
}

impl<'a, B: BrowserDriver> Ui<'a, B> {
    #[must_use]
    pub fn new(browser: &'a B, selectors: &'a PlatformSelectors, timing: UiTiming) -> Self {
        Self {
            browser,
            selectors,
            timing,
        }
    }

    #[must_use]
    pub fn timing(&self) -> &UiTiming {
        &self.timing
    }

    pub async fn navigate(&self, url: &str) -> Result<()> {
        tracing::debug!(platform = self.selectors.platform(), url, "navigate");
        self.browser
            .navigate(url)
            .await
            .with_context(|| format!("opening {url}"))
    }

    pub async fn current_url(&self) -> Result<String> {
        self.browser.current_url().await
    }

    /// Wait for a required element.
    pub async fn element(&self, name: &str) -> Result<B::Element> {
        let locator = self.selectors.get(name)?;
        self.require(locator, name, self.timing.element_timeout).await
    }

    /// Wait for a required element addressed directly by locator.
    pub async fn require(
        &self,
        locator: &Locator,
        label: &str,
        timeout: Duration,
    ) -> Result<B::Element> {
        match self.browser.wait_for(locator, timeout).await? {
            Some(el) => Ok(el),
            None => {
                tracing::warn!(
                    platform = self.selectors.platform(),
                    element = label,
                    %locator,
                    "element did not appear"
                );
                Err(ProvisionError::ElementNotFound {
                    platform: self.selectors.platform().to_string(),
                    element: label.to_string(),
                    timeout_secs: timeout.as_secs(),
                }
                .into())
            }
        }
    }

    /// Look for an optional element within the probe timeout.
    pub async fn probe(&self, name: &str) -> Result<Option<B::Element>> {
        self.probe_within(name, self.timing.probe_timeout).await
    }

    pub async fn probe_within(&self, name: &str, timeout: Duration) -> Result<Option<B::Element>> {
        let locator = self.selectors.get(name)?;
        self.browser.wait_for(locator, timeout).await
    }

    pub async fn click(&self, name: &str) -> Result<()> {
        self.element(name)
            .await?
            .click()
            .await
            .with_context(|| format!("clicking {name}"))
    }

    pub async fn fill(&self, name: &str, text: &str) -> Result<()> {
        self.element(name)
            .await?
            .input(text)
            .await
            .with_context(|| format!("filling {name}"))
    }

    /// Read the trimmed text of a required element; empty text is a failure.
    pub async fn read(&self, name: &str) -> Result<String> {
        let el = self.element(name).await?;
        non_empty(self.selectors.platform(), name, &el).await
    }

    /// Wait for an element containing `text`.
    pub async fn expect_text(&self, text: &str) -> Result<()> {
        let locator = Locator::Text(text.to_string());
        self.require(&locator, text, self.timing.element_timeout)
            .await
            .map(|_| ())
    }

    /// Give the page time to finish a transition.
    pub async fn settle(&self) {
        tokio::time::sleep(self.timing.settle_delay).await;
    }
}

/// Trimmed element text, failing when it is empty.
pub async fn non_empty(platform: &str, name: &str, el: &impl PageElement) -> Result<String> {
    let text = el
        .text()
        .await
        .with_context(|| format!("reading {name}"))?
        .trim()
        .to_string();
    if text.is_empty() {
        return Err(ProvisionError::EmptyValue {
            platform: platform.to_string(),
            element: name.to_string(),
        }
        .into());
    }
    Ok(text)
}
