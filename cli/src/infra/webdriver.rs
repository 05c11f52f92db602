//! Browser driver over W3C WebDriver (`fantoccini`).
//!
//! Implements `BrowserDriver`, `CookieJar` and `Releasable` against one
//! session opened on a running WebDriver server.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use fantoccini::cookies::Cookie;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder};

use crate::application::ports::{BrowserDriver, CookieJar, PageElement, Releasable};
use crate::domain::selectors::Strategy;
use crate::domain::{CookieRecord, Locator};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// One WebDriver session, closed at most once.
pub struct WebDriverBrowser {
    client: Client,
    released: AtomicBool,
}

impl WebDriverBrowser {
    /// Open a new browser session on the WebDriver server at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or refuses the session.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = ClientBuilder::native()
            .connect(url)
            .await
            .with_context(|| {
                format!("cannot open a browser session on {url}. Is a WebDriver server running?")
            })?;
        tracing::info!(webdriver = url, "browser session opened");
        Ok(Self {
            client,
            released: AtomicBool::new(false),
        })
    }
}

fn wd_locator(strategy: Strategy, query: &str) -> fantoccini::Locator<'_> {
    match strategy {
        Strategy::Css => fantoccini::Locator::Css(query),
        Strategy::XPath => fantoccini::Locator::XPath(query),
    }
}

/// An element handle of the live page.
pub struct WebDriverElement(Element);

impl PageElement for WebDriverElement {
    async fn click(&self) -> Result<()> {
        self.0.click().await.context("click")
    }

    async fn input(&self, text: &str) -> Result<()> {
        self.0.clear().await.context("clear")?;
        self.0.send_keys(text).await.context("send keys")
    }

    async fn text(&self) -> Result<String> {
        self.0.text().await.context("read text")
    }
}

impl BrowserDriver for WebDriverBrowser {
    type Element = WebDriverElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.client.goto(url).await.context("navigate")
    }

    async fn current_url(&self) -> Result<String> {
        let url = self.client.current_url().await.context("current url")?;
        Ok(url.to_string())
    }

    async fn find(&self, locator: &Locator) -> Result<Option<WebDriverElement>> {
        let (strategy, query) = locator.resolve();
        let found = self.client.find(wd_locator(strategy, &query)).await;
        match found {
            Ok(el) => Ok(Some(WebDriverElement(el))),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(e) => Err(e).with_context(|| format!("finding {locator}")),
        }
    }

    async fn wait_for(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Option<WebDriverElement>> {
        let (strategy, query) = locator.resolve();
        let found = self
            .client
            .wait()
            .at_most(timeout)
            .every(POLL_INTERVAL)
            .for_element(wd_locator(strategy, &query))
            .await;
        match found {
            Ok(el) => Ok(Some(WebDriverElement(el))),
            Err(CmdError::WaitTimeout) => Ok(None),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(e) => Err(e).with_context(|| format!("waiting for {locator}")),
        }
    }
}

impl CookieJar for WebDriverBrowser {
    async fn cookies(&self) -> Result<Vec<CookieRecord>> {
        let cookies = self.client.get_all_cookies().await.context("reading cookies")?;
        Ok(cookies
            .iter()
            .map(|c| CookieRecord {
                name: c.name().to_string(),
                value: c.value().to_string(),
                domain: c.domain().map(str::to_string),
                path: c.path().map(str::to_string),
                secure: c.secure(),
                http_only: c.http_only(),
            })
            .collect())
    }

    async fn restore(&self, origin: &str, cookies: &[CookieRecord]) -> Result<()> {
        // Cookies can only be set for the document's own site.
        self.client
            .goto(origin)
            .await
            .with_context(|| format!("opening {origin}"))?;
        let mut rejected = 0usize;
        for record in cookies {
            let mut cookie = Cookie::new(record.name.clone(), record.value.clone());
            if let Some(domain) = &record.domain {
                cookie.set_domain(domain.clone());
            }
            if let Some(path) = &record.path {
                cookie.set_path(path.clone());
            }
            cookie.set_secure(record.secure);
            cookie.set_http_only(record.http_only);
            if let Err(e) = self.client.add_cookie(cookie).await {
                tracing::debug!(cookie = %record.name, error = %e, "cookie rejected");
                rejected += 1;
            }
        }
        if rejected > 0 {
            tracing::warn!(
                origin,
                rejected,
                total = cookies.len(),
                "some cookies were not restored"
            );
        }
        Ok(())
    }
}

impl Releasable for WebDriverBrowser {
    async fn release(&self) -> Result<()> {
        if self.released.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.client
            .clone()
            .close()
            .await
            .context("closing browser session")?;
        tracing::info!("browser session closed");
        Ok(())
    }
}
