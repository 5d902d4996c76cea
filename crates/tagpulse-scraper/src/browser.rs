//! Chromium-backed [`ContentAccess`] over the DevTools protocol.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tagpulse_core::AppConfig;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::access::{ContentAccess, ElementRef};
use crate::error::ScraperError;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub user_agent: String,
}

impl LaunchOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            headless: config.headless,
            window_width: config.window_width,
            window_height: config.window_height,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Elements found since the last navigation.
#[derive(Default)]
struct Arena {
    generation: u64,
    elements: Vec<Element>,
}

impl Arena {
    fn issue(&mut self, found: Vec<Element>) -> Vec<ElementRef> {
        let start = self.elements.len();
        self.elements.extend(found);
        (start..self.elements.len())
            .map(|i| ElementRef::new(self.generation, i))
            .collect()
    }

    fn get(&self, element: ElementRef) -> Result<&Element, ScraperError> {
        if element.generation() != self.generation {
            return Err(ScraperError::StaleElement);
        }
        self.elements
            .get(element.index())
            .ok_or(ScraperError::StaleElement)
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.elements.clear();
    }
}

/// One browser process with a single tab, used for the whole run.
pub struct BrowserSession {
    browser: Mutex<Browser>,
    page: Page,
    arena: Mutex<Arena>,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch Chromium and open a blank tab.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::BrowserConfig`] if the launch options are
    /// rejected, or [`ScraperError::Browser`] if Chromium cannot be started.
    pub async fn launch(options: &LaunchOptions) -> Result<Self, ScraperError> {
        let mut builder = BrowserConfig::builder()
            .window_size(options.window_width, options.window_height)
            .arg(format!("--user-agent={}", options.user_agent))
            .arg("--lang=en-US");
        if !options.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(ScraperError::BrowserConfig)?;

        let (browser, mut handler) = Browser::launch(config).await?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "CDP handler error");
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        tracing::info!(
            headless = options.headless,
            width = options.window_width,
            height = options.window_height,
            "browser session started"
        );

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            arena: Mutex::new(Arena::default()),
            handler,
        })
    }

    /// Close the browser and stop the CDP handler task.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Browser`] if the close command fails.
    pub async fn close(self) -> Result<(), ScraperError> {
        let mut browser = self.browser.into_inner();
        browser.close().await?;
        if let Err(e) = browser.wait().await {
            tracing::warn!(error = %e, "browser process did not exit cleanly");
        }
        self.handler.abort();
        tracing::info!("browser session closed");
        Ok(())
    }

    async fn first_match(&self, pattern: &str) -> Result<Element, ScraperError> {
        self.page
            .find_elements(pattern)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ScraperError::ElementNotFound {
                pattern: pattern.to_string(),
            })
    }
}

#[async_trait]
impl ContentAccess for BrowserSession {
    async fn navigate(&self, location: &str) -> Result<(), ScraperError> {
        let mut arena = self.arena.lock().await;
        arena.reset();
        self.page
            .goto(location)
            .await
            .map_err(|e| ScraperError::Navigation {
                location: location.to_string(),
                reason: e.to_string(),
            })?;
        tracing::debug!(location, "navigated");
        Ok(())
    }

    async fn current_location(&self) -> Result<String, ScraperError> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn find_all(&self, pattern: &str) -> Result<Vec<ElementRef>, ScraperError> {
        let found = self.page.find_elements(pattern).await?;
        Ok(self.arena.lock().await.issue(found))
    }

    async fn find_within(
        &self,
        parent: ElementRef,
        pattern: &str,
    ) -> Result<Vec<ElementRef>, ScraperError> {
        let mut arena = self.arena.lock().await;
        let found = arena.get(parent)?.find_elements(pattern).await?;
        Ok(arena.issue(found))
    }

    async fn text(&self, element: ElementRef) -> Result<String, ScraperError> {
        let arena = self.arena.lock().await;
        let text = arena.get(element)?.inner_text().await?;
        Ok(text.unwrap_or_default())
    }

    async fn attribute(
        &self,
        element: ElementRef,
        name: &str,
    ) -> Result<Option<String>, ScraperError> {
        let arena = self.arena.lock().await;
        Ok(arena.get(element)?.attribute(name).await?)
    }

    async fn wait_for(&self, pattern: &str, timeout: Duration) -> Result<(), ScraperError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match self.page.find_elements(pattern).await {
                Ok(found) if !found.is_empty() => return Ok(()),
                Ok(_) => {}
                Err(e) => tracing::debug!(pattern, error = %e, "lookup failed while waiting"),
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ScraperError::timeout(pattern, timeout));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn scroll_by(&self, amount: i64) -> Result<(), ScraperError> {
        let script = format!("window.scrollBy(0, {amount})");
        self.page.evaluate(script.as_str()).await?;
        Ok(())
    }

    async fn click(&self, pattern: &str) -> Result<(), ScraperError> {
        self.first_match(pattern).await?.click().await?;
        Ok(())
    }

    async fn click_element(&self, element: ElementRef) -> Result<(), ScraperError> {
        let arena = self.arena.lock().await;
        arena.get(element)?.click().await?;
        Ok(())
    }

    async fn type_text(&self, pattern: &str, text: &str) -> Result<(), ScraperError> {
        let element = self.first_match(pattern).await?;
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    async fn press_key(&self, pattern: &str, key: &str) -> Result<(), ScraperError> {
        self.first_match(pattern).await?.press_key(key).await?;
        Ok(())
    }
}

