//! Page-automation capability used by discovery, login and sampling.
//!
//! [`ContentAccess`] is the seam between the pipeline and a live browser:
//! [`crate::BrowserSession`] drives Chromium over CDP, while tests use an
//! in-memory page model.

use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use tagpulse_core::DelayRange;

use crate::error::ScraperError;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Handle to an element found on the current page.
///
/// Handles carry the navigation generation they were issued in; using one
/// after the next `navigate` yields [`ScraperError::StaleElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    generation: u64,
    index: usize,
}

impl ElementRef {
    #[must_use]
    pub fn new(generation: u64, index: usize) -> Self {
        Self { generation, index }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

#[async_trait]
pub trait ContentAccess: Send + Sync {
    /// Load `location` and invalidate every previously issued [`ElementRef`].
    async fn navigate(&self, location: &str) -> Result<(), ScraperError>;

    async fn current_location(&self) -> Result<String, ScraperError>;

    /// All elements matching `pattern`, in document order. Empty when none match.
    async fn find_all(&self, pattern: &str) -> Result<Vec<ElementRef>, ScraperError>;

    async fn find_within(
        &self,
        parent: ElementRef,
        pattern: &str,
    ) -> Result<Vec<ElementRef>, ScraperError>;

    /// Rendered text of the element; empty when it has none.
    async fn text(&self, element: ElementRef) -> Result<String, ScraperError>;

    async fn attribute(
        &self,
        element: ElementRef,
        name: &str,
    ) -> Result<Option<String>, ScraperError>;

    /// Block until `pattern` matches at least one element, or fail with
    /// [`ScraperError::Timeout`].
    async fn wait_for(&self, pattern: &str, timeout: Duration) -> Result<(), ScraperError>;

    /// Scroll the viewport vertically by `amount` pixels.
    async fn scroll_by(&self, amount: i64) -> Result<(), ScraperError>;

    async fn click(&self, pattern: &str) -> Result<(), ScraperError>;

    async fn click_element(&self, element: ElementRef) -> Result<(), ScraperError>;

    async fn type_text(&self, pattern: &str, text: &str) -> Result<(), ScraperError>;

    async fn press_key(&self, pattern: &str, key: &str) -> Result<(), ScraperError>;
}

/// Wait until any of `patterns` matches. Returns the pattern that matched.
///
/// # Errors
///
/// Returns [`ScraperError::Timeout`] if none match before `timeout`. Failed
/// lookups count as not yet present.
pub async fn wait_for_any<'a>(
    access: &dyn ContentAccess,
    patterns: &[&'a str],
    timeout: Duration,
) -> Result<&'a str, ScraperError> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        for &pattern in patterns {
            match access.find_all(pattern).await {
                Ok(found) if !found.is_empty() => return Ok(pattern),
                Ok(_) => {}
                Err(e) => tracing::debug!(pattern, error = %e, "lookup failed while waiting"),
            }
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(ScraperError::timeout(&patterns.join(" | "), timeout));
        }
        tokio::time::sleep(POLL_INTERVAL.min(timeout)).await;
    }
}

/// Try `patterns` in order, waiting up to `timeout` for each. Returns the
/// first that appears.
pub(crate) async fn first_present<'a>(
    access: &dyn ContentAccess,
    patterns: &[&'a str],
    timeout: Duration,
) -> Option<&'a str> {
    for &pattern in patterns {
        match access.wait_for(pattern, timeout).await {
            Ok(()) => return Some(pattern),
            Err(e) => tracing::debug!(pattern, error = %e, "pattern not present"),
        }
    }
    None
}

/// Sleep for a random duration drawn from `range`.
pub async fn settle(range: &DelayRange, rng: &mut StdRng) {
    let delay = range.sample(rng);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
