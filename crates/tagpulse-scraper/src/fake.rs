//! In-memory [`ContentAccess`] for tests.
//!
//! Pages are keyed by location; elements are keyed by the exact pattern
//! string callers query with. Nothing is rendered and no selector is parsed.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::access::{ContentAccess, ElementRef};
use crate::error::ScraperError;
use crate::selectors;

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    text: String,
    attributes: HashMap<String, String>,
    children: Vec<(String, FakeElement)>,
}

impl FakeElement {
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn child(mut self, pattern: &str, element: FakeElement) -> Self {
        self.children.push((pattern.to_string(), element));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    elements: Vec<(String, FakeElement)>,
}

impl FakePage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, pattern: &str, element: FakeElement) -> Self {
        self.elements.push((pattern.to_string(), element));
        self
    }

    /// A page whose post links carry `(href, image alt)` pairs, the shape of
    /// both the home feed and topic pages.
    #[must_use]
    pub fn with_posts(mut self, posts: &[(&str, &str)]) -> Self {
        for (href, alt) in posts {
            let image = FakeElement::default().attr("alt", *alt);
            let link = FakeElement::default()
                .attr("href", *href)
                .child(selectors::POST_IMAGE, image);
            self = self.with(selectors::POST_LINK, link);
        }
        self
    }

    fn matching<'a>(&'a self, pattern: &'a str) -> impl Iterator<Item = &'a FakeElement> + 'a {
        self.elements
            .iter()
            .filter(move |(p, _)| p == pattern)
            .map(|(_, e)| e)
    }
}

#[derive(Debug, Default)]
struct FakeState {
    pages: HashMap<String, FakePage>,
    redirects: HashMap<String, String>,
    failing: HashSet<String>,
    submit_target: Option<String>,
    failed_lookups: u32,
    current: String,
    generation: u64,
    issued: Vec<FakeElement>,
    visits: Vec<String>,
    typed: Vec<(String, String)>,
    keys: Vec<(String, String)>,
    clicked: Vec<String>,
    scrolled: i64,
}

impl FakeState {
    fn go(&mut self, location: &str) -> Result<(), ScraperError> {
        self.visits.push(location.to_string());
        self.generation += 1;
        self.issued.clear();
        if self.failing.contains(location) {
            return Err(ScraperError::Navigation {
                location: location.to_string(),
                reason: "unreachable".to_string(),
            });
        }
        self.current = self
            .redirects
            .get(location)
            .cloned()
            .unwrap_or_else(|| location.to_string());
        Ok(())
    }

    fn page(&self) -> Option<&FakePage> {
        self.pages.get(&self.current)
    }

    fn count(&self, pattern: &str) -> usize {
        self.page().map_or(0, |p| p.matching(pattern).count())
    }

    fn issue(&mut self, found: Vec<FakeElement>) -> Vec<ElementRef> {
        let start = self.issued.len();
        self.issued.extend(found);
        (start..self.issued.len())
            .map(|i| ElementRef::new(self.generation, i))
            .collect()
    }

    fn get(&self, element: ElementRef) -> Result<&FakeElement, ScraperError> {
        if element.generation() != self.generation {
            return Err(ScraperError::StaleElement);
        }
        self.issued
            .get(element.index())
            .ok_or(ScraperError::StaleElement)
    }

    fn require(&self, pattern: &str) -> Result<(), ScraperError> {
        if self.count(pattern) == 0 {
            return Err(ScraperError::ElementNotFound {
                pattern: pattern.to_string(),
            });
        }
        Ok(())
    }
}

/// Scriptable page model implementing [`ContentAccess`].
#[derive(Debug, Default)]
pub struct FakeContent {
    state: Mutex<FakeState>,
}

impl FakeContent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page(self, location: impl Into<String>, page: FakePage) -> Self {
        self.lock().pages.insert(location.into(), page);
        self
    }

    /// Navigating to `from` lands on `to`.
    #[must_use]
    pub fn with_redirect(self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.lock().redirects.insert(from.into(), to.into());
        self
    }

    /// Navigating to `location` fails.
    #[must_use]
    pub fn with_failing(self, location: impl Into<String>) -> Self {
        self.lock().failing.insert(location.into());
        self
    }

    /// The next `count` calls to `find_all` fail.
    #[must_use]
    pub fn with_failed_lookups(self, count: u32) -> Self {
        self.lock().failed_lookups = count;
        self
    }

    /// Pressing Enter in any field navigates to `location`.
    #[must_use]
    pub fn with_submit_target(self, location: impl Into<String>) -> Self {
        self.lock().submit_target = Some(location.into());
        self
    }

    #[must_use]
    pub fn visits(&self) -> Vec<String> {
        self.lock().visits.clone()
    }

    #[must_use]
    pub fn typed(&self) -> Vec<(String, String)> {
        self.lock().typed.clone()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<(String, String)> {
        self.lock().keys.clone()
    }

    /// Text of every element clicked, in order.
    #[must_use]
    pub fn clicked(&self) -> Vec<String> {
        self.lock().clicked.clone()
    }

    #[must_use]
    pub fn scrolled(&self) -> i64 {
        self.lock().scrolled
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ContentAccess for FakeContent {
    async fn navigate(&self, location: &str) -> Result<(), ScraperError> {
        self.lock().go(location)
    }

    async fn current_location(&self) -> Result<String, ScraperError> {
        Ok(self.lock().current.clone())
    }

    async fn find_all(&self, pattern: &str) -> Result<Vec<ElementRef>, ScraperError> {
        let mut state = self.lock();
        if state.failed_lookups > 0 {
            state.failed_lookups -= 1;
            return Err(ScraperError::ElementNotFound {
                pattern: pattern.to_string(),
            });
        }
        let found: Vec<FakeElement> = state
            .page()
            .map(|p| p.matching(pattern).cloned().collect())
            .unwrap_or_default();
        Ok(state.issue(found))
    }

    async fn find_within(
        &self,
        parent: ElementRef,
        pattern: &str,
    ) -> Result<Vec<ElementRef>, ScraperError> {
        let mut state = self.lock();
        let found: Vec<FakeElement> = state
            .get(parent)?
            .children
            .iter()
            .filter(|(p, _)| p == pattern)
            .map(|(_, e)| e.clone())
            .collect();
        Ok(state.issue(found))
    }

    async fn text(&self, element: ElementRef) -> Result<String, ScraperError> {
        Ok(self.lock().get(element)?.text.clone())
    }

    async fn attribute(
        &self,
        element: ElementRef,
        name: &str,
    ) -> Result<Option<String>, ScraperError> {
        Ok(self.lock().get(element)?.attributes.get(name).cloned())
    }

    async fn wait_for(&self, pattern: &str, timeout: Duration) -> Result<(), ScraperError> {
        if self.lock().count(pattern) > 0 {
            Ok(())
        } else {
            Err(ScraperError::timeout(pattern, timeout))
        }
    }

    async fn scroll_by(&self, amount: i64) -> Result<(), ScraperError> {
        self.lock().scrolled += amount;
        Ok(())
    }

    async fn click(&self, pattern: &str) -> Result<(), ScraperError> {
        let mut state = self.lock();
        state.require(pattern)?;
        state.clicked.push(pattern.to_string());
        Ok(())
    }

    async fn click_element(&self, element: ElementRef) -> Result<(), ScraperError> {
        let mut state = self.lock();
        let text = state.get(element)?.text.clone();
        state.clicked.push(text);
        Ok(())
    }

    async fn type_text(&self, pattern: &str, text: &str) -> Result<(), ScraperError> {
        let mut state = self.lock();
        state.require(pattern)?;
        state.typed.push((pattern.to_string(), text.to_string()));
        Ok(())
    }

    async fn press_key(&self, pattern: &str, key: &str) -> Result<(), ScraperError> {
        let mut state = self.lock();
        state.require(pattern)?;
        state.keys.push((pattern.to_string(), key.to_string()));
        if key == "Enter" {
            if let Some(target) = state.submit_target.clone() {
                state.go(&target)?;
            }
        }
        Ok(())
    }
}
