//! Ranked extraction strategies for engagement counts.
//!
//! The post page exposes counts in several layouts. Each layout is one
//! [`Strategy`]; [`first_count`] runs them in preference order and keeps the
//! first positive reading.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::access::ContentAccess;
use crate::error::ScraperError;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

#[async_trait]
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Read a count from the current page. `Ok(None)` means this layout
    /// was not found.
    async fn extract(&self, access: &dyn ContentAccess) -> Result<Option<u64>, ScraperError>;
}

/// Parse the first number in elements matching `pattern` whose text passes
/// `accept`.
pub struct LabeledCount {
    pub name: &'static str,
    pub pattern: &'static str,
    pub accept: fn(&str) -> bool,
}

#[async_trait]
impl Strategy for LabeledCount {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn extract(&self, access: &dyn ContentAccess) -> Result<Option<u64>, ScraperError> {
        for element in access.find_all(self.pattern).await? {
            let text = access.text(element).await?.to_lowercase();
            if !(self.accept)(&text) {
                continue;
            }
            if let Some(count) = parse_count(&text) {
                return Ok(Some(count));
            }
        }
        Ok(None)
    }
}

/// The number of elements matching `pattern`, when there are any.
pub struct ElementCount {
    pub name: &'static str,
    pub pattern: &'static str,
}

#[async_trait]
impl Strategy for ElementCount {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn extract(&self, access: &dyn ContentAccess) -> Result<Option<u64>, ScraperError> {
        let found = access.find_all(self.pattern).await?.len();
        Ok((found > 0).then(|| u64::try_from(found).unwrap_or(u64::MAX)))
    }
}

/// Strip `,` separators and parse the first run of digits.
#[must_use]
pub fn parse_count(text: &str) -> Option<u64> {
    let compact = text.replace(',', "");
    DIGIT_RUN
        .find(&compact)
        .and_then(|m| m.as_str().parse().ok())
}

fn is_like_label_or_number(text: &str) -> bool {
    text.contains("like") || is_bare_number(text)
}

fn is_bare_number(text: &str) -> bool {
    let compact = text.trim().replace(',', "");
    !compact.is_empty() && compact.chars().all(|c| c.is_ascii_digit())
}

fn has_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

fn is_like_label(text: &str) -> bool {
    text.contains("like")
}

fn is_view_all_comments(text: &str) -> bool {
    text.contains("view all") && text.contains("comment")
}

#[must_use]
pub fn like_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(LabeledCount {
            name: "section_button_label",
            pattern: "section button span",
            accept: is_like_label_or_number,
        }),
        Box::new(LabeledCount {
            name: "liked_by_link",
            pattern: "a[href*='/liked_by/']",
            accept: has_digit,
        }),
        Box::new(LabeledCount {
            name: "like_span",
            pattern: "span",
            accept: is_like_label,
        }),
    ]
}

#[must_use]
pub fn comment_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(ElementCount {
            name: "comment_list_items",
            pattern: "ul li[role='menuitem']",
        }),
        Box::new(LabeledCount {
            name: "view_all_comments",
            pattern: "span",
            accept: is_view_all_comments,
        }),
    ]
}

/// Run `strategies` in order and return the first positive count, or `0`.
///
/// A strategy that errors is logged and skipped.
pub async fn first_count(access: &dyn ContentAccess, strategies: &[Box<dyn Strategy>]) -> u64 {
    for strategy in strategies {
        match strategy.extract(access).await {
            Ok(Some(count)) if count > 0 => {
                tracing::debug!(strategy = strategy.name(), count, "count extracted");
                return count;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(strategy = strategy.name(), error = %e, "strategy failed");
            }
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeContent, FakeElement, FakePage};

    #[test]
    fn parse_count_strips_thousands_separators() {
        assert_eq!(parse_count("1,234 likes"), Some(1234));
        assert_eq!(parse_count("liked by 12,000,001 others"), Some(12_000_001));
    }

    #[test]
    fn parse_count_takes_first_digit_run() {
        assert_eq!(parse_count("view all 48 comments from 3 people"), Some(48));
    }

    #[test]
    fn parse_count_without_digits_is_none() {
        assert_eq!(parse_count("likes"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn bare_numbers_are_accepted_as_like_labels() {
        assert!(is_like_label_or_number("1,024"));
        assert!(is_like_label_or_number("87 likes"));
        assert!(!is_like_label_or_number("share"));
        assert!(!is_like_label_or_number(""));
    }

    async fn page_with(elements: Vec<(&str, &str)>) -> FakeContent {
        let mut page = FakePage::new();
        for (pattern, text) in elements {
            page = page.with(pattern, FakeElement::with_text(text));
        }
        let content = FakeContent::new().with_page("post", page);
        content.navigate("post").await.unwrap();
        content
    }

    #[tokio::test]
    async fn first_matching_like_strategy_wins() {
        let content = page_with(vec![
            ("section button span", "Share"),
            ("section button span", "2,345 likes"),
            ("span", "99 likes"),
        ])
        .await;
        assert_eq!(first_count(&content, &like_strategies()).await, 2345);
    }

    #[tokio::test]
    async fn later_strategy_used_when_earlier_finds_nothing() {
        let content = page_with(vec![("span", "Liked by 310 people")]).await;
        assert_eq!(first_count(&content, &like_strategies()).await, 310);
    }

    #[tokio::test]
    async fn zero_readings_fall_through() {
        let content = page_with(vec![
            ("section button span", "0 likes"),
            ("a[href*='/liked_by/']", "7 others"),
        ])
        .await;
        assert_eq!(first_count(&content, &like_strategies()).await, 7);
    }

    #[tokio::test]
    async fn comment_count_prefers_list_items() {
        let content = page_with(vec![
            ("ul li[role='menuitem']", "a"),
            ("ul li[role='menuitem']", "b"),
            ("span", "View all 40 comments"),
        ])
        .await;
        assert_eq!(first_count(&content, &comment_strategies()).await, 2);
    }

    #[tokio::test]
    async fn comment_count_falls_back_to_view_all_label() {
        let content = page_with(vec![("span", "View all 40 comments")]).await;
        assert_eq!(first_count(&content, &comment_strategies()).await, 40);
    }

    #[tokio::test]
    async fn nothing_found_yields_zero() {
        let content = page_with(vec![]).await;
        assert_eq!(first_count(&content, &like_strategies()).await, 0);
        assert_eq!(first_count(&content, &comment_strategies()).await, 0);
    }
}
