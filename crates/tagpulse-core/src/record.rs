//! The persisted shape of a tag analysis.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::analysis::TagAnalysisResult;
use crate::types::{RunId, SentimentLabel};

/// Platform name stored on every record.
pub const PLATFORM: &str = "Instagram";

/// Origin that post locators are relative to.
pub const PLATFORM_BASE_URL: &str = "https://www.instagram.com";

/// Resolve a post locator against [`PLATFORM_BASE_URL`]. Absolute URLs pass
/// through unchanged.
#[must_use]
pub fn absolute_post_url(locator: &str) -> String {
    if locator.starts_with("http://") || locator.starts_with("https://") {
        locator.to_string()
    } else if locator.starts_with('/') {
        format!("{PLATFORM_BASE_URL}{locator}")
    } else {
        format!("{PLATFORM_BASE_URL}/{locator}")
    }
}

/// One row handed to a persistence gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    pub platform: String,
    /// `#`-prefixed tag.
    pub topic_tag: String,
    pub engagement_score: f64,
    pub sentiment_polarity: f64,
    pub sentiment_label: SentimentLabel,
    pub post_count: i32,
    /// The platform exposes no view counts for tag pages; always `None`.
    pub views: Option<i64>,
    /// JSON object with the aggregate statistics.
    pub metadata: Value,
    /// `true` if any sampled post used fallback engagement numbers.
    pub synthesized: bool,
    pub scraped_at: DateTime<Utc>,
    pub run_id: RunId,
}

impl AnalysisRecord {
    #[must_use]
    pub fn from_result(result: &TagAnalysisResult) -> Self {
        let top = &result.top_post;
        let metadata = json!({
            "positive_posts": result.label_counts.positive,
            "negative_posts": result.label_counts.negative,
            "neutral_posts": result.label_counts.neutral,
            "top_post_url": absolute_post_url(&top.locator),
            "top_post_engagement": top.total_engagement,
            "top_post_likes": top.likes,
            "top_post_comments": top.comments,
            "total_engagement": result.total_engagement,
            "total_likes": result.total_likes,
            "total_comments": result.total_comments,
            "avg_likes": result.avg_likes,
            "avg_comments": result.avg_comments,
            "avg_subjectivity": result.avg_subjectivity,
            "synthesized_posts": result.synthesized_posts,
        });

        Self {
            platform: PLATFORM.to_string(),
            topic_tag: format!("#{}", result.tag),
            engagement_score: result.engagement_score,
            sentiment_polarity: result.sentiment_polarity,
            sentiment_label: result.sentiment_label,
            post_count: i32::try_from(result.post_count).unwrap_or(i32::MAX),
            views: None,
            metadata,
            synthesized: result.synthesized_posts > 0,
            scraped_at: result.scraped_at,
            run_id: result.run_id,
        }
    }
}
