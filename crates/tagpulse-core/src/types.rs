use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Polarity strictly above this value labels a post or tag positive.
const POSITIVE_THRESHOLD: f64 = 0.1;
/// Polarity strictly below this value labels a post or tag negative.
const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Process-scoped token grouping every record persisted by one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Output of a sentiment scorer for one piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    /// Signed polarity in `[-1.0, 1.0]`.
    pub polarity: f64,
    /// Unsigned subjectivity in `[0.0, 1.0]`.
    pub subjectivity: f64,
}

impl SentimentScore {
    pub const NEUTRAL: Self = Self {
        polarity: 0.0,
        subjectivity: 0.0,
    };

    /// Build a score, clamping both components into their valid ranges.
    /// Non-finite inputs collapse to `0.0`.
    #[must_use]
    pub fn new(polarity: f64, subjectivity: f64) -> Self {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            polarity: finite(polarity).clamp(-1.0, 1.0),
            subjectivity: finite(subjectivity).clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Label a polarity value. Both comparisons are strict, so exactly `0.1`
    /// and exactly `-0.05` are neutral.
    #[must_use]
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > POSITIVE_THRESHOLD {
            Self::Positive
        } else if polarity < NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Like/comment counts for one post.
///
/// `synthesized` is `true` when the counts were drawn from the fallback
/// ranges instead of read from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementCounts {
    pub likes: u64,
    pub comments: u64,
    pub synthesized: bool,
}

impl EngagementCounts {
    #[must_use]
    pub fn observed(likes: u64, comments: u64) -> Self {
        Self {
            likes,
            comments,
            synthesized: false,
        }
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.likes.saturating_add(self.comments)
    }
}

/// One sampled post, owned by the tag analysis that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PostSample {
    /// Platform-relative post path, e.g. `/p/Cabc123/`.
    pub locator: String,
    pub likes: u64,
    pub comments: u64,
    pub total_engagement: u64,
    pub sentiment_polarity: f64,
    pub sentiment_subjectivity: f64,
    pub synthesized: bool,
}

impl PostSample {
    #[must_use]
    pub fn new(
        locator: impl Into<String>,
        engagement: EngagementCounts,
        sentiment: SentimentScore,
    ) -> Self {
        Self {
            locator: locator.into(),
            likes: engagement.likes,
            comments: engagement.comments,
            total_engagement: engagement.total(),
            sentiment_polarity: sentiment.polarity,
            sentiment_subjectivity: sentiment.subjectivity,
            synthesized: engagement.synthesized,
        }
    }

    #[must_use]
    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::from_polarity(self.sentiment_polarity)
    }
}
