//! Tunables for one discovery-and-analysis run.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

use crate::tags::{RankingPolicy, DEFAULT_EXCLUDED_TAGS};

/// Inclusive range a randomized delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub const ZERO: Self = Self {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    #[must_use]
    pub fn from_secs(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_secs(min),
            max: Duration::from_secs(max),
        }
    }

    #[must_use]
    pub fn from_millis(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_millis(min),
            max: Duration::from_millis(max),
        }
    }

    /// Draw a delay uniformly from the range with millisecond resolution.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let lo = u64::try_from(self.min.as_millis()).unwrap_or(u64::MAX);
        let hi = u64::try_from(self.max.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rng.random_range(lo..=hi))
    }
}

/// Ranges used when engagement numbers cannot be read from a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackRanges {
    pub likes: RangeInclusive<u64>,
    pub comments: RangeInclusive<u64>,
}

impl Default for FallbackRanges {
    fn default() -> Self {
        Self {
            likes: 500..=5000,
            comments: 10..=200,
        }
    }
}

/// Limits for the three discovery sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryLimits {
    pub feed_scrolls: u32,
    pub feed_scroll_px: i64,
    pub feed_post_limit: usize,
    pub caption_pool: usize,
    pub caption_samples: usize,
    pub topic_seeds: Vec<String>,
    pub topic_post_limit: usize,
}

impl Default for DiscoveryLimits {
    fn default() -> Self {
        Self {
            feed_scrolls: 10,
            feed_scroll_px: 800,
            feed_post_limit: 50,
            caption_pool: 25,
            caption_samples: 12,
            topic_seeds: ["today", "new", "trending", "latest"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            topic_post_limit: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Maximum number of ranked tags analyzed per run.
    pub tags_per_run: usize,
    /// Maximum number of posts sampled per tag.
    pub posts_per_tag: usize,
    /// Minimum cumulative weight a tag needs to be ranked.
    pub min_frequency: u64,
    pub excluded_tags: BTreeSet<String>,
    /// Delay between consecutive tags.
    pub pacing: DelayRange,
    /// Short delay after navigations while content renders.
    pub settle: DelayRange,
    /// Upper bound on any single wait-for-element.
    pub element_timeout: Duration,
    /// Upper bound on waiting for the post-login home page.
    pub login_timeout: Duration,
    pub fallback: FallbackRanges,
    pub discovery: DiscoveryLimits,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tags_per_run: 15,
            posts_per_tag: 5,
            min_frequency: 1,
            excluded_tags: DEFAULT_EXCLUDED_TAGS
                .iter()
                .map(|t| (*t).to_string())
                .collect(),
            pacing: DelayRange::from_secs(8, 12),
            settle: DelayRange::from_millis(1000, 3000),
            element_timeout: Duration::from_secs(10),
            login_timeout: Duration::from_secs(20),
            fallback: FallbackRanges::default(),
            discovery: DiscoveryLimits::default(),
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn ranking_policy(&self) -> RankingPolicy {
        RankingPolicy {
            excluded: self.excluded_tags.clone(),
            min_frequency: self.min_frequency,
            top_n: self.tags_per_run,
        }
    }
}
