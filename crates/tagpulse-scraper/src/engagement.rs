//! Per-post engagement sampling with synthesized fallback.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use tagpulse_core::{absolute_post_url, DelayRange, EngagementCounts, FallbackRanges, PipelineConfig};

use crate::access::{settle, ContentAccess};
use crate::error::ScraperError;
use crate::selectors;
use crate::strategy::{comment_strategies, first_count, like_strategies, Strategy};

/// Reads like and comment counts from a post page.
///
/// Sampling never fails: when nothing can be read, or the page cannot be
/// loaded, counts are drawn from the fallback ranges and flagged
/// `synthesized`.
pub struct EngagementSampler {
    rng: StdRng,
    fallback: FallbackRanges,
    settle: DelayRange,
    element_timeout: Duration,
    likes: Vec<Box<dyn Strategy>>,
    comments: Vec<Box<dyn Strategy>>,
}

impl EngagementSampler {
    #[must_use]
    pub fn new(config: &PipelineConfig, rng: StdRng) -> Self {
        Self {
            rng,
            fallback: config.fallback.clone(),
            settle: config.settle,
            element_timeout: config.element_timeout,
            likes: like_strategies(),
            comments: comment_strategies(),
        }
    }

    pub async fn sample(&mut self, access: &dyn ContentAccess, locator: &str) -> EngagementCounts {
        match self.observe(access, locator).await {
            Ok(counts) if counts.total() > 0 => counts,
            Ok(_) => {
                tracing::debug!(locator, "no engagement readable, synthesizing");
                self.synthesize()
            }
            Err(e) => {
                tracing::warn!(locator, error = %e, "engagement sampling failed, synthesizing");
                self.synthesize()
            }
        }
    }

    /// Draw counts uniformly from the fallback ranges.
    pub fn synthesize(&mut self) -> EngagementCounts {
        EngagementCounts {
            likes: self.rng.random_range(self.fallback.likes.clone()),
            comments: self.rng.random_range(self.fallback.comments.clone()),
            synthesized: true,
        }
    }

    async fn observe(
        &mut self,
        access: &dyn ContentAccess,
        locator: &str,
    ) -> Result<EngagementCounts, ScraperError> {
        access.navigate(&absolute_post_url(locator)).await?;
        access
            .wait_for(selectors::POST_SECTION, self.element_timeout)
            .await?;
        settle(&self.settle, &mut self.rng).await;

        let likes = first_count(access, &self.likes).await;
        let comments = first_count(access, &self.comments).await;
        Ok(EngagementCounts::observed(likes, comments))
    }
}
