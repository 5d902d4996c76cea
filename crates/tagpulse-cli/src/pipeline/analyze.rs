use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use tagpulse_core::{summarize_samples, DelayRange, PipelineConfig, PostSample, RunId, TagAnalysisResult};
use tagpulse_scraper::{read_post_refs, selectors, settle, ContentAccess, EngagementSampler};
use tagpulse_sentiment::SentimentOracle;

use super::AnalysisError;

/// Samples up to `posts_per_tag` posts from a tag's topic page and
/// summarizes them.
pub(crate) struct TagAnalyzer<'a> {
    access: &'a dyn ContentAccess,
    oracle: &'a dyn SentimentOracle,
    sampler: EngagementSampler,
    posts_per_tag: usize,
    settle: DelayRange,
    element_timeout: Duration,
    rng: StdRng,
}

impl<'a> TagAnalyzer<'a> {
    pub(crate) fn new(
        access: &'a dyn ContentAccess,
        oracle: &'a dyn SentimentOracle,
        config: &PipelineConfig,
        sampler: EngagementSampler,
        rng: StdRng,
    ) -> Self {
        Self {
            access,
            oracle,
            sampler,
            posts_per_tag: config.posts_per_tag,
            settle: config.settle,
            element_timeout: config.element_timeout,
            rng,
        }
    }

    /// Analyze one tag.
    ///
    /// Post references are read before any post is visited, since visiting a
    /// post invalidates the topic page's elements. A post with no link, or
    /// whose caption cannot be scored, is skipped without replacement.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Access`] if the topic page cannot be loaded,
    /// and [`AnalysisError::NoData`] if no post produced a sample.
    pub(crate) async fn analyze(
        &mut self,
        tag: &str,
        run_id: RunId,
    ) -> Result<TagAnalysisResult, AnalysisError> {
        self.access
            .navigate(&selectors::tag_page_url(tag))
            .await
            .map_err(AnalysisError::Access)?;
        if let Err(e) = self
            .access
            .wait_for(selectors::POST_LINK, self.element_timeout)
            .await
        {
            tracing::warn!(tag, error = %e, "topic page shows no posts");
            return Err(AnalysisError::NoData {
                tag: tag.to_string(),
            });
        }
        settle(&self.settle, &mut self.rng).await;

        let posts = read_post_refs(self.access, self.posts_per_tag)
            .await
            .map_err(AnalysisError::Access)?;
        tracing::debug!(tag, posts = posts.len(), "post references read");

        let mut samples = Vec::with_capacity(posts.len());
        for post in posts {
            let Some(href) = post.href else {
                tracing::debug!(tag, "post link without href, skipping");
                continue;
            };
            let engagement = self.sampler.sample(self.access, &href).await;
            let sentiment = match self.oracle.score(&post.alt).await {
                Ok(score) => score,
                Err(e) => {
                    tracing::warn!(tag, post = %href, error = %e, "sentiment scoring failed, skipping post");
                    continue;
                }
            };
            tracing::debug!(
                tag,
                post = %href,
                likes = engagement.likes,
                comments = engagement.comments,
                synthesized = engagement.synthesized,
                polarity = sentiment.polarity,
                "post sampled"
            );
            samples.push(PostSample::new(href, engagement, sentiment));
        }

        summarize_samples(tag, &samples, run_id, Utc::now()).ok_or_else(|| {
            AnalysisError::NoData {
                tag: tag.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rand::SeedableRng;
    use tagpulse_core::{SentimentLabel, SentimentScore};
    use tagpulse_scraper::fake::{FakeContent, FakeElement, FakePage};
    use tagpulse_sentiment::SentimentError;

    use super::*;

    const TAG_PAGE: &str = "https://www.instagram.com/explore/tags/coffee/";

    /// Scores text by looking it up; unknown text is an error.
    struct TableOracle(Vec<(&'static str, f64)>);

    #[async_trait]
    impl SentimentOracle for TableOracle {
        async fn score(&self, text: &str) -> Result<SentimentScore, SentimentError> {
            self.0
                .iter()
                .find(|(t, _)| *t == text)
                .map(|(_, p)| SentimentScore::new(*p, 0.5))
                .ok_or_else(|| SentimentError::InvalidResponse(format!("unscored: {text}")))
        }
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            settle: DelayRange::ZERO,
            element_timeout: Duration::from_millis(1),
            ..PipelineConfig::default()
        }
    }

    fn post_page(likes: &str) -> FakePage {
        FakePage::new()
            .with("section", FakeElement::default())
            .with("section button span", FakeElement::with_text(likes))
    }

    fn analyzer<'a>(
        access: &'a FakeContent,
        oracle: &'a TableOracle,
        config: &PipelineConfig,
    ) -> TagAnalyzer<'a> {
        let sampler = EngagementSampler::new(config, StdRng::seed_from_u64(1));
        TagAnalyzer::new(access, oracle, config, sampler, StdRng::seed_from_u64(2))
    }

    #[tokio::test]
    async fn summarizes_sampled_posts() {
        let content = FakeContent::new()
            .with_page(
                TAG_PAGE,
                FakePage::new().with_posts(&[("/p/a/", "great"), ("/p/b/", "awful")]),
            )
            .with_page("https://www.instagram.com/p/a/", post_page("300 likes"))
            .with_page("https://www.instagram.com/p/b/", post_page("100 likes"));
        let oracle = TableOracle(vec![("great", 0.8), ("awful", -0.4)]);
        let config = config();

        let result = analyzer(&content, &oracle, &config)
            .analyze("coffee", RunId::generate())
            .await
            .unwrap();

        assert_eq!(result.tag, "coffee");
        assert_eq!(result.post_count, 2);
        assert!((result.engagement_score - 200.0).abs() < 1e-9);
        assert!((result.sentiment_polarity - 0.2).abs() < 1e-9);
        assert_eq!(result.sentiment_label, SentimentLabel::Positive);
        assert_eq!(result.top_post.locator, "/p/a/");
        assert_eq!(result.label_counts.positive, 1);
        assert_eq!(result.label_counts.negative, 1);
        assert_eq!(result.synthesized_posts, 0);
    }

    #[tokio::test]
    async fn samples_at_most_posts_per_tag() {
        let posts: Vec<(String, String)> = (0..8)
            .map(|i| (format!("/p/{i}/"), "great".to_string()))
            .collect();
        let borrowed: Vec<(&str, &str)> = posts
            .iter()
            .map(|(h, a)| (h.as_str(), a.as_str()))
            .collect();
        let content =
            FakeContent::new().with_page(TAG_PAGE, FakePage::new().with_posts(&borrowed));
        let oracle = TableOracle(vec![("great", 0.5)]);
        let config = config();

        let result = analyzer(&content, &oracle, &config)
            .analyze("coffee", RunId::generate())
            .await
            .unwrap();

        assert_eq!(result.post_count, 5);
        // Post pages are missing, so every engagement reading is synthesized.
        assert_eq!(result.synthesized_posts, 5);
    }

    #[tokio::test]
    async fn unscorable_and_linkless_posts_are_skipped_without_replacement() {
        let page = FakePage::new()
            .with(
                tagpulse_scraper::selectors::POST_LINK,
                FakeElement::default(),
            )
            .with_posts(&[("/p/a/", "great"), ("/p/b/", "mystery")]);
        let content = FakeContent::new()
            .with_page(TAG_PAGE, page)
            .with_page("https://www.instagram.com/p/a/", post_page("42"));
        let oracle = TableOracle(vec![("great", 0.5)]);
        let config = PipelineConfig {
            posts_per_tag: 3,
            ..config()
        };

        let result = analyzer(&content, &oracle, &config)
            .analyze("coffee", RunId::generate())
            .await
            .unwrap();

        assert_eq!(result.post_count, 1);
        assert_eq!(result.top_post.locator, "/p/a/");
        assert_eq!(result.total_likes, 42);
    }

    #[tokio::test]
    async fn no_scorable_posts_is_no_data() {
        let content = FakeContent::new()
            .with_page(TAG_PAGE, FakePage::new().with_posts(&[("/p/a/", "mystery")]));
        let oracle = TableOracle(vec![]);
        let config = config();

        let err = analyzer(&content, &oracle, &config)
            .analyze("coffee", RunId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoData { ref tag } if tag == "coffee"));
    }

    #[tokio::test]
    async fn topic_page_of_linkless_posts_is_no_data() {
        let link = tagpulse_scraper::selectors::POST_LINK;
        let page = FakePage::new()
            .with(link, FakeElement::default())
            .with(link, FakeElement::default());
        let content = FakeContent::new().with_page(TAG_PAGE, page);
        let oracle = TableOracle(vec![("great", 0.5)]);
        let config = config();

        let err = analyzer(&content, &oracle, &config)
            .analyze("coffee", RunId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoData { ref tag } if tag == "coffee"));
        assert_eq!(content.visits(), vec![TAG_PAGE.to_string()]);
    }

    #[tokio::test]
    async fn empty_topic_page_is_no_data() {
        let content = FakeContent::new().with_page(TAG_PAGE, FakePage::new());
        let oracle = TableOracle(vec![]);
        let config = config();

        let err = analyzer(&content, &oracle, &config)
            .analyze("coffee", RunId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoData { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_topic_page_is_access_error() {
        let content = FakeContent::new().with_failing(TAG_PAGE);
        let oracle = TableOracle(vec![]);
        let config = config();

        let err = analyzer(&content, &oracle, &config)
            .analyze("coffee", RunId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Access(_)), "got {err:?}");
    }
}
