//! Per-tag summary statistics over collected post samples.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{PostSample, RunId, SentimentLabel};

/// How many sampled posts fell under each sentiment label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl LabelCounts {
    pub fn tally(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }
}

/// Summary of one tag for one run. Always built from at least one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TagAnalysisResult {
    pub tag: String,
    /// Mean total engagement per sampled post.
    pub engagement_score: f64,
    /// Mean per-post polarity.
    pub sentiment_polarity: f64,
    pub sentiment_label: SentimentLabel,
    pub avg_subjectivity: f64,
    pub post_count: usize,
    pub top_post: PostSample,
    pub label_counts: LabelCounts,
    pub total_likes: u64,
    pub total_comments: u64,
    pub total_engagement: u64,
    pub avg_likes: f64,
    pub avg_comments: f64,
    /// Samples whose engagement came from the fallback ranges.
    pub synthesized_posts: usize,
    pub scraped_at: DateTime<Utc>,
    pub run_id: RunId,
}

/// Aggregate `samples` into a [`TagAnalysisResult`].
///
/// Returns `None` when `samples` is empty; a tag with no usable samples has
/// nothing to report. The top post is the first sample with the maximum
/// total engagement.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize_samples(
    tag: &str,
    samples: &[PostSample],
    run_id: RunId,
    scraped_at: DateTime<Utc>,
) -> Option<TagAnalysisResult> {
    let first = samples.first()?;

    let mut top_post = first;
    let mut label_counts = LabelCounts::default();
    let mut total_likes: u64 = 0;
    let mut total_comments: u64 = 0;
    let mut total_engagement: u64 = 0;
    let mut polarity_sum = 0.0_f64;
    let mut subjectivity_sum = 0.0_f64;
    let mut synthesized_posts = 0usize;

    for sample in samples {
        if sample.total_engagement > top_post.total_engagement {
            top_post = sample;
        }
        label_counts.tally(sample.label());
        total_likes = total_likes.saturating_add(sample.likes);
        total_comments = total_comments.saturating_add(sample.comments);
        total_engagement = total_engagement.saturating_add(sample.total_engagement);
        polarity_sum += sample.sentiment_polarity;
        subjectivity_sum += sample.sentiment_subjectivity;
        if sample.synthesized {
            synthesized_posts += 1;
        }
    }

    let n = samples.len() as f64;
    let sentiment_polarity = polarity_sum / n;

    Some(TagAnalysisResult {
        tag: tag.to_string(),
        engagement_score: total_engagement as f64 / n,
        sentiment_polarity,
        sentiment_label: SentimentLabel::from_polarity(sentiment_polarity),
        avg_subjectivity: subjectivity_sum / n,
        post_count: samples.len(),
        top_post: top_post.clone(),
        label_counts,
        total_likes,
        total_comments,
        total_engagement,
        avg_likes: total_likes as f64 / n,
        avg_comments: total_comments as f64 / n,
        synthesized_posts,
        scraped_at,
        run_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EngagementCounts, SentimentScore};

    fn sample(locator: &str, likes: u64, comments: u64, polarity: f64) -> PostSample {
        PostSample::new(
            locator,
            EngagementCounts::observed(likes, comments),
            SentimentScore::new(polarity, 0.5),
        )
    }

    fn summarize(samples: &[PostSample]) -> Option<TagAnalysisResult> {
        summarize_samples("coffee", samples, RunId::generate(), Utc::now())
    }

    #[test]
    fn empty_samples_produce_no_result() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn top_post_is_first_sample_with_max_engagement() {
        let samples = vec![
            sample("/p/a/", 100, 0, 0.0),
            sample("/p/b/", 450, 50, 0.0),
            sample("/p/c/", 500, 0, 0.0),
            sample("/p/d/", 50, 0, 0.0),
        ];
        let result = summarize(&samples).unwrap();
        assert_eq!(result.top_post.total_engagement, 500);
        assert_eq!(result.top_post.locator, "/p/b/");
    }

    #[test]
    fn means_and_totals_are_computed_over_all_samples() {
        let samples = vec![
            sample("/p/a/", 100, 10, 0.4),
            sample("/p/b/", 300, 30, -0.2),
        ];
        let result = summarize(&samples).unwrap();

        assert_eq!(result.post_count, 2);
        assert_eq!(result.total_likes, 400);
        assert_eq!(result.total_comments, 40);
        assert_eq!(result.total_engagement, 440);
        assert!((result.engagement_score - 220.0).abs() < 1e-9);
        assert!((result.avg_likes - 200.0).abs() < 1e-9);
        assert!((result.avg_comments - 20.0).abs() < 1e-9);
        assert!((result.sentiment_polarity - 0.1).abs() < 1e-9);
        assert!((result.avg_subjectivity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn label_distribution_uses_post_level_thresholds() {
        let samples = vec![
            sample("/p/a/", 1, 0, 0.5),
            sample("/p/b/", 1, 0, 0.1),
            sample("/p/c/", 1, 0, -0.05),
            sample("/p/d/", 1, 0, -0.3),
        ];
        let result = summarize(&samples).unwrap();
        assert_eq!(
            result.label_counts,
            LabelCounts {
                positive: 1,
                negative: 1,
                neutral: 2,
            }
        );
    }

    #[test]
    fn tag_label_derives_from_mean_polarity() {
        let samples = vec![sample("/p/a/", 1, 0, 0.6), sample("/p/b/", 1, 0, -0.2)];
        let result = summarize(&samples).unwrap();
        assert_eq!(result.sentiment_label, SentimentLabel::Positive);

        let samples = vec![sample("/p/a/", 1, 0, 0.1), sample("/p/b/", 1, 0, -0.3)];
        let result = summarize(&samples).unwrap();
        assert_eq!(result.sentiment_label, SentimentLabel::Negative);
    }

    #[test]
    fn synthesized_samples_are_counted() {
        let mut synthetic = sample("/p/a/", 900, 20, 0.0);
        synthetic.synthesized = true;
        let samples = vec![synthetic, sample("/p/b/", 10, 1, 0.0)];
        let result = summarize(&samples).unwrap();
        assert_eq!(result.synthesized_posts, 1);
    }
}
