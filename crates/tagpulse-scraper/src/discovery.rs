//! Hashtag discovery across the home feed, post captions and seed topic
//! pages.
//!
//! Each source is independent: a source that fails is logged and contributes
//! nothing, while the others still feed the frequency table.

use std::sync::LazyLock;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use regex::Regex;
use tagpulse_core::{
    absolute_post_url, DiscoverySource, PipelineConfig, TagFrequencyTable, TagObservation,
};

use crate::access::{settle, ContentAccess};
use crate::error::ScraperError;
use crate::posts::read_post_refs;
use crate::selectors;

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("valid regex"));

/// Every `#tag` token in `text` that survives normalization, weighted by
/// `source`.
#[must_use]
pub fn extract_tags(text: &str, source: DiscoverySource) -> Vec<TagObservation> {
    HASHTAG_RE
        .captures_iter(text)
        .filter_map(|caps| TagObservation::new(&caps[1], source))
        .collect()
}

/// Run all discovery sources and return the accumulated frequency table.
pub async fn discover_tags(
    access: &dyn ContentAccess,
    config: &PipelineConfig,
    rng: &mut StdRng,
) -> TagFrequencyTable {
    let mut table = TagFrequencyTable::new();

    for source in [
        DiscoverySource::AltText,
        DiscoverySource::Caption,
        DiscoverySource::TopicPage,
    ] {
        let result = match source {
            DiscoverySource::AltText => feed_alt_text(access, config, rng).await,
            DiscoverySource::Caption => captions(access, config, rng).await,
            DiscoverySource::TopicPage => topic_pages(access, config, rng).await,
        };
        match result {
            Ok(observations) => {
                tracing::info!(
                    source = source.as_str(),
                    observations = observations.len(),
                    "discovery source finished"
                );
                table.record_batch(observations);
            }
            Err(e) => {
                tracing::warn!(source = source.as_str(), error = %e, "discovery source failed");
            }
        }
    }

    tracing::info!(unique_tags = table.len(), "discovery finished");
    table
}

async fn open_feed(
    access: &dyn ContentAccess,
    config: &PipelineConfig,
    rng: &mut StdRng,
) -> Result<(), ScraperError> {
    access.navigate(&selectors::home_url()).await?;
    settle(&config.settle, rng).await;
    if access
        .wait_for(selectors::FEED_ARTICLE, config.element_timeout)
        .await
        .is_err()
    {
        access
            .wait_for(selectors::POST_IMAGE, config.element_timeout)
            .await?;
    }
    Ok(())
}

async fn feed_alt_text(
    access: &dyn ContentAccess,
    config: &PipelineConfig,
    rng: &mut StdRng,
) -> Result<Vec<TagObservation>, ScraperError> {
    let limits = &config.discovery;
    open_feed(access, config, rng).await?;

    for _ in 0..limits.feed_scrolls {
        access.scroll_by(limits.feed_scroll_px).await?;
        settle(&config.settle, rng).await;
    }

    let posts = read_post_refs(access, limits.feed_post_limit).await?;
    tracing::debug!(posts = posts.len(), "feed posts read");
    Ok(posts
        .iter()
        .flat_map(|post| extract_tags(&post.alt, DiscoverySource::AltText))
        .collect())
}

async fn captions(
    access: &dyn ContentAccess,
    config: &PipelineConfig,
    rng: &mut StdRng,
) -> Result<Vec<TagObservation>, ScraperError> {
    let limits = &config.discovery;
    open_feed(access, config, rng).await?;

    let hrefs: Vec<String> = read_post_refs(access, limits.caption_pool)
        .await?
        .into_iter()
        .filter_map(|post| post.href)
        .collect();
    let sampled: Vec<String> = hrefs
        .choose_multiple(rng, limits.caption_samples)
        .cloned()
        .collect();
    tracing::debug!(pool = hrefs.len(), sampled = sampled.len(), "caption sample drawn");

    let mut observations = Vec::new();
    for href in &sampled {
        match caption_text(access, href, config, rng).await {
            Ok(Some(text)) => observations.extend(extract_tags(&text, DiscoverySource::Caption)),
            Ok(None) => tracing::debug!(post = %href, "no caption with tags"),
            Err(e) => tracing::debug!(post = %href, error = %e, "caption unreadable"),
        }
    }
    Ok(observations)
}

/// First caption candidate on the post page that carries a `#`.
async fn caption_text(
    access: &dyn ContentAccess,
    href: &str,
    config: &PipelineConfig,
    rng: &mut StdRng,
) -> Result<Option<String>, ScraperError> {
    access.navigate(&absolute_post_url(href)).await?;
    settle(&config.settle, rng).await;

    for &(pattern, inspect, min_len) in selectors::CAPTION_CANDIDATES {
        let candidates = access.find_all(pattern).await?;
        for element in candidates.into_iter().take(inspect) {
            let text = access.text(element).await?;
            if text.contains('#') && text.chars().count() >= min_len {
                return Ok(Some(text));
            }
        }
    }
    Ok(None)
}

async fn topic_pages(
    access: &dyn ContentAccess,
    config: &PipelineConfig,
    rng: &mut StdRng,
) -> Result<Vec<TagObservation>, ScraperError> {
    let limits = &config.discovery;
    let mut observations = Vec::new();

    for seed in &limits.topic_seeds {
        if let Err(e) = access.navigate(&selectors::tag_page_url(seed)).await {
            tracing::debug!(seed = %seed, error = %e, "topic page unreachable");
            continue;
        }
        settle(&config.settle, rng).await;
        if let Err(e) = access
            .wait_for(selectors::POST_LINK, config.element_timeout)
            .await
        {
            tracing::debug!(seed = %seed, error = %e, "topic page has no posts");
            continue;
        }
        match read_post_refs(access, limits.topic_post_limit).await {
            Ok(posts) => observations.extend(
                posts
                    .iter()
                    .flat_map(|post| extract_tags(&post.alt, DiscoverySource::TopicPage)),
            ),
            Err(e) => tracing::debug!(seed = %seed, error = %e, "topic posts unreadable"),
        }
    }
    Ok(observations)
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
