//! Weighted tag-frequency aggregation across discovery sources.
//!
//! Discovery sources emit [`TagObservation`]s; a [`TagFrequencyTable`] sums
//! their weights for the duration of one run and produces the ranked,
//! filtered list that drives per-tag analysis.

use std::collections::{BTreeSet, HashMap};

const MIN_TAG_CHARS: usize = 3;
const MAX_TAG_CHARS: usize = 30;

/// Generic or platform-boilerplate tags that never qualify, whatever their weight.
pub const DEFAULT_EXCLUDED_TAGS: &[&str] = &[
    "love",
    "instagood",
    "instagram",
    "follow",
    "like",
    "photooftheday",
    "fashion",
    "beautiful",
    "happy",
    "cute",
    "followme",
    "picoftheday",
    "art",
    "photography",
    "reels",
    "reel",
    "viral",
    "trending",
    "explore",
    "style",
    "instadaily",
    "nature",
    "travel",
    "followforfollowback",
];

/// Trim and lowercase a raw tag token, rejecting tokens outside 3 to 30 characters.
#[must_use]
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('#');
    let len = trimmed.chars().count();
    if !(MIN_TAG_CHARS..=MAX_TAG_CHARS).contains(&len) {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Where a tag observation came from. Determines its weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoverySource {
    /// Post caption text: deliberate topic labeling by the author.
    Caption,
    /// Image alt text / generated description on a feed post.
    AltText,
    /// Alt text of posts found on a seed topic page.
    TopicPage,
}

impl DiscoverySource {
    #[must_use]
    pub fn weight(self) -> u64 {
        match self {
            Self::Caption => 3,
            Self::AltText | Self::TopicPage => 1,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Caption => "caption",
            Self::AltText => "alt_text",
            Self::TopicPage => "topic_page",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagObservation {
    pub tag: String,
    pub weight: u64,
}

impl TagObservation {
    /// Normalize `raw` and weight it by `source`. Returns `None` when the
    /// token fails normalization.
    #[must_use]
    pub fn new(raw: &str, source: DiscoverySource) -> Option<Self> {
        normalize_tag(raw).map(|tag| Self {
            tag,
            weight: source.weight(),
        })
    }
}

/// A tag with its cumulative weight for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedTag {
    pub tag: String,
    pub weight: u64,
}

/// Filtering and truncation rules applied by [`TagFrequencyTable::rank`].
#[derive(Debug, Clone)]
pub struct RankingPolicy {
    pub excluded: BTreeSet<String>,
    pub min_frequency: u64,
    pub top_n: usize,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            excluded: DEFAULT_EXCLUDED_TAGS
                .iter()
                .map(|t| (*t).to_string())
                .collect(),
            min_frequency: 1,
            top_n: 15,
        }
    }
}

/// Additive tag → weight table that remembers first-discovery order.
#[derive(Debug, Clone, Default)]
pub struct TagFrequencyTable {
    entries: Vec<RankedTag>,
    index: HashMap<String, usize>,
}

impl TagFrequencyTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, observation: TagObservation) {
        if let Some(&i) = self.index.get(&observation.tag) {
            let entry = &mut self.entries[i];
            entry.weight = entry.weight.saturating_add(observation.weight);
            return;
        }
        self.index
            .insert(observation.tag.clone(), self.entries.len());
        self.entries.push(RankedTag {
            tag: observation.tag,
            weight: observation.weight,
        });
    }

    pub fn record_batch<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = TagObservation>,
    {
        for observation in batch {
            self.record(observation);
        }
    }

    /// Cumulative weight of `tag`, or `0` if never observed.
    #[must_use]
    pub fn weight(&self, tag: &str) -> u64 {
        self.index
            .get(tag)
            .map_or(0, |&i| self.entries[i].weight)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Produce the ranked list: excluded and under-threshold tags removed,
    /// descending weight, ties in first-discovered order, at most `top_n`.
    #[must_use]
    pub fn rank(&self, policy: &RankingPolicy) -> Vec<RankedTag> {
        let mut ranked: Vec<RankedTag> = self
            .entries
            .iter()
            .filter(|e| !policy.excluded.contains(&e.tag))
            .filter(|e| e.weight >= policy.min_frequency)
            .cloned()
            .collect();
        // `sort_by` is stable, so equal weights keep insertion order.
        ranked.sort_by(|a, b| b.weight.cmp(&a.weight));
        ranked.truncate(policy.top_n);
        ranked
    }
}

#[cfg(test)]
#[path = "tags_test.rs"]
mod tests;
