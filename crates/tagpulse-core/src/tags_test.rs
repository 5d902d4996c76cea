use super::*;

fn policy(excluded: &[&str], min_frequency: u64, top_n: usize) -> RankingPolicy {
    RankingPolicy {
        excluded: excluded.iter().map(|t| (*t).to_string()).collect(),
        min_frequency,
        top_n,
    }
}

fn observe(table: &mut TagFrequencyTable, raw: &str, source: DiscoverySource, times: usize) {
    for _ in 0..times {
        table.record(TagObservation::new(raw, source).expect("valid tag"));
    }
}

fn tags(ranked: &[RankedTag]) -> Vec<&str> {
    ranked.iter().map(|r| r.tag.as_str()).collect()
}

#[test]
fn normalize_trims_and_lowercases() {
    assert_eq!(normalize_tag("  SunSet "), Some("sunset".to_string()));
    assert_eq!(normalize_tag("#Coffee"), Some("coffee".to_string()));
}

#[test]
fn normalize_rejects_out_of_range_lengths() {
    assert_eq!(normalize_tag("ab"), None);
    assert_eq!(normalize_tag(&"a".repeat(31)), None);
    assert_eq!(normalize_tag("abc"), Some("abc".to_string()));
    assert_eq!(normalize_tag(&"a".repeat(30)), Some("a".repeat(30)));
}

#[test]
fn normalize_counts_characters_not_bytes() {
    // Three characters, six bytes.
    assert_eq!(normalize_tag("日本語"), Some("日本語".to_string()));
}

#[test]
fn caption_observations_weigh_three_times_non_caption() {
    let mut table = TagFrequencyTable::new();
    observe(&mut table, "coffee", DiscoverySource::Caption, 4);
    observe(&mut table, "tea", DiscoverySource::AltText, 2);
    observe(&mut table, "tea", DiscoverySource::TopicPage, 2);

    assert_eq!(table.weight("coffee"), 12);
    assert_eq!(table.weight("tea"), 4);
    assert_eq!(table.weight("missing"), 0);
}

#[test]
fn weights_accumulate_across_sources_for_same_tag() {
    let mut table = TagFrequencyTable::new();
    table.record_batch(
        [
            TagObservation::new("Sun", DiscoverySource::Caption),
            TagObservation::new("sun", DiscoverySource::AltText),
        ]
        .into_iter()
        .flatten(),
    );
    assert_eq!(table.len(), 1);
    assert_eq!(table.weight("sun"), 4);
}

#[test]
fn excluded_tags_never_rank_regardless_of_weight() {
    let mut table = TagFrequencyTable::new();
    observe(&mut table, "viral", DiscoverySource::Caption, 50);
    observe(&mut table, "sourdough", DiscoverySource::AltText, 1);

    let ranked = table.rank(&RankingPolicy::default());
    assert_eq!(tags(&ranked), vec!["sourdough"]);
}

#[test]
fn tags_below_min_frequency_are_dropped() {
    let mut table = TagFrequencyTable::new();
    observe(&mut table, "rare", DiscoverySource::AltText, 2);
    observe(&mut table, "common", DiscoverySource::AltText, 3);

    let ranked = table.rank(&policy(&[], 3, 15));
    assert_eq!(tags(&ranked), vec!["common"]);
}

#[test]
fn equal_weights_keep_first_discovered_order() {
    let mut table = TagFrequencyTable::new();
    observe(&mut table, "zeta", DiscoverySource::AltText, 2);
    observe(&mut table, "alpha", DiscoverySource::AltText, 2);
    observe(&mut table, "heavy", DiscoverySource::Caption, 1);

    let ranked = table.rank(&policy(&[], 1, 15));
    assert_eq!(tags(&ranked), vec!["heavy", "zeta", "alpha"]);
}

#[test]
fn ranking_truncates_to_top_n() {
    let mut table = TagFrequencyTable::new();
    for (i, name) in ["one", "two", "three", "four", "five"].iter().enumerate() {
        observe(&mut table, name, DiscoverySource::AltText, i + 1);
    }

    let ranked = table.rank(&policy(&[], 1, 3));
    assert_eq!(tags(&ranked), vec!["five", "four", "three"]);
}

#[test]
fn fewer_survivors_than_top_n_returns_all() {
    let mut table = TagFrequencyTable::new();
    observe(&mut table, "only", DiscoverySource::AltText, 1);
    observe(&mut table, "pair", DiscoverySource::AltText, 1);

    let ranked = table.rank(&policy(&[], 1, 15));
    assert_eq!(ranked.len(), 2);
}

#[test]
fn empty_table_ranks_to_empty_list() {
    let table = TagFrequencyTable::new();
    assert!(table.is_empty());
    assert!(table.rank(&RankingPolicy::default()).is_empty());
}

#[test]
fn sun_and_rain_scenario_ranks_rain_first() {
    let mut table = TagFrequencyTable::new();
    observe(&mut table, "sun", DiscoverySource::Caption, 1);
    observe(&mut table, "sun", DiscoverySource::AltText, 1);
    observe(&mut table, "rain", DiscoverySource::AltText, 5);

    assert_eq!(table.weight("sun"), 4);
    assert_eq!(table.weight("rain"), 5);

    let ranked = table.rank(&policy(&[], 1, 15));
    assert_eq!(tags(&ranked), vec!["rain", "sun"]);
}
