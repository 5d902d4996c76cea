//! Human-facing progress output for a run.

use tagpulse_core::{RankedTag, TagAnalysisResult};

use super::RunSummary;

pub(crate) fn print_ranked(ranked: &[RankedTag]) {
    if ranked.is_empty() {
        println!("no trending tags found; try again later or relax TAGPULSE_EXCLUDED_TAGS");
        return;
    }

    println!("found {} trending tags", ranked.len());
    println!("{:<6}{:<32}WEIGHT", "RANK", "TAG");
    for (i, entry) in ranked.iter().enumerate() {
        println!("{:<6}{:<32}{}", i + 1, format!("#{}", entry.tag), entry.weight);
    }
}

pub(crate) fn print_tag_summary(position: usize, total: usize, result: &TagAnalysisResult) {
    println!();
    println!("[{position}/{total}] #{}", result.tag);
    println!(
        "  posts: {} | avg engagement: {:.0} | likes: {} | comments: {}",
        result.post_count, result.engagement_score, result.total_likes, result.total_comments
    );
    println!(
        "  sentiment: {} ({:.2})",
        result.sentiment_label, result.sentiment_polarity
    );
    if result.synthesized_posts > 0 {
        println!(
            "  note: {} of {} posts used synthesized engagement",
            result.synthesized_posts, result.post_count
        );
    }
}

pub(crate) fn print_run_summary(summary: &RunSummary) {
    println!();
    println!("run {} finished ({})", summary.run_id, summary.state);
    println!(
        "  discovered: {} | attempted: {} | succeeded: {} | failed: {}",
        summary.discovered, summary.attempted, summary.succeeded, summary.failed
    );
}
