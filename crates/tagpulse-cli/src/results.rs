//! Read-only query over persisted analyses.

use tagpulse_core::AppConfig;
use uuid::Uuid;

/// Print recent analyses as a table, optionally restricted to one run.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the query fails.
pub(crate) async fn run_results(
    config: &AppConfig,
    run_id: Option<Uuid>,
    limit: i64,
) -> anyhow::Result<()> {
    let pool = crate::db::connect(config).await?;
    let rows = tagpulse_db::list_tag_analyses(&pool, run_id, limit).await?;

    if rows.is_empty() {
        println!(
            "no tag analyses found{}; run `tagpulse run` first",
            run_id
                .map(|id| format!(" for run {id}"))
                .unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "{:<18}{:<28}{:<8}{:<14}{:<20}SYNTH",
        "SCRAPED", "TAG", "POSTS", "ENGAGEMENT", "SENTIMENT"
    );
    for row in &rows {
        let scraped = row.scraped_at.format("%Y-%m-%d %H:%M").to_string();
        let sentiment = format!("{} ({:.2})", row.sentiment_label, row.sentiment_polarity);
        let synthesized = row
            .metadata
            .get("synthesized_posts")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);
        println!(
            "{:<18}{:<28}{:<8}{:<14.0}{:<20}{}",
            scraped, row.topic_tag, row.post_count, row.engagement_score, sentiment, synthesized
        );
    }

    Ok(())
}
