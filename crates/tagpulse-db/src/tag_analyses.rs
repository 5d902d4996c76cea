//! Database operations for the `tag_analyses` table.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use tagpulse_core::AnalysisRecord;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `tag_analyses` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TagAnalysisRow {
    pub id: i64,
    pub platform: String,
    pub topic_tag: String,
    pub engagement_score: f64,
    pub sentiment_polarity: f64,
    pub sentiment_label: String,
    pub post_count: i32,
    pub views: Option<i64>,
    pub metadata: Value,
    pub synthesized: bool,
    pub scraped_at: DateTime<Utc>,
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert one analysis record.
///
/// Idempotent on `(run_id, topic_tag)`: re-inserting the same tag for the
/// same run is a no-op. Returns `true` if a row was written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_tag_analysis(pool: &PgPool, record: &AnalysisRecord) -> Result<bool, DbError> {
    let id: Option<i64> = sqlx::query_scalar(
        "INSERT INTO tag_analyses \
             (platform, topic_tag, engagement_score, sentiment_polarity, sentiment_label, \
              post_count, views, metadata, synthesized, scraped_at, run_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         ON CONFLICT (run_id, topic_tag) DO NOTHING \
         RETURNING id",
    )
    .bind(&record.platform)
    .bind(&record.topic_tag)
    .bind(record.engagement_score)
    .bind(record.sentiment_polarity)
    .bind(record.sentiment_label.as_str())
    .bind(record.post_count)
    .bind(record.views)
    .bind(&record.metadata)
    .bind(record.synthesized)
    .bind(record.scraped_at)
    .bind(record.run_id.as_uuid())
    .fetch_optional(pool)
    .await?;

    Ok(id.is_some())
}

/// List recent analyses, optionally restricted to one run.
///
/// Results are ordered by `scraped_at DESC` then `id DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_tag_analyses(
    pool: &PgPool,
    run_id: Option<Uuid>,
    limit: i64,
) -> Result<Vec<TagAnalysisRow>, DbError> {
    let rows = match run_id {
        Some(run_id) => {
            sqlx::query_as::<_, TagAnalysisRow>(
                "SELECT id, platform, topic_tag, engagement_score, sentiment_polarity, \
                        sentiment_label, post_count, views, metadata, synthesized, \
                        scraped_at, run_id, created_at \
                 FROM tag_analyses \
                 WHERE run_id = $1 \
                 ORDER BY scraped_at DESC, id DESC \
                 LIMIT $2",
            )
            .bind(run_id)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, TagAnalysisRow>(
                "SELECT id, platform, topic_tag, engagement_score, sentiment_polarity, \
                        sentiment_label, post_count, views, metadata, synthesized, \
                        scraped_at, run_id, created_at \
                 FROM tag_analyses \
                 ORDER BY scraped_at DESC, id DESC \
                 LIMIT $1",
            )
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}
