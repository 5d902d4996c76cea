//! Persistence capability consumed by the pipeline.

use async_trait::async_trait;
use sqlx::PgPool;
use tagpulse_core::AnalysisRecord;

use crate::tag_analyses::insert_tag_analysis;
use crate::DbError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A record for the same run and tag already exists.
    AlreadyPresent,
}

/// Durably stores one analysis record.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// # Errors
    ///
    /// Returns [`DbError::InvalidRecord`] for records with `post_count < 1`,
    /// or a storage error from the backing implementation.
    async fn insert(&self, record: &AnalysisRecord) -> Result<InsertOutcome, DbError>;
}

fn validate(record: &AnalysisRecord) -> Result<(), DbError> {
    if record.post_count < 1 {
        return Err(DbError::InvalidRecord(format!(
            "{} has post_count {}",
            record.topic_tag, record.post_count
        )));
    }
    Ok(())
}

/// Postgres-backed gateway writing to `tag_analyses`.
#[derive(Debug, Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersistenceGateway for PgGateway {
    async fn insert(&self, record: &AnalysisRecord) -> Result<InsertOutcome, DbError> {
        validate(record)?;
        if insert_tag_analysis(&self.pool, record).await? {
            Ok(InsertOutcome::Inserted)
        } else {
            Ok(InsertOutcome::AlreadyPresent)
        }
    }
}

/// Gateway that only logs records. Used for `--dry-run`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunGateway;

#[async_trait]
impl PersistenceGateway for DryRunGateway {
    async fn insert(&self, record: &AnalysisRecord) -> Result<InsertOutcome, DbError> {
        validate(record)?;
        tracing::info!(
            run_id = %record.run_id,
            tag = %record.topic_tag,
            posts = record.post_count,
            engagement = record.engagement_score,
            label = %record.sentiment_label,
            synthesized = record.synthesized,
            "dry-run: record not persisted"
        );
        Ok(InsertOutcome::Inserted)
    }
}
