use async_trait::async_trait;
use tagpulse_core::SentimentScore;

use crate::error::SentimentError;

/// Scores a piece of text for polarity and subjectivity.
#[async_trait]
pub trait SentimentOracle: Send + Sync {
    /// # Errors
    ///
    /// Implementations backed by a remote service return [`SentimentError`]
    /// on transport or protocol failures.
    async fn score(&self, text: &str) -> Result<SentimentScore, SentimentError>;
}
