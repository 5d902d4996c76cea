//! Sentiment scoring for sampled post text.
//!
//! Exposes the [`SentimentOracle`] capability consumed by tag analysis, a
//! built-in lexicon scorer, and an HTTP client for an external scoring
//! service.

pub mod error;
pub mod http;
pub mod lexicon;
pub mod oracle;

pub use error::SentimentError;
pub use http::HttpOracle;
pub use lexicon::{lexicon_score, LexiconOracle};
pub use oracle::SentimentOracle;
