//! Discovery-then-analysis run over one browser session.
//!
//! [`Orchestrator`] owns the run: it authenticates, discovers and ranks tags,
//! then analyzes each ranked tag in turn with [`TagAnalyzer`], persisting
//! results through a `PersistenceGateway`. A tag that fails is counted and
//! skipped; only session setup failure ends the run early.

mod analyze;
mod orchestrator;
mod report;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tagpulse_core::RunId;
use tagpulse_db::DbError;
use tagpulse_scraper::ScraperError;
use thiserror::Error;

pub(crate) use analyze::TagAnalyzer;
pub(crate) use orchestrator::{Orchestrator, RunDeps};
pub(crate) use report::{print_ranked, print_run_summary};

/// Lifecycle of one run. Transitions are logged as they happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunState {
    Init,
    Discovering,
    /// Zero-based position in the ranked list.
    AnalyzingTag(usize),
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => f.write_str("init"),
            Self::Discovering => f.write_str("discovering"),
            Self::AnalyzingTag(i) => write!(f, "analyzing_tag[{i}]"),
            Self::Done => f.write_str("done"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Per-run counters reported at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub run_id: RunId,
    pub state: RunState,
    pub discovered: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Error)]
pub(crate) enum AnalysisError {
    #[error("no usable posts for #{tag}")]
    NoData { tag: String },

    #[error("topic page unavailable: {0}")]
    Access(#[source] ScraperError),
}

#[derive(Debug, Error)]
pub(crate) enum PipelineError {
    #[error("session setup failed: {0}")]
    Setup(#[source] ScraperError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] DbError),
}

/// Waits between consecutive tags.
#[async_trait]
pub(crate) trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        tracing::debug!(delay_ms = delay.as_millis(), "pacing before next tag");
        tokio::time::sleep(delay).await;
    }
}
