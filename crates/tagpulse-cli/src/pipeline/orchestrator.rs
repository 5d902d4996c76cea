use rand::rngs::StdRng;
use rand::SeedableRng;
use tagpulse_core::{AnalysisRecord, Credentials, PipelineConfig, RankedTag, RunId};
use tagpulse_db::{InsertOutcome, PersistenceGateway};
use tagpulse_scraper::{discover_tags, ensure_session, ContentAccess, EngagementSampler};
use tagpulse_sentiment::SentimentOracle;
use tracing::Instrument;

use super::report::{print_ranked, print_tag_summary};
use super::{Pacer, PipelineError, RunState, RunSummary, TagAnalyzer};

/// External capabilities a run depends on.
#[derive(Clone, Copy)]
pub(crate) struct RunDeps<'a> {
    pub access: &'a dyn ContentAccess,
    pub oracle: &'a dyn SentimentOracle,
    pub gateway: &'a dyn PersistenceGateway,
    pub pacer: &'a dyn Pacer,
}

pub(crate) struct Orchestrator<'a> {
    deps: RunDeps<'a>,
    config: PipelineConfig,
    run_id: RunId,
    rng: StdRng,
    state: RunState,
}

impl<'a> Orchestrator<'a> {
    pub(crate) fn new(deps: RunDeps<'a>, config: PipelineConfig, run_id: RunId, rng: StdRng) -> Self {
        Self {
            deps,
            config,
            run_id,
            rng,
            state: RunState::Init,
        }
    }

    pub(crate) fn state(&self) -> RunState {
        self.state
    }

    /// Authenticate, discover, then analyze and persist every ranked tag.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Setup`] if the session cannot be
    /// established. Per-tag failures are counted in the summary instead.
    pub(crate) async fn run(
        &mut self,
        credentials: &Credentials,
    ) -> Result<RunSummary, PipelineError> {
        let span = tracing::info_span!("run", run_id = %self.run_id);
        async move {
            self.setup(credentials).await?;
            let ranked = self.discover().await;
            print_ranked(&ranked);

            let mut summary = RunSummary {
                run_id: self.run_id,
                state: RunState::Done,
                discovered: ranked.len(),
                attempted: 0,
                succeeded: 0,
                failed: 0,
            };

            let analyzer_rng = StdRng::from_rng(&mut self.rng);
            let sampler = EngagementSampler::new(&self.config, StdRng::from_rng(&mut self.rng));
            let mut analyzer = TagAnalyzer::new(
                self.deps.access,
                self.deps.oracle,
                &self.config,
                sampler,
                analyzer_rng,
            );

            for (i, entry) in ranked.iter().enumerate() {
                self.transition(RunState::AnalyzingTag(i));
                summary.attempted += 1;

                match self.process_tag(&mut analyzer, i, ranked.len(), entry).await {
                    Ok(outcome) => {
                        summary.succeeded += 1;
                        tracing::info!(tag = %entry.tag, ?outcome, "tag stored");
                    }
                    Err(e) => {
                        summary.failed += 1;
                        tracing::warn!(tag = %entry.tag, error = %e, "tag failed");
                    }
                }

                if i + 1 < ranked.len() {
                    let delay = self.config.pacing.sample(&mut self.rng);
                    self.deps.pacer.pause(delay).await;
                }
            }

            self.transition(RunState::Done);
            tracing::info!(
                discovered = summary.discovered,
                attempted = summary.attempted,
                succeeded = summary.succeeded,
                failed = summary.failed,
                "run finished"
            );
            Ok(summary)
        }
        .instrument(span)
        .await
    }

    /// Authenticate and return the ranked tag list without analyzing it.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Setup`] if the session cannot be established.
    pub(crate) async fn discover_only(
        &mut self,
        credentials: &Credentials,
    ) -> Result<Vec<RankedTag>, PipelineError> {
        let span = tracing::info_span!("discover", run_id = %self.run_id);
        async move {
            self.setup(credentials).await?;
            let ranked = self.discover().await;
            self.transition(RunState::Done);
            Ok(ranked)
        }
        .instrument(span)
        .await
    }

    async fn setup(&mut self, credentials: &Credentials) -> Result<(), PipelineError> {
        tracing::info!(state = %self.state, "establishing session");
        if let Err(e) =
            ensure_session(self.deps.access, credentials, &self.config, &mut self.rng).await
        {
            self.transition(RunState::Failed);
            return Err(PipelineError::Setup(e));
        }
        Ok(())
    }

    async fn discover(&mut self) -> Vec<RankedTag> {
        self.transition(RunState::Discovering);
        let table = discover_tags(self.deps.access, &self.config, &mut self.rng).await;
        let ranked = table.rank(&self.config.ranking_policy());
        tracing::info!(
            unique_tags = table.len(),
            ranked = ranked.len(),
            "tags ranked"
        );
        ranked
    }

    async fn process_tag(
        &self,
        analyzer: &mut TagAnalyzer<'_>,
        index: usize,
        total: usize,
        entry: &RankedTag,
    ) -> Result<InsertOutcome, PipelineError> {
        let result = analyzer.analyze(&entry.tag, self.run_id).await?;
        print_tag_summary(index + 1, total, &result);

        let record = AnalysisRecord::from_result(&result);
        let outcome = self.deps.gateway.insert(&record).await?;
        if outcome == InsertOutcome::AlreadyPresent {
            tracing::info!(tag = %entry.tag, "record already present for this run");
        }
        Ok(outcome)
    }

    fn transition(&mut self, next: RunState) {
        tracing::info!(from = %self.state, to = %next, "run state");
        self.state = next;
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
