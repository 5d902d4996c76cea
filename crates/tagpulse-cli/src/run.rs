//! Wiring for the `run` and `discover` commands.
//!
//! Every external capability is constructed here, before the browser is
//! driven, so configuration and connectivity problems surface before any
//! tag is processed.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tagpulse_core::{AppConfig, RunId};
use tagpulse_db::{DryRunGateway, PersistenceGateway, PgGateway};
use tagpulse_scraper::{BrowserSession, LaunchOptions};
use tagpulse_sentiment::{HttpOracle, LexiconOracle, SentimentOracle};

use crate::pipeline::{print_ranked, print_run_summary, Orchestrator, RunDeps, TokioPacer};

fn build_oracle(config: &AppConfig) -> anyhow::Result<Box<dyn SentimentOracle>> {
    match config.sentiment_url.as_deref() {
        Some(url) => {
            tracing::info!(url, "using HTTP sentiment service");
            Ok(Box::new(HttpOracle::new(url, config.sentiment_timeout_secs)?))
        }
        None => {
            tracing::info!("using built-in lexicon sentiment scorer");
            Ok(Box::new(LexiconOracle))
        }
    }
}

async fn build_gateway(
    config: &AppConfig,
    dry_run: bool,
) -> anyhow::Result<Box<dyn PersistenceGateway>> {
    if dry_run {
        return Ok(Box::new(DryRunGateway));
    }
    let pool = crate::db::connect(config).await?;
    tagpulse_db::ping(&pool).await?;
    Ok(Box::new(PgGateway::new(pool)))
}

/// Run discovery and analysis end to end.
///
/// Exits successfully once the run summary is printed, whatever the per-tag
/// outcomes were.
///
/// # Errors
///
/// Returns an error if credentials are missing, the database or sentiment
/// service cannot be set up, the browser fails to launch, or login fails.
pub(crate) async fn run_pipeline(config: &AppConfig, dry_run: bool) -> anyhow::Result<()> {
    let credentials = config.credentials()?;
    let gateway = build_gateway(config, dry_run).await?;
    let oracle = build_oracle(config)?;
    let session = BrowserSession::launch(&LaunchOptions::from_app_config(config)).await?;

    let run_id = RunId::generate();
    tracing::info!(run_id = %run_id, dry_run, "starting run");
    let deps = RunDeps {
        access: &session,
        oracle: oracle.as_ref(),
        gateway: gateway.as_ref(),
        pacer: &TokioPacer,
    };
    let mut orchestrator =
        Orchestrator::new(deps, config.pipeline.clone(), run_id, StdRng::from_os_rng());
    let outcome = orchestrator.run(&credentials).await;
    tracing::debug!(state = %orchestrator.state(), "orchestrator finished");
    drop(orchestrator);

    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "browser did not close cleanly");
    }

    let summary = outcome?;
    print_run_summary(&summary);
    Ok(())
}

/// Log in, run discovery, and print the ranked tags.
///
/// # Errors
///
/// Returns an error if credentials are missing, the browser fails to launch,
/// or login fails.
pub(crate) async fn run_discover(config: &AppConfig) -> anyhow::Result<()> {
    let credentials = config.credentials()?;
    let session = BrowserSession::launch(&LaunchOptions::from_app_config(config)).await?;

    let deps = RunDeps {
        access: &session,
        oracle: &LexiconOracle,
        gateway: &DryRunGateway,
        pacer: &TokioPacer,
    };
    let mut orchestrator = Orchestrator::new(
        deps,
        config.pipeline.clone(),
        RunId::generate(),
        StdRng::from_os_rng(),
    );
    let outcome = orchestrator.discover_only(&credentials).await;
    drop(orchestrator);

    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "browser did not close cleanly");
    }

    print_ranked(&outcome?);
    Ok(())
}
