mod db;
mod pipeline;
mod results;
mod run;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tagpulse")]
#[command(about = "Discover trending Instagram hashtags and record their engagement and sentiment")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Discover, analyze and persist trending tags (the default)
    Run {
        /// Log records instead of writing them to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Discover and print ranked tags without analyzing them
    Discover,
    /// List persisted tag analyses, newest first
    Results {
        /// Only show records from this run
        #[arg(long)]
        run_id: Option<uuid::Uuid>,
        /// Maximum number of rows to show
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Database management
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Apply pending migrations
    Migrate,
    /// Check database connectivity
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = tagpulse_core::load_app_config()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command.unwrap_or(Commands::Run { dry_run: false }) {
        Commands::Run { dry_run } => run::run_pipeline(&config, dry_run).await,
        Commands::Discover => run::run_discover(&config).await,
        Commands::Results { run_id, limit } => {
            results::run_results(&config, run_id, i64::from(limit)).await
        }
        Commands::Db { command } => match command {
            DbCommands::Migrate => db::run_migrate(&config).await,
            DbCommands::Ping => db::run_ping(&config).await,
        },
    }
}
