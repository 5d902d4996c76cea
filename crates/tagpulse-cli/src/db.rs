//! Database management command handlers.

use tagpulse_core::AppConfig;
use tagpulse_db::PoolConfig;

pub(crate) async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let url = config.require_database_url()?;
    let pool = tagpulse_db::connect_pool(url, PoolConfig::from_app_config(config)).await?;
    Ok(pool)
}

/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub(crate) async fn run_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let applied = tagpulse_db::run_migrations(&pool).await?;
    println!("applied {applied} migrations");
    Ok(())
}

/// # Errors
///
/// Returns an error if the database is unreachable.
pub(crate) async fn run_ping(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    tagpulse_db::ping(&pool).await?;
    println!("database reachable");
    Ok(())
}
