//! One-off import of the two legacy lift table shapes into the current
//! schema. Safe to re-run; already-imported rows are skipped.

use anyhow::Context;
use storage::Database;
use storage::services::migration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").context("Cannot load DATABASE_URL env variable")?;

    let db = Database::new(&database_url)
        .await
        .context("Failed to initialize database")?;

    db.run_migrations()
        .await
        .context("Failed to run migrations")?;

    tracing::info!("Starting legacy data migration");

    let report = migration::migrate_legacy_shapes(db.pool())
        .await
        .context("Legacy migration failed")?;

    tracing::info!(
        users_created = report.users_created,
        lifts_migrated = report.lifts_migrated,
        lifts_skipped = report.lifts_skipped,
        "Legacy data migration finished"
    );

    Ok(())
}
