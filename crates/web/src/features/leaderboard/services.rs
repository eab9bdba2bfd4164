use storage::Database;
use storage::dto::leaderboard::{LeaderboardEntry, LeaderboardQuery};
use storage::error::Result;
use storage::repository::LiftRepository;
use storage::services::ranking;

/// One-shot leaderboard view: each user's best lift, filtered and ranked.
pub async fn snapshot(db: &Database, query: &LeaderboardQuery) -> Result<Vec<LeaderboardEntry>> {
    let best = LiftRepository::new(db.pool()).best_per_user().await?;

    Ok(ranking::rank(best, query.institution.as_deref(), query.unit))
}
