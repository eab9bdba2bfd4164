use axum::extract::FromRef;
use storage::Database;
use storage::services::feed::LeaderboardFeed;

use crate::features::institutions::InstitutionDirectory;
use crate::middleware::auth::IdentityTokens;

/// Everything the handlers need, cloned per request by axum.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub feed: LeaderboardFeed,
    pub identities: IdentityTokens,
    pub institutions: InstitutionDirectory,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for LeaderboardFeed {
    fn from_ref(state: &AppState) -> Self {
        state.feed.clone()
    }
}

impl FromRef<AppState> for InstitutionDirectory {
    fn from_ref(state: &AppState) -> Self {
        state.institutions.clone()
    }
}
