use axum::{Router, routing::get};

use crate::state::AppState;

use super::handlers::{
    global_leaderboard, global_leaderboard_stream, institution_leaderboard,
    institution_leaderboard_stream,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/global", get(global_leaderboard))
        .route("/global/stream", get(global_leaderboard_stream))
        .route("/institution", get(institution_leaderboard))
        .route("/institution/stream", get(institution_leaderboard_stream))
}
