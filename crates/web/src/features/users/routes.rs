use axum::{
    Router,
    routing::get,
};

use crate::state::AppState;

use super::handlers::{get_me, lifts_by_display_name, put_me, search_users};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).put(put_me))
        .route("/search", get(search_users))
        .route("/:display_name/lifts", get(lifts_by_display_name))
}
