use axum::{Router, routing::get};

use crate::state::AppState;

use super::handlers::list_institutions;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_institutions))
}
