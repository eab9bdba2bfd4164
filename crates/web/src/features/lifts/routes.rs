use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::handlers::{delete_lift, list_own_lifts, submit_lift, update_lift};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_lift))
        .route("/mine", get(list_own_lifts))
        .route("/:lift_id", put(update_lift).delete(delete_lift))
}
