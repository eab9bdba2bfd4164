use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::dto::lift::LiftResponse;
use storage::dto::user::{SearchQuery, UpsertUserRequest, UserResponse, UserSummary};
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Identity;
use crate::state::AppState;

use super::services;
use crate::features::lifts::handlers::DisplayUnitParams;

const SEARCH_LIMIT: i64 = 10;

#[utoipa::path(
    get,
    path = "/api/users/me",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The caller's profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No profile yet")
    ),
    tag = "users"
)]
pub async fn get_me(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Response, WebError> {
    let user = services::find_user(&state.db, &identity.user_id)
        .await?
        .ok_or(WebError::NotFound)?;

    Ok(Json(UserResponse::from(user)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/users/me",
    request_body = UpsertUserRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Profile created or replaced", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users"
)]
pub async fn put_me(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<UpsertUserRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let user = services::upsert_profile(&state.db, &identity.user_id, &req).await?;

    Ok(Json(UserResponse::from(user)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Users whose display name starts with the query", body = Vec<UserSummary>)
    ),
    tag = "users"
)]
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, WebError> {
    let users = services::search_users(&state.db, &query.q, SEARCH_LIMIT).await?;

    let summaries: Vec<UserSummary> = users.into_iter().map(UserSummary::from).collect();

    Ok(Json(summaries).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{display_name}/lifts",
    params(
        ("display_name" = String, Path, description = "Exact display name"),
        DisplayUnitParams
    ),
    responses(
        (status = 200, description = "The named user's lifts, newest first", body = Vec<LiftResponse>),
        (status = 404, description = "No user with that display name")
    ),
    tag = "users"
)]
pub async fn lifts_by_display_name(
    State(state): State<AppState>,
    Path(display_name): Path<String>,
    Query(params): Query<DisplayUnitParams>,
) -> Result<Response, WebError> {
    let lifts = services::lifts_by_display_name(&state.db, &display_name)
        .await?
        .ok_or(WebError::NotFound)?;

    let response: Vec<LiftResponse> = lifts
        .into_iter()
        .map(|record| LiftResponse::from_record(record, params.unit))
        .collect();

    Ok(Json(response).into_response())
}
