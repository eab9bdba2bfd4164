use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use storage::dto::lift::{LiftResponse, SubmitLiftRequest, UpdateLiftRequest};
use storage::models::WeightUnit;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Identity;
use crate::state::AppState;

use super::services;

#[derive(Debug, Deserialize, IntoParams)]
pub struct DisplayUnitParams {
    #[serde(default)]
    pub unit: WeightUnit,
}

#[utoipa::path(
    post,
    path = "/api/lifts",
    request_body = SubmitLiftRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Lift recorded", body = LiftResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "lifts"
)]
pub async fn submit_lift(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<SubmitLiftRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let record = services::submit_lift(&state.db, &state.feed, &identity, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(LiftResponse::from_record(record, req.unit)),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/lifts/mine",
    params(DisplayUnitParams),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The caller's lifts, newest first", body = Vec<LiftResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "lifts"
)]
pub async fn list_own_lifts(
    State(state): State<AppState>,
    identity: Identity,
    Query(params): Query<DisplayUnitParams>,
) -> Result<Response, WebError> {
    let lifts = services::list_own_lifts(&state.db, &identity).await?;

    let response: Vec<LiftResponse> = lifts
        .into_iter()
        .map(|record| LiftResponse::from_record(record, params.unit))
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    put,
    path = "/api/lifts/{lift_id}",
    params(
        ("lift_id" = Uuid, Path, description = "Lift identifier")
    ),
    request_body = UpdateLiftRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Lift updated (or recreated if it was missing)", body = LiftResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "lifts"
)]
pub async fn update_lift(
    State(state): State<AppState>,
    identity: Identity,
    Path(lift_id): Path<Uuid>,
    Json(req): Json<UpdateLiftRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let record = services::update_lift(&state.db, &state.feed, &identity, lift_id, &req).await?;

    Ok(Json(LiftResponse::from_record(record, req.unit)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/lifts/{lift_id}",
    params(
        ("lift_id" = Uuid, Path, description = "Lift identifier")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Lift deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Lift not found")
    ),
    tag = "lifts"
)]
pub async fn delete_lift(
    State(state): State<AppState>,
    identity: Identity,
    Path(lift_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_lift(&state.db, &state.feed, &identity, lift_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
