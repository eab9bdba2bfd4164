use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{ApiResult, WebError};
use crate::state::AppState;

const DEFAULT_COUNTRY: &str = "United States";

#[derive(Debug, Deserialize, IntoParams)]
pub struct InstitutionListParams {
    pub country: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/institutions",
    params(InstitutionListParams),
    responses(
        (status = 200, description = "Institution names for the country, sorted", body = Vec<String>),
        (status = 500, description = "Upstream directory unavailable")
    ),
    tag = "institutions"
)]
pub async fn list_institutions(
    State(state): State<AppState>,
    Query(params): Query<InstitutionListParams>,
) -> ApiResult<Response> {
    let country = params.country.as_deref().unwrap_or(DEFAULT_COUNTRY);

    let names = state
        .institutions
        .names_for_country(country)
        .await
        .map_err(|e| {
            WebError::InternalServerError(format!("Institution directory lookup failed: {e}"))
        })?;

    Ok(Json(names).into_response())
}
