use axum::{
    Json,
    extract::{Query, State},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use storage::dto::leaderboard::{
    GlobalLeaderboardParams, InstitutionLeaderboardParams, LeaderboardEntry, LeaderboardQuery,
};
use storage::services::feed::LeaderboardFeed;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::{Stream, StreamExt};

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/leaderboard/global",
    params(GlobalLeaderboardParams),
    responses(
        (status = 200, description = "Global leaderboard, best lift per user", body = Vec<LeaderboardEntry>)
    ),
    tag = "leaderboard"
)]
pub async fn global_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<GlobalLeaderboardParams>,
) -> Result<Response, WebError> {
    let entries = services::snapshot(&state.db, &LeaderboardQuery::global(params.unit)).await?;

    Ok(Json(entries).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leaderboard/institution",
    params(InstitutionLeaderboardParams),
    responses(
        (status = 200, description = "Leaderboard restricted to one institution", body = Vec<LeaderboardEntry>)
    ),
    tag = "leaderboard"
)]
pub async fn institution_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<InstitutionLeaderboardParams>,
) -> Result<Response, WebError> {
    let query = LeaderboardQuery::institution(params.name, params.unit);
    let entries = services::snapshot(&state.db, &query).await?;

    Ok(Json(entries).into_response())
}

/// Server-sent event stream of the global leaderboard. Emits one
/// `leaderboard` event with the current snapshot on connect and another
/// after every change to the lift set.
#[utoipa::path(
    get,
    path = "/api/leaderboard/global/stream",
    params(GlobalLeaderboardParams),
    responses(
        (status = 200, description = "SSE stream of leaderboard snapshots")
    ),
    tag = "leaderboard"
)]
pub async fn global_leaderboard_stream(
    State(state): State<AppState>,
    Query(params): Query<GlobalLeaderboardParams>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    event_stream(&state.feed, LeaderboardQuery::global(params.unit))
}

#[utoipa::path(
    get,
    path = "/api/leaderboard/institution/stream",
    params(InstitutionLeaderboardParams),
    responses(
        (status = 200, description = "SSE stream of leaderboard snapshots")
    ),
    tag = "leaderboard"
)]
pub async fn institution_leaderboard_stream(
    State(state): State<AppState>,
    Query(params): Query<InstitutionLeaderboardParams>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    event_stream(&state.feed, LeaderboardQuery::institution(params.name, params.unit))
}

/// Bridge a feed subscription into an SSE body. The subscription handle is
/// moved into the stream closure so it stays registered exactly as long as
/// the client connection; dropping the stream cancels it.
fn event_stream(
    feed: &LeaderboardFeed,
    query: LeaderboardQuery,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>> + use<>> {
    let (tx, rx) = mpsc::unbounded_channel::<Vec<LeaderboardEntry>>();

    let subscription = feed.subscribe(query, move |entries| {
        let _ = tx.send(entries);
    });

    let stream = UnboundedReceiverStream::new(rx).map(move |entries| {
        let _keep_subscribed = &subscription;
        Event::default().event("leaderboard").json_data(&entries)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
