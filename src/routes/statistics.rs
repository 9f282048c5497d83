use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{CatalogSummary, ListenerId, ListenerStatistics, TrackId, TrackStatistics},
    services::statistics,
};

use super::AppState;

pub async fn track_stats(
    State(state): State<AppState>,
    track_id: Result<Path<TrackId>, PathRejection>,
) -> AppResult<Json<TrackStatistics>> {
    let Path(track_id) = track_id?;
    let stats = statistics::track_statistics(state.catalog.clone(), &state.engine, track_id).await?;
    Ok(Json(stats))
}

pub async fn user_stats(
    State(state): State<AppState>,
    listener_id: Result<Path<ListenerId>, PathRejection>,
) -> AppResult<Json<ListenerStatistics>> {
    let Path(listener_id) = listener_id?;
    let stats =
        statistics::listener_statistics(state.catalog.clone(), &state.engine, listener_id).await?;
    Ok(Json(stats))
}

pub async fn genres(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(statistics::genres(state.catalog.clone()).await?))
}

pub async fn summary(State(state): State<AppState>) -> AppResult<Json<CatalogSummary>> {
    Ok(Json(statistics::summary(state.catalog.clone()).await?))
}
