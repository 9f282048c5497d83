use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{ListenerId, Recommendation, TrackId, TrendingTrack},
    services::recommendations,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SimilarTracksQuery {
    pub track_id: TrackId,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PersonalizedQuery {
    pub user_id: ListenerId,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub limit: Option<usize>,
}

/// Handler for content-based recommendations
pub async fn similar_tracks(
    State(state): State<AppState>,
    params: Result<Query<SimilarTracksQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let Query(params) = params?;
    let limit = state.engine.config().limits.resolve(params.limit)?;
    let results = recommendations::similar_tracks(
        state.catalog.clone(),
        &state.engine,
        params.track_id,
        limit,
    )
    .await?;
    Ok(Json(results))
}

/// Handler for personalized recommendations
pub async fn personalized(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<PersonalizedQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let Query(params) = params?;
    let limit = state.engine.config().limits.resolve(params.limit)?;
    tracing::debug!(%request_id, user_id = params.user_id, limit, "Personalized request");

    let results = recommendations::personalized(
        state.catalog.clone(),
        &state.engine,
        params.user_id,
        limit,
        Utc::now(),
    )
    .await?;
    Ok(Json(results))
}

/// Handler for trending tracks
pub async fn trending(
    State(state): State<AppState>,
    params: Result<Query<TrendingQuery>, QueryRejection>,
) -> AppResult<Json<Vec<TrendingTrack>>> {
    let Query(params) = params?;
    let limit = state.engine.config().trending_limits.resolve(params.limit)?;
    let results = recommendations::trending_cached(
        state.catalog.clone(),
        &state.engine,
        state.cache.as_ref(),
        state.cache_ttl,
        limit,
    )
    .await?;
    Ok(Json(results))
}
