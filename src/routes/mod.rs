use axum::{
    http::{StatusCode, Uri},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    middleware::{make_span_with_request_id, request_id_middleware},
};

pub mod recommendations;
pub mod state;
pub mod statistics;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .fallback(route_not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/recommendations/similar-tracks",
            get(recommendations::similar_tracks),
        )
        .route(
            "/recommendations/personalized",
            get(recommendations::personalized),
        )
        .route("/recommendations/trending", get(recommendations::trending))
        .route("/tracks/:id/stats", get(statistics::track_stats))
        .route("/users/:id/stats", get(statistics::user_stats))
        .route("/genres", get(statistics::genres))
        .route("/stats", get(statistics::summary))
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
