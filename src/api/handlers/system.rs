use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::api::{state::AppState, types::MessageResponse};

/// GET /
pub async fn root<S>(State(state): State<AppState<S>>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: state.banner.to_string(),
    })
}

/// Liveness probe - artifacts are loaded before the listener binds, so a
/// running process is a ready one.
pub async fn liveness() -> impl IntoResponse {
    StatusCode::OK
}

/// Prometheus metrics endpoint
pub async fn metrics<S>(State(state): State<AppState<S>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.prometheus(),
    )
}
