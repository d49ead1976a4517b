use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{handlers, state::AppState};
use crate::services::{BreastCancerService, CharacterService};

pub const BREAST_CANCER_BANNER: &str = "Breast Cancer Prediction API is running";
pub const CHARACTER_BANNER: &str = "Handwritten Character Recognition API is running";

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_breast_cancer_router(state: AppState<BreastCancerService>) -> Router {
    Router::new()
        .route("/", get(handlers::root::<BreastCancerService>))
        .route("/healthz", get(handlers::liveness))
        .route("/metrics", get(handlers::metrics::<BreastCancerService>))
        .route("/predict", post(handlers::predict_breast_cancer))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors())
}

pub fn create_character_router(
    state: AppState<CharacterService>,
    max_upload_bytes: usize,
) -> Router {
    Router::new()
        .route("/", get(handlers::root::<CharacterService>))
        .route("/healthz", get(handlers::liveness))
        .route("/metrics", get(handlers::metrics::<CharacterService>))
        .route("/predict", post(handlers::predict_character))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
}
