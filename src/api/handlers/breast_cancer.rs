use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::info;

use crate::api::{state::AppState, types::PatientFeatures};
use crate::error::PredictError;
use crate::services::{BreastCancerPrediction, BreastCancerService};

/// POST /predict
///
/// Missing features are filled from the training means before scaling.
pub async fn predict_breast_cancer(
    State(state): State<AppState<BreastCancerService>>,
    payload: Result<Json<PatientFeatures>, JsonRejection>,
) -> Result<Json<BreastCancerPrediction>, PredictError> {
    let outcome = payload
        .map_err(PredictError::from)
        .and_then(|Json(request)| {
            let prediction = state.service.predict(&request.features)?;
            Ok((request.features.len(), prediction))
        });
    state.metrics.record(&outcome);

    let (supplied, prediction) = outcome?;
    info!(
        supplied,
        prediction = ?prediction.prediction,
        benign_probability = prediction.benign_probability,
        "breast cancer prediction served"
    );
    Ok(Json(prediction))
}
