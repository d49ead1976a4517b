use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tracing::info;

use crate::api::state::AppState;
use crate::error::{PredictError, Result};
use crate::services::{CharacterPrediction, CharacterService};

/// Multipart part carrying the image.
pub const UPLOAD_FIELD: &str = "file";

/// POST /predict
///
/// Expects a multipart body with the image in the `file` part.
pub async fn predict_character(
    State(state): State<AppState<CharacterService>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<Json<CharacterPrediction>, PredictError> {
    let upload = match multipart {
        Ok(multipart) => read_upload(multipart).await,
        Err(rejection) => Err(rejection.into()),
    };
    let outcome = match upload {
        Ok(image) => {
            let service = state.service.clone();
            tokio::task::spawn_blocking(move || service.predict(&image))
                .await
                .unwrap_or_else(|e| Err(PredictError::Internal(format!("prediction task failed: {e}"))))
        }
        Err(e) => Err(e),
    };
    state.metrics.record(&outcome);

    let prediction = outcome?;
    info!(
        encoded_class = prediction.encoded_class,
        character = %prediction.character,
        "character prediction served"
    );
    Ok(Json(prediction))
}

async fn read_upload(mut multipart: Multipart) -> Result<Bytes> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            return Ok(field.bytes().await?);
        }
    }
    Err(PredictError::InvalidRequest(format!(
        "multipart body has no '{UPLOAD_FIELD}' part"
    )))
}
