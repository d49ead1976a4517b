use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::types::ErrorResponse;
use crate::error::PredictError;

impl PredictError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PredictError::InvalidFeatureValue { .. }
            | PredictError::NonFiniteFeatureValue { .. }
            | PredictError::UnknownFeature(_)
            | PredictError::UnprocessableBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PredictError::InvalidImage(_) | PredictError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            PredictError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify an extractor failure by the status axum would have used.
    fn from_rejection(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::PAYLOAD_TOO_LARGE => PredictError::PayloadTooLarge(message),
            StatusCode::UNPROCESSABLE_ENTITY => PredictError::UnprocessableBody(message),
            _ => PredictError::InvalidRequest(message),
        }
    }

    /// Message safe to show a caller; server-side details stay in the logs.
    fn public_detail(&self) -> String {
        match self {
            e if e.is_client_error() => e.to_string(),
            PredictError::UnknownLabel { label, .. } => {
                format!("Model produced unrecognised label {label}")
            }
            _ => "Internal server error".to_string(),
        }
    }
}

impl From<JsonRejection> for PredictError {
    fn from(rejection: JsonRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for PredictError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for PredictError {
    fn from(err: MultipartError) -> Self {
        let status = err.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            return PredictError::PayloadTooLarge("upload exceeds the size limit".to_string());
        }
        Self::from_rejection(status, format!("malformed multipart body: {}", err.body_text()))
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            detail: self.public_detail(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_kinds_to_status_codes() {
        let invalid = PredictError::InvalidFeatureValue {
            feature: "radius_mean".into(),
            value: "\"abc\"".into(),
        };
        assert_eq!(invalid.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            PredictError::InvalidImage("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PredictError::UnknownLabel { stage: "label map", label: 3 }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            PredictError::PayloadTooLarge("upload".into()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn rejections_keep_their_status_class() {
        let missing = PredictError::from_rejection(
            StatusCode::UNPROCESSABLE_ENTITY,
            "missing field `features`".into(),
        );
        assert_eq!(missing.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(missing.public_detail().contains("features"));

        let media = PredictError::from_rejection(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected request with `Content-Type: application/json`".into(),
        );
        assert_eq!(media.status_code(), StatusCode::BAD_REQUEST);

        let large = PredictError::from_rejection(StatusCode::PAYLOAD_TOO_LARGE, "too big".into());
        assert!(matches!(large, PredictError::PayloadTooLarge(_)));
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let err = PredictError::Internal("PCA input dim mismatch: got 10".into());
        assert_eq!(err.public_detail(), "Internal server error");

        let io = PredictError::Io(std::io::Error::other("/srv/models/secret.json"));
        assert!(!io.public_detail().contains("secret"));
    }
}
