use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the prediction services
#[derive(Error, Debug)]
pub enum PredictError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Request validation errors
    #[error("Invalid value for feature '{feature}': {value}")]
    InvalidFeatureValue { feature: String, value: String },

    #[error("Non-finite value for feature '{feature}': {value}")]
    NonFiniteFeatureValue { feature: String, value: String },

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unprocessable request body: {0}")]
    UnprocessableBody(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    // Artifact / model errors
    #[error("Unknown label {label} at {stage}")]
    UnknownLabel { stage: &'static str, label: i64 },

    #[error("Failed to load artifact {}: {reason}", path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PredictError {
    pub fn artifact(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PredictError::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Errors caused by the caller's input rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PredictError::InvalidFeatureValue { .. }
                | PredictError::NonFiniteFeatureValue { .. }
                | PredictError::UnknownFeature(_)
                | PredictError::InvalidImage(_)
                | PredictError::InvalidRequest(_)
                | PredictError::UnprocessableBody(_)
                | PredictError::PayloadTooLarge(_)
        )
    }
}

/// Result type alias for PredictError
pub type Result<T> = std::result::Result<T, PredictError>;
