use serde::{Deserialize, Serialize};

use crate::preprocess::FeatureMap;

#[derive(Debug, Clone, Deserialize)]
pub struct PatientFeatures {
    pub features: FeatureMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
