//! Handwritten-character recognition from an uploaded image.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::CharacterConfig;
use crate::error::{PredictError, Result};
use crate::ml::{self, Classifier, FeatureTransform, LabelEncoder, LabelMap};
use crate::preprocess::ImageNormalizer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterPrediction {
    pub encoded_class: i64,
    pub emnist_label: i64,
    pub character: String,
}

pub struct CharacterService {
    normalizer: ImageNormalizer,
    pca: Arc<dyn FeatureTransform>,
    model: Arc<dyn Classifier>,
    encoder: LabelEncoder,
    label_map: LabelMap,
}

impl CharacterService {
    /// Load every artifact named in the config; any failure is fatal.
    pub fn load(config: &CharacterConfig) -> Result<Self> {
        let normalizer = ImageNormalizer::new(
            config.image_width,
            config.image_height,
            config.resize_filter,
        )?;
        let pca = ml::load_pca(&config.pca_path)?;
        let model = ml::load_classifier(&config.model_path)?;
        let encoder = ml::load_label_encoder(&config.label_encoder_path)?;
        let label_map = ml::load_label_map(&config.label_map_path)?;

        let service = Self::new(normalizer, Arc::new(pca), model, encoder, label_map)
            .map_err(|e| PredictError::artifact(&config.model_path, e))?;
        info!(
            width = config.image_width,
            height = config.image_height,
            filter = ?config.resize_filter,
            "character service ready"
        );
        Ok(service)
    }

    /// Wire up already-loaded artifacts, checking they fit together.
    pub fn new(
        normalizer: ImageNormalizer,
        pca: Arc<dyn FeatureTransform>,
        model: Arc<dyn Classifier>,
        encoder: LabelEncoder,
        label_map: LabelMap,
    ) -> std::result::Result<Self, String> {
        if pca.input_dim() != normalizer.output_len() {
            return Err(format!(
                "PCA expects {} pixels, images normalize to {}",
                pca.input_dim(),
                normalizer.output_len()
            ));
        }
        if model.input_dim() != pca.output_dim() {
            return Err(format!(
                "classifier expects {} inputs, PCA produces {}",
                model.input_dim(),
                pca.output_dim()
            ));
        }

        let unmapped: Vec<i64> = encoder
            .classes
            .iter()
            .copied()
            .filter(|label| !label_map.contains(*label))
            .collect();
        if !unmapped.is_empty() {
            warn!(labels = ?unmapped, "label encoder classes missing from the label map");
        }

        Ok(Self {
            normalizer,
            pca,
            model,
            encoder,
            label_map,
        })
    }

    pub fn predict(&self, image: &[u8]) -> Result<CharacterPrediction> {
        let pixels = self.normalizer.normalize_bytes(image)?;
        let projected = self.pca.transform(&pixels)?;

        let encoded_class = self.model.predict(&projected)?;
        let emnist_label = self.encoder.inverse_transform(encoded_class)?;
        let character = self.label_map.resolve(emnist_label)?.to_string();

        debug!(encoded_class, emnist_label, %character, "character prediction");
        Ok(CharacterPrediction {
            encoded_class,
            emnist_label,
            character,
        })
    }
}
