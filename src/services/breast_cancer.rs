//! Breast-cancer classification from tabular features.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::BreastCancerConfig;
use crate::error::{PredictError, Result};
use crate::ml::{self, Classifier, FeatureTransform};
use crate::preprocess::{FeatureMap, FeatureMeanTable};

/// Class id the model uses for benign tumours.
pub const BENIGN_CLASS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnosis {
    Benign,
    Malignant,
}

impl Diagnosis {
    pub fn from_class(class: i64) -> Self {
        if class == BENIGN_CLASS {
            Diagnosis::Benign
        } else {
            Diagnosis::Malignant
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreastCancerPrediction {
    pub prediction: Diagnosis,
    pub raw_class: i64,
    pub benign_probability: f64,
}

/// Loaded artifacts plus the reconcile -> scale -> classify pipeline.
pub struct BreastCancerService {
    means: FeatureMeanTable,
    scaler: Arc<dyn FeatureTransform>,
    model: Arc<dyn Classifier>,
    benign_index: usize,
    reject_unknown_features: bool,
}

impl BreastCancerService {
    /// Load every artifact named in the config; any failure is fatal.
    pub fn load(config: &BreastCancerConfig) -> Result<Self> {
        let means = FeatureMeanTable::load(&config.feature_means_path)?;
        let scaler = ml::load_scaler(&config.scaler_path)?;
        if let Some(names) = &scaler.feature_names {
            if !names.iter().map(String::as_str).eq(means.names()) {
                return Err(PredictError::artifact(
                    &config.scaler_path,
                    "scaler feature order differs from the feature mean table",
                ));
            }
        }
        let model = ml::load_classifier(&config.model_path)?;

        let service = Self::new(means, Arc::new(scaler), model)
            .map_err(|e| PredictError::artifact(&config.model_path, e))?
            .with_strict_features(config.reject_unknown_features);
        info!(features = service.means.len(), "breast cancer service ready");
        Ok(service)
    }

    /// Wire up already-loaded artifacts, checking they fit together.
    pub fn new(
        means: FeatureMeanTable,
        scaler: Arc<dyn FeatureTransform>,
        model: Arc<dyn Classifier>,
    ) -> std::result::Result<Self, String> {
        if scaler.input_dim() != means.len() {
            return Err(format!(
                "scaler expects {} features, mean table has {}",
                scaler.input_dim(),
                means.len()
            ));
        }
        if model.input_dim() != scaler.output_dim() {
            return Err(format!(
                "classifier expects {} inputs, scaler produces {}",
                model.input_dim(),
                scaler.output_dim()
            ));
        }
        let benign_index = model
            .class_index(BENIGN_CLASS)
            .ok_or_else(|| format!("classifier has no class {BENIGN_CLASS}"))?;

        Ok(Self {
            means,
            scaler,
            model,
            benign_index,
            reject_unknown_features: false,
        })
    }

    pub fn with_strict_features(mut self, strict: bool) -> Self {
        self.reject_unknown_features = strict;
        self
    }

    pub fn feature_means(&self) -> &FeatureMeanTable {
        &self.means
    }

    pub fn predict(&self, features: &FeatureMap) -> Result<BreastCancerPrediction> {
        let reconciled = self.means.reconcile(features, self.reject_unknown_features)?;
        let scaled = self.scaler.transform(&reconciled)?;

        let raw_class = self.model.predict(&scaled)?;
        let proba = self.model.predict_proba(&scaled)?;
        let benign_probability = proba.get(self.benign_index).copied().ok_or_else(|| {
            PredictError::Internal(format!(
                "classifier returned {} probabilities, expected index {}",
                proba.len(),
                self.benign_index
            ))
        })?;

        debug!(raw_class, benign_probability, "breast cancer prediction");
        Ok(BreastCancerPrediction {
            prediction: Diagnosis::from_class(raw_class),
            raw_class,
            benign_probability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::traits::MockClassifier;
    use crate::ml::StandardScaler;
    use crate::preprocess::FeatureMean;
    use serde_json::json;

    fn means() -> FeatureMeanTable {
        FeatureMeanTable::new(vec![
            FeatureMean { name: "radius_mean".into(), mean: 14.0 },
            FeatureMean { name: "texture_mean".into(), mean: 19.0 },
        ])
        .unwrap()
    }

    fn scaler() -> Arc<dyn FeatureTransform> {
        Arc::new(StandardScaler {
            mean: vec![14.0, 19.0],
            scale: vec![2.0, 4.0],
            feature_names: None,
        })
    }

    fn features(value: serde_json::Value) -> FeatureMap {
        serde_json::from_value(value).unwrap()
    }

    fn mock_model(class: i64, proba: Vec<f64>) -> MockClassifier {
        let mut model = MockClassifier::new();
        model.expect_input_dim().return_const(2usize);
        model
            .expect_class_index()
            .returning(|c| [0i64, 1].iter().position(|k| *k == c));
        model.expect_predict().returning(move |_| Ok(class));
        model
            .expect_predict_proba()
            .returning(move |_| Ok(proba.clone()));
        model
    }

    #[test]
    fn scaled_vector_reaches_the_classifier() {
        let mut model = MockClassifier::new();
        model.expect_input_dim().return_const(2usize);
        model
            .expect_class_index()
            .returning(|c| [0i64, 1].iter().position(|k| *k == c));
        model
            .expect_predict()
            .withf(|x| x.to_vec() == vec![1.0, 0.0])
            .times(1)
            .returning(|_| Ok(1));
        model
            .expect_predict_proba()
            .withf(|x| x.to_vec() == vec![1.0, 0.0])
            .times(1)
            .returning(|_| Ok(vec![0.2, 0.8]));

        let service = BreastCancerService::new(means(), scaler(), Arc::new(model)).unwrap();
        let out = service
            .predict(&features(json!({"radius_mean": 16.0})))
            .unwrap();

        assert_eq!(out.prediction, Diagnosis::Benign);
        assert_eq!(out.raw_class, 1);
        assert_eq!(out.benign_probability, 0.8);
    }

    #[test]
    fn class_zero_is_malignant() {
        let model = mock_model(0, vec![0.9, 0.1]);
        let service = BreastCancerService::new(means(), scaler(), Arc::new(model)).unwrap();

        let out = service.predict(&FeatureMap::new()).unwrap();
        assert_eq!(out.prediction, Diagnosis::Malignant);
        assert_eq!(out.raw_class, 0);
        assert_eq!(out.benign_probability, 0.1);
    }

    #[test]
    fn malformed_value_fails_before_inference() {
        let mut model = MockClassifier::new();
        model.expect_input_dim().return_const(2usize);
        model.expect_class_index().returning(|c| (c == 1).then_some(1));
        model.expect_predict().never();
        model.expect_predict_proba().never();

        let service = BreastCancerService::new(means(), scaler(), Arc::new(model)).unwrap();
        let err = service
            .predict(&features(json!({"radius_mean": "abc"})))
            .unwrap_err();
        assert!(matches!(err, PredictError::InvalidFeatureValue { .. }));
    }

    #[test]
    fn rejects_mismatched_artifacts() {
        let mut model = MockClassifier::new();
        model.expect_input_dim().return_const(3usize);
        model.expect_class_index().returning(|_| Some(1));
        assert!(BreastCancerService::new(means(), scaler(), Arc::new(model)).is_err());

        let mut no_benign = MockClassifier::new();
        no_benign.expect_input_dim().return_const(2usize);
        no_benign.expect_class_index().returning(|_| None);
        assert!(BreastCancerService::new(means(), scaler(), Arc::new(no_benign)).is_err());
    }

    #[test]
    fn diagnosis_serializes_as_label() {
        let out = BreastCancerPrediction {
            prediction: Diagnosis::Benign,
            raw_class: 1,
            benign_probability: 0.75,
        };
        assert_eq!(
            serde_json::to_value(out).unwrap(),
            json!({"prediction": "Benign", "raw_class": 1, "benign_probability": 0.75})
        );
    }
}
