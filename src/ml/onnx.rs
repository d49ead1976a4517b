//! ONNX classifier wrapper (pure Rust via `tract-onnx`).
//!
//! The graph must take a `[1, input_dim]` f32 tensor and emit one
//! probability per class as its first output.

use std::path::Path;

use tract_onnx::prelude::*;

use super::traits::{check_input_len, Classifier};
use crate::error::{PredictError, Result};

pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
    input_dim: usize,
    classes: Vec<i64>,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("input_dim", &self.input_dim)
            .field("classes", &self.classes)
            .finish()
    }
}

impl OnnxClassifier {
    /// Load a graph and specialize it to a fixed `[1, input_dim]` f32 input.
    pub fn load(path: &Path, input_dim: usize, classes: Vec<i64>) -> Result<Self> {
        if input_dim == 0 {
            return Err(PredictError::artifact(path, "input_dim must be > 0"));
        }
        if classes.len() < 2 {
            return Err(PredictError::artifact(path, "need at least 2 classes"));
        }

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| {
                m.with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), tvec!(1, input_dim)))
            })
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| PredictError::artifact(path, format!("onnx load failed: {e}")))?;

        let model = Self {
            plan,
            input_dim,
            classes,
        };

        // Probe once so a graph with the wrong head fails at startup.
        let probe = model
            .run(&vec![0.0; input_dim])
            .map_err(|e| PredictError::artifact(path, e))?;
        if probe.len() != model.classes.len() {
            return Err(PredictError::artifact(
                path,
                format!(
                    "onnx output has {} values, expected {} classes",
                    probe.len(),
                    model.classes.len()
                ),
            ));
        }

        Ok(model)
    }

    fn run(&self, input: &[f64]) -> Result<Vec<f64>> {
        let values: Vec<f32> = input.iter().map(|v| *v as f32).collect();
        let tensor = tract_ndarray::Array2::<f32>::from_shape_vec((1, self.input_dim), values)
            .map_err(|e| PredictError::Internal(format!("onnx input reshape failed: {e}")))?
            .into_tvalue();

        let outputs = self
            .plan
            .run(tvec!(tensor))
            .map_err(|e| PredictError::Internal(format!("onnx run failed: {e}")))?;
        let first = outputs
            .first()
            .ok_or_else(|| PredictError::Internal("onnx produced no outputs".to_string()))?;

        let arr = first
            .to_array_view::<f32>()
            .map_err(|e| PredictError::Internal(format!("onnx output decode failed: {e}")))?;

        Ok(arr.iter().map(|v| f64::from(*v)).collect())
    }
}

impl Classifier for OnnxClassifier {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn class_index(&self, class: i64) -> Option<usize> {
        self.classes.iter().position(|c| *c == class)
    }

    fn classes(&self) -> Vec<i64> {
        self.classes.clone()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        check_input_len("OnnxClassifier", features, self.input_dim)?;
        self.run(features)
    }
}
