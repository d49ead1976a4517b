//! Dense neural network classifiers (CPU-only).
//!
//! Small MLPs exported to JSON. The final layer either emits one sigmoid
//! score (binary) or one score per class; a `softmax` activation on the last
//! layer turns scores into probabilities directly, otherwise they are
//! normalized here.

use serde::{Deserialize, Serialize};

use super::linear::{sigmoid, softmax};
use super::traits::{check_input_len, Classifier};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Tanh,
    Sigmoid,
    Softmax,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Weights shape: [out_dim][in_dim]
    pub weights: Vec<Vec<f64>>,
    /// Bias shape: [out_dim]
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    fn out_dim(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, x: &[f64]) -> Vec<f64> {
        let z: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| b + row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>())
            .collect();

        match self.activation {
            Activation::Linear => z,
            Activation::Relu => z.into_iter().map(|v| v.max(0.0)).collect(),
            Activation::Tanh => z.into_iter().map(f64::tanh).collect(),
            Activation::Sigmoid => z.into_iter().map(sigmoid).collect(),
            Activation::Softmax => softmax(&z),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseClassifier {
    /// Class labels, in output order.
    pub classes: Vec<i64>,

    /// Expected input dimension.
    pub input_dim: usize,

    pub layers: Vec<DenseLayer>,

    /// Optional free-form metadata (versioning, training info, etc).
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl DenseClassifier {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.input_dim == 0 {
            return Err("input_dim must be > 0".to_string());
        }
        if self.layers.is_empty() {
            return Err("layers must not be empty".to_string());
        }
        if self.classes.len() < 2 {
            return Err(format!("need at least 2 classes, got {}", self.classes.len()));
        }

        let mut expected_in = self.input_dim;
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.out_dim() == 0 {
                return Err(format!("layer[{idx}] out_dim must be > 0"));
            }
            if layer.bias.len() != layer.out_dim() {
                return Err(format!(
                    "layer[{idx}] bias len {} != out_dim {}",
                    layer.bias.len(),
                    layer.out_dim()
                ));
            }
            for (r, row) in layer.weights.iter().enumerate() {
                if row.len() != expected_in {
                    return Err(format!(
                        "layer[{idx}] weights row {r} len {} != expected in_dim {expected_in}",
                        row.len()
                    ));
                }
                if row.iter().any(|v| !v.is_finite()) {
                    return Err(format!("layer[{idx}] weights contain non-finite values"));
                }
            }
            if layer.bias.iter().any(|v| !v.is_finite()) {
                return Err(format!("layer[{idx}] bias contain non-finite values"));
            }
            expected_in = layer.out_dim();
        }

        let binary_head = self.classes.len() == 2 && expected_in == 1;
        if !binary_head && expected_in != self.classes.len() {
            return Err(format!(
                "output_dim {expected_in} does not match {} classes",
                self.classes.len()
            ));
        }
        Ok(())
    }

    fn output_activation(&self) -> Activation {
        self.layers
            .last()
            .map(|l| l.activation)
            .unwrap_or_default()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.layers
            .iter()
            .fold(input.to_vec(), |x, layer| layer.forward(&x))
    }
}

impl Classifier for DenseClassifier {
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
        check_input_len("DenseClassifier", features, self.input_dim)?;
        let out = self.forward(features);

        if out.len() == 1 {
            let p = match self.output_activation() {
                Activation::Sigmoid => out[0],
                _ => sigmoid(out[0]),
            };
            return Ok(vec![1.0 - p, p]);
        }

        Ok(match self.output_activation() {
            Activation::Softmax => out,
            _ => softmax(&out),
        })
    }
}
