use serde::{Deserialize, Serialize};

use super::traits::{check_input_len, FeatureTransform};
use crate::error::Result;

/// Fitted z-score standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    /// Column names the scaler was fit against, when exported.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.mean.is_empty() {
            return Err("mean must not be empty".to_string());
        }
        if self.scale.len() != self.mean.len() {
            return Err(format!(
                "scale length {} != mean length {}",
                self.scale.len(),
                self.mean.len()
            ));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err("mean and scale must be finite".to_string());
        }
        if self.scale.iter().any(|v| *v < 0.0) {
            return Err("scale must be non-negative".to_string());
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.mean.len() {
                return Err(format!(
                    "feature_names length {} != mean length {}",
                    names.len(),
                    self.mean.len()
                ));
            }
        }
        Ok(())
    }
}

impl FeatureTransform for StandardScaler {
    fn input_dim(&self) -> usize {
        self.mean.len()
    }

    fn output_dim(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>> {
        check_input_len("StandardScaler", input, self.mean.len())?;
        Ok(input
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // Constant columns are fit with scale 0; leave them centred.
                let denom = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / denom
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardizes_each_column() {
        let scaler = StandardScaler {
            mean: vec![10.0, 0.0, 5.0],
            scale: vec![2.0, 1.0, 0.0],
            feature_names: None,
        };
        scaler.validate().unwrap();

        let out = scaler.transform(&[14.0, -3.0, 7.0]).unwrap();
        assert_eq!(out, vec![2.0, -3.0, 2.0]);
    }

    #[test]
    fn rejects_mismatched_names() {
        let scaler = StandardScaler {
            mean: vec![1.0, 2.0],
            scale: vec![1.0, 1.0],
            feature_names: Some(vec!["a".to_string()]),
        };
        assert!(scaler.validate().is_err());
    }
}
