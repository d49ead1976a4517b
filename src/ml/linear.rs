//! Linear classifiers (logistic regression, multinomial softmax).

use serde::{Deserialize, Serialize};

use super::traits::{check_input_len, Classifier};
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    /// Class labels, in score order.
    pub classes: Vec<i64>,
    /// Weights shape: [n_rows][n_features]. One row means binary logistic.
    pub coef: Vec<Vec<f64>>,
    /// Bias shape: [n_rows]
    pub intercept: Vec<f64>,
}

impl LinearClassifier {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.classes.len() < 2 {
            return Err(format!(
                "need at least 2 classes, got {}",
                self.classes.len()
            ));
        }
        let expected_rows = if self.classes.len() == 2 { 1 } else { self.classes.len() };
        // Binary models may also carry one row per class.
        if self.coef.len() != expected_rows && self.coef.len() != self.classes.len() {
            return Err(format!(
                "coef has {} rows, expected {} for {} classes",
                self.coef.len(),
                expected_rows,
                self.classes.len()
            ));
        }
        if self.intercept.len() != self.coef.len() {
            return Err(format!(
                "intercept len {} != coef rows {}",
                self.intercept.len(),
                self.coef.len()
            ));
        }
        let dim = self.input_dim();
        if dim == 0 {
            return Err("coef rows must not be empty".to_string());
        }
        for (r, row) in self.coef.iter().enumerate() {
            if row.len() != dim {
                return Err(format!("coef row {r} len {} != {dim}", row.len()));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(format!("coef row {r} contains non-finite values"));
            }
        }
        if self.intercept.iter().any(|v| !v.is_finite()) {
            return Err("intercept contains non-finite values".to_string());
        }
        Ok(())
    }

    fn decision_function(&self, features: &[f64]) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| b + row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>())
            .collect()
    }
}

impl Classifier for LinearClassifier {
    fn input_dim(&self) -> usize {
        self.coef.first().map(|r| r.len()).unwrap_or(0)
    }

    fn class_index(&self, class: i64) -> Option<usize> {
        self.classes.iter().position(|c| *c == class)
    }

    fn classes(&self) -> Vec<i64> {
        self.classes.clone()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        check_input_len("LinearClassifier", features, self.input_dim())?;
        let scores = self.decision_function(features);
        if scores.len() == 1 {
            let p = sigmoid(scores[0]);
            return Ok(vec![1.0 - p, p]);
        }
        Ok(softmax(&scores))
    }
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    // Numerically-stable sigmoid.
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

pub(crate) fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary() -> LinearClassifier {
        LinearClassifier {
            classes: vec![0, 1],
            coef: vec![vec![2.0, -1.0]],
            intercept: vec![0.5],
        }
    }

    #[test]
    fn binary_logistic_probabilities() {
        let model = binary();
        model.validate().unwrap();

        // z = 0.5 + 2*1 - 1*0 = 2.5
        let proba = model.predict_proba(&[1.0, 0.0]).unwrap();
        assert!((proba[1] - sigmoid(2.5)).abs() < 1e-12);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        assert_eq!(model.predict(&[1.0, 0.0]).unwrap(), 1);
        assert_eq!(model.predict(&[-3.0, 0.0]).unwrap(), 0);
    }

    #[test]
    fn multinomial_softmax_picks_largest_score() {
        let model = LinearClassifier {
            classes: vec![10, 11, 12],
            coef: vec![vec![1.0], vec![0.0], vec![-1.0]],
            intercept: vec![0.0, 0.0, 0.0],
        };
        model.validate().unwrap();

        let proba = model.predict_proba(&[-2.0]).unwrap();
        assert_eq!(proba.len(), 3);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(model.predict(&[-2.0]).unwrap(), 12);
        assert_eq!(model.class_index(11), Some(1));
        assert_eq!(model.class_index(99), None);
    }

    #[test]
    fn rejects_wrong_input_length() {
        assert!(binary().predict_proba(&[1.0]).is_err());
    }

    #[test]
    fn validates_shapes() {
        let bad = LinearClassifier {
            classes: vec![0, 1, 2],
            coef: vec![vec![1.0, 2.0]],
            intercept: vec![0.0],
        };
        assert!(bad.validate().is_err());

        let ragged = LinearClassifier {
            classes: vec![0, 1],
            coef: vec![vec![1.0, 2.0], vec![1.0]],
            intercept: vec![0.0, 0.0],
        };
        assert!(ragged.validate().is_err());
    }
}
